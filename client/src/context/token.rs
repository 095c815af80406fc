//! Token-level context containing mint metadata and helpers for creating token accounts and
//! building token instructions.

use solana_sdk::{
    instruction::Instruction,
    program_pack::Pack,
    pubkey::Pubkey,
    signature::{
        Keypair,
        Signer,
    },
};
use solana_system_interface::instruction::create_account;
use spl_token_interface::{
    instruction::{
        approve,
        initialize_account3,
        initialize_mint2,
        mint_to,
    },
    state::{
        Account,
        Mint,
    },
};

use crate::{
    logs::log_success,
    transactions::CustomRpcClient,
};

pub const DEFAULT_MINT_DECIMALS: u8 = 9;

pub struct TokenContext {
    pub mint_authority: Option<Pubkey>,
    pub mint_address: Pubkey,
    pub token_program: Pubkey,
    pub mint_decimals: u8,
}

impl TokenContext {
    pub const fn new(
        mint_authority: Option<Pubkey>,
        mint_address: Pubkey,
        token_program: Pubkey,
        mint_decimals: u8,
    ) -> Self {
        Self {
            mint_authority,
            mint_address,
            token_program,
            mint_decimals,
        }
    }

    /// Builds the instructions that allocate and initialize a mint at `mint_address`.
    pub fn create_mint_instructions(
        payer: &Pubkey,
        mint_address: &Pubkey,
        mint_authority: &Pubkey,
        freeze_authority: Option<&Pubkey>,
        decimals: u8,
        rent_lamports: u64,
    ) -> anyhow::Result<[Instruction; 2]> {
        Ok([
            create_account(
                payer,
                mint_address,
                rent_lamports,
                Mint::LEN as u64,
                &spl_token_interface::ID,
            ),
            initialize_mint2(
                &spl_token_interface::ID,
                mint_address,
                mint_authority,
                freeze_authority,
                decimals,
            )?,
        ])
    }

    /// Creates a new mint on chain. The mint authority defaults to `payer`.
    pub async fn create_mint(
        rpc: &CustomRpcClient,
        payer: &Keypair,
        decimals: u8,
        mint_authority: Option<Pubkey>,
        freeze_authority: Option<Pubkey>,
    ) -> anyhow::Result<Self> {
        let mint = Keypair::new();
        let mint_authority = mint_authority.unwrap_or(payer.pubkey());
        let rent = rpc.rent_exempt_minimum(Mint::LEN).await?;

        let instructions = Self::create_mint_instructions(
            &payer.pubkey(),
            &mint.pubkey(),
            &mint_authority,
            freeze_authority.as_ref(),
            decimals,
            rent,
        )?;
        rpc.send_and_confirm_txn(payer, &[&mint], &instructions)
            .await?;
        log_success("Created token", mint.pubkey());

        Ok(Self::new(
            Some(mint_authority),
            mint.pubkey(),
            spl_token_interface::ID,
            decimals,
        ))
    }

    /// Builds the instructions that allocate and initialize a token account for `owner`.
    pub fn create_token_account_instructions(
        &self,
        payer: &Pubkey,
        account: &Pubkey,
        owner: &Pubkey,
        rent_lamports: u64,
    ) -> anyhow::Result<[Instruction; 2]> {
        Ok([
            create_account(
                payer,
                account,
                rent_lamports,
                Account::LEN as u64,
                &self.token_program,
            ),
            initialize_account3(&self.token_program, account, &self.mint_address, owner)?,
        ])
    }

    /// Creates a token account for `owner` at a fresh address and returns that address.
    pub async fn create_token_account(
        &self,
        rpc: &CustomRpcClient,
        payer: &Keypair,
        owner: &Pubkey,
    ) -> anyhow::Result<Pubkey> {
        let account = Keypair::new();
        let rent = rpc.rent_exempt_minimum(Account::LEN).await?;
        let instructions =
            self.create_token_account_instructions(&payer.pubkey(), &account.pubkey(), owner, rent)?;
        rpc.send_and_confirm_txn(payer, &[&account], &instructions)
            .await?;
        Ok(account.pubkey())
    }

    /// Builds a `mint_to` instruction that mints `amount` atoms to `destination`.
    pub fn mint_to(&self, destination: &Pubkey, amount: u64) -> anyhow::Result<Instruction> {
        if let Some(ref mint_authority) = self.mint_authority {
            Ok(mint_to(
                &self.token_program,
                &self.mint_address,
                destination,
                mint_authority,
                &[],
                amount,
            )?)
        } else {
            Err(anyhow::anyhow!("Token doesn't have a mint authority."))
        }
    }

    /// Builds an `approve` instruction letting `delegate` transfer up to `amount` atoms out of
    /// `source`.
    pub fn approve(
        &self,
        source: &Pubkey,
        delegate: &Pubkey,
        owner: &Pubkey,
        amount: u64,
    ) -> anyhow::Result<Instruction> {
        Ok(approve(
            &self.token_program,
            source,
            delegate,
            owner,
            &[],
            amount,
        )?)
    }

    /// Converts a whole-token amount to atoms using the mint's decimals.
    pub fn to_atoms(&self, tokens: u64) -> anyhow::Result<u64> {
        10u64
            .checked_pow(self.mint_decimals as u32)
            .and_then(|scale| tokens.checked_mul(scale))
            .ok_or_else(|| anyhow::anyhow!("{tokens} tokens overflow a u64 amount of atoms"))
    }
}
