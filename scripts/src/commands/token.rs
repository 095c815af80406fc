use recurring_payments_client::{
    context::token::TokenContext,
    print_kv,
};
use solana_sdk::pubkey::Pubkey;

use super::Environment;

pub async fn create_token(
    env: &Environment,
    decimals: u8,
    mint_authority: Option<Pubkey>,
    freeze_authority: Option<Pubkey>,
) -> anyhow::Result<()> {
    let payer = env.signer()?;
    let rpc = env.connect().await?;

    let token =
        TokenContext::create_mint(&rpc, &payer, decimals, mint_authority, freeze_authority).await?;

    print_kv!("Mint", token.mint_address);
    print_kv!("Decimals", token.mint_decimals);
    if let Some(authority) = token.mint_authority {
        print_kv!("Mint authority", authority);
    }
    if let Some(authority) = freeze_authority {
        print_kv!("Freeze authority", authority);
    }

    Ok(())
}
