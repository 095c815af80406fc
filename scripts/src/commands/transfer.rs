use anyhow::Context;
use recurring_payments_client::{
    format_lamports,
    logs::log_success,
    print_kv,
    sol_to_lamports,
};
use solana_sdk::{
    pubkey::Pubkey,
    signature::Signer,
};
use solana_system_interface::instruction::transfer as system_transfer;

use super::Environment;

fn lamports(sol: f64) -> anyhow::Result<u64> {
    sol_to_lamports(sol).with_context(|| format!("{sol} isn't a valid amount of SOL"))
}

pub async fn airdrop(env: &Environment, sol: f64) -> anyhow::Result<()> {
    let lamports = lamports(sol)?;
    let keypair = env.signer()?;
    let rpc = env.connect().await?;

    rpc.fund_account(&keypair.pubkey(), lamports).await?;
    print_kv!(
        "Balance",
        format_lamports(rpc.balance(&keypair.pubkey()).await?)
    );

    Ok(())
}

pub async fn transfer(env: &Environment, to: Pubkey, sol: f64) -> anyhow::Result<()> {
    let lamports = lamports(sol)?;
    let payer = env.signer()?;
    let rpc = env.connect().await?;

    let instruction = system_transfer(&payer.pubkey(), &to, lamports);
    rpc.send_single_signer(&payer, [instruction])
        .await
        .context("Failed to transfer SOL")?;
    log_success("Transferred", format!("{} to {to}", format_lamports(lamports)));

    Ok(())
}
