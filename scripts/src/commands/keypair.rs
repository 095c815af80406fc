use anyhow::Context;
use recurring_payments_client::{
    format_lamports,
    logs::log_success,
    print_kv,
};
use solana_sdk::signature::Signer;

use super::Environment;

pub fn create_keypair(env: &Environment) -> anyhow::Result<()> {
    let keypair = env
        .key_store
        .create()
        .context("Couldn't create a new keypair")?;
    let bytes = keypair.to_bytes();

    print_kv!("Secret key", format!("{:?}", &bytes[..32]));
    print_kv!("Public key", format!("{:?}", &bytes[32..]));
    print_kv!("Address", keypair.pubkey());
    log_success("Saved keypair", env.key_store.path().display());

    Ok(())
}

pub async fn address(env: &Environment) -> anyhow::Result<()> {
    let keypair = env.signer()?;
    let rpc = env.connect().await?;
    let balance = rpc.balance(&keypair.pubkey()).await?;

    print_kv!("Address", keypair.pubkey());
    print_kv!("Balance", format_lamports(balance));

    Ok(())
}
