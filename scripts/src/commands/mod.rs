//! One module per subcommand. Each is a straight line of awaited steps that stops at the first
//! error.

pub mod deploy;
pub mod keypair;
pub mod playground;
pub mod token;
pub mod transfer;

use anyhow::Context;
use recurring_payments_client::{
    cluster::ClusterConfig,
    config_store::ConfigStore,
    key_store::KeyStore,
    logs::log_info,
    transactions::{
        CustomRpcClient,
        SendTransactionConfig,
    },
};
use solana_sdk::signature::{
    Keypair,
    Signer,
};

use crate::cli::Cli;

/// Everything resolved from the global flags, shared by every subcommand.
pub struct Environment {
    pub cluster: ClusterConfig,
    pub key_store: KeyStore,
    pub config_store: ConfigStore,
    pub compute_unit_limit: Option<u32>,
}

impl Environment {
    pub fn new(cli: &Cli) -> Self {
        Self {
            cluster: cli.cluster_config(),
            key_store: cli.key_store(),
            config_store: cli.config_store(),
            compute_unit_limit: cli.compute_unit_limit,
        }
    }

    /// Loads the signing keypair. A missing file is fatal for every command that signs.
    pub fn signer(&self) -> anyhow::Result<Keypair> {
        let keypair = self.key_store.load().with_context(|| {
            format!(
                "Couldn't load the signer from {}; run `create-keypair` first",
                self.key_store.path().display()
            )
        })?;
        log_info("Signer", keypair.pubkey());
        Ok(keypair)
    }

    pub async fn connect(&self) -> anyhow::Result<CustomRpcClient> {
        CustomRpcClient::connect(
            &self.cluster,
            Some(SendTransactionConfig {
                compute_budget: self.compute_unit_limit,
                ..Default::default()
            }),
        )
        .await
    }
}
