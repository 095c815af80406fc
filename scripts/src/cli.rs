use std::path::PathBuf;

use clap::{
    Parser,
    Subcommand,
};
use recurring_payments_client::{
    cluster::{
        Cluster,
        ClusterConfig,
    },
    config_store::{
        ConfigStore,
        DEFAULT_STORE_DIR,
    },
    context::token::DEFAULT_MINT_DECIMALS,
    key_store::{
        KeyStore,
        DEFAULT_KEYPAIR_PATH,
    },
};
use recurring_payments_interface::state::SUBSCRIPTION_PLAN_SIZE;
use solana_sdk::pubkey::Pubkey;

pub const DEFAULT_PROGRAM_PATH: &str = "dist/program/recurring-payments.so";

#[derive(Parser, Debug)]
#[command(author, version, about = "Tooling for the recurring payments program", long_about = None)]
pub struct Cli {
    /// The cluster to connect to.
    #[arg(long, env = "CLUSTER", default_value_t = Cluster::Localnet, global = true)]
    pub cluster: Cluster,

    /// An RPC url that overrides the cluster's.
    #[arg(long, env = "RPC_URL", global = true)]
    pub url: Option<String>,

    #[arg(long, env = "KEYPAIR_PATH", default_value = DEFAULT_KEYPAIR_PATH, global = true)]
    pub keypair: PathBuf,

    /// Directory holding the JSON deployment records.
    #[arg(long, env = "STORE_DIR", default_value = DEFAULT_STORE_DIR, global = true)]
    pub store_dir: PathBuf,

    /// Prepends compute budget instructions with this unit limit to every transaction.
    #[arg(long, global = true)]
    pub compute_unit_limit: Option<u32>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generates a new keypair file. Refuses to overwrite an existing one.
    CreateKeypair,
    /// Prints the signer's address and balance.
    Address,
    /// Requests an airdrop for the signer.
    Airdrop {
        #[arg(long, default_value_t = 1.0)]
        sol: f64,
    },
    /// Creates a new token mint.
    CreateToken {
        #[arg(long, default_value_t = DEFAULT_MINT_DECIMALS)]
        decimals: u8,
        /// Defaults to the signer.
        #[arg(long)]
        mint_authority: Option<Pubkey>,
        #[arg(long)]
        freeze_authority: Option<Pubkey>,
    },
    /// Sends SOL from the signer to another address.
    Transfer {
        #[arg(long)]
        to: Pubkey,
        #[arg(long)]
        sol: f64,
    },
    /// Deploys the recurring payments program and creates its data account.
    Deploy {
        #[arg(long, default_value = DEFAULT_PROGRAM_PATH)]
        program: PathBuf,
        #[arg(long, default_value_t = SUBSCRIPTION_PLAN_SIZE)]
        data_space: usize,
        /// An already uploaded program. Skips the upload and only creates the data account.
        #[arg(long)]
        program_id: Option<Pubkey>,
    },
    /// Creates a token, a subscription plan and a subscription against the deployed program.
    Playground {
        #[arg(long, default_value_t = 10)]
        max_amount: u128,
        #[arg(long, default_value_t = 10)]
        timeframe: u128,
        /// Atoms of the new token the program is approved to transfer.
        #[arg(long, default_value_t = 500)]
        approve: u64,
    },
}

impl Cli {
    pub fn cluster_config(&self) -> ClusterConfig {
        ClusterConfig::new(self.cluster, self.url.clone())
    }

    pub fn key_store(&self) -> KeyStore {
        KeyStore::new(self.keypair.clone())
    }

    pub fn config_store(&self) -> ConfigStore {
        ConfigStore::new(self.store_dir.clone())
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn globals_apply_after_the_subcommand() {
        let cli = Cli::try_parse_from([
            "recurring-payments",
            "address",
            "--cluster",
            "devnet",
            "--keypair",
            "wallets/dev.json",
        ])
        .unwrap();
        assert_eq!(cli.cluster, Cluster::Devnet);
        assert_eq!(cli.cluster_config().url, Cluster::Devnet.url());
        assert_eq!(cli.keypair, PathBuf::from("wallets/dev.json"));
        assert!(matches!(cli.command, Command::Address));
    }

    #[test]
    fn url_overrides_the_cluster() {
        let cli = Cli::try_parse_from([
            "recurring-payments",
            "--url",
            "http://127.0.0.1:9000",
            "create-keypair",
        ])
        .unwrap();
        assert_eq!(cli.cluster_config().url, "http://127.0.0.1:9000");
    }

    #[test]
    fn playground_accepts_values_wider_than_64_bits() {
        let cli = Cli::try_parse_from([
            "recurring-payments",
            "playground",
            "--max-amount",
            "18446744073709551616",
        ])
        .unwrap();
        let Command::Playground {
            max_amount,
            timeframe,
            approve,
        } = cli.command
        else {
            panic!("expected the playground command");
        };
        assert_eq!(max_amount, u64::MAX as u128 + 1);
        assert_eq!(timeframe, 10);
        assert_eq!(approve, 500);
    }

    #[test]
    fn deploy_can_resume_from_a_program_id() {
        let program_id = Pubkey::new_unique();
        let cli = Cli::try_parse_from([
            "recurring-payments",
            "deploy",
            "--program-id",
            program_id.to_string().as_str(),
        ])
        .unwrap();
        let Command::Deploy {
            program,
            data_space,
            program_id: parsed,
        } = cli.command
        else {
            panic!("expected the deploy command");
        };
        assert_eq!(parsed, Some(program_id));
        assert_eq!(program, PathBuf::from(DEFAULT_PROGRAM_PATH));
        assert_eq!(data_space, SUBSCRIPTION_PLAN_SIZE);
    }

    #[test]
    fn transfer_requires_a_valid_address() {
        assert!(Cli::try_parse_from([
            "recurring-payments",
            "transfer",
            "--to",
            "not-an-address",
            "--sol",
            "1"
        ])
        .is_err());
    }
}
