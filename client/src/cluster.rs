use solana_client::nonblocking::rpc_client::RpcClient;
use solana_commitment_config::CommitmentConfig;

#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, strum_macros::Display, strum_macros::EnumString,
)]
#[cfg_attr(test, derive(strum_macros::EnumIter))]
#[strum(serialize_all = "kebab-case")]
pub enum Cluster {
    MainnetBeta,
    Testnet,
    Devnet,
    #[default]
    Localnet,
}

impl Cluster {
    pub fn url(&self) -> &'static str {
        match self {
            Self::MainnetBeta => "https://api.mainnet-beta.solana.com",
            Self::Testnet => "https://api.testnet.solana.com",
            Self::Devnet => "https://api.devnet.solana.com",
            Self::Localnet => "http://localhost:8899",
        }
    }
}

/// Which node to talk to and at what commitment. Built once at startup and passed to every
/// operation that opens a connection.
#[derive(Clone, Debug)]
pub struct ClusterConfig {
    pub url: String,
    pub commitment: CommitmentConfig,
}

impl ClusterConfig {
    /// Resolves the RPC url from `cluster`, unless `url` overrides it.
    pub fn new(cluster: Cluster, url: Option<String>) -> Self {
        Self {
            url: url.unwrap_or_else(|| cluster.url().to_string()),
            commitment: CommitmentConfig::confirmed(),
        }
    }

    pub fn rpc_client(&self) -> RpcClient {
        RpcClient::new_with_commitment(self.url.clone(), self.commitment)
    }
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self::new(Cluster::default(), None)
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn cluster_names_round_trip() {
        for cluster in Cluster::iter() {
            assert_eq!(Cluster::from_str(&cluster.to_string()).unwrap(), cluster);
        }
        assert_eq!(Cluster::MainnetBeta.to_string(), "mainnet-beta");
        assert!(Cluster::from_str("mainnet").is_err());
    }

    #[test]
    fn url_override_wins() {
        let config = ClusterConfig::new(Cluster::Devnet, Some("http://10.0.0.1:8899".into()));
        assert_eq!(config.url, "http://10.0.0.1:8899");

        let config = ClusterConfig::new(Cluster::Devnet, None);
        assert_eq!(config.url, "https://api.devnet.solana.com");
    }

    #[test]
    fn defaults_to_a_local_node() {
        let config = ClusterConfig::default();
        assert_eq!(config.url, "http://localhost:8899");
        assert_eq!(config.commitment, CommitmentConfig::confirmed());
    }
}
