//! Resolution of the execution environment from a network identifier
//!
//! Every run starts here: the network selects the signing credential, the
//! contracts config file and the RPC endpoint. Unsupported identifiers are
//! rejected before anything touches the network.

use std::{
    fmt::{self, Display},
    path::{Path, PathBuf},
    str::FromStr,
};

use clap::ValueEnum;

use crate::{
    constants::{
        CONFIG_FILE_SUFFIX, DEFAULT_ACCOUNT_ALIAS, DEVELOPMENT_RPC_URL, RSK_MAINNET_CHAIN_ID,
        RSK_MAINNET_RPC_URL, RSK_TESTNET_CHAIN_ID, RSK_TESTNET_RPC_URL,
    },
    credentials::CredentialSource,
    errors::ScriptError,
};

/// The networks the scripts can run against
#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
pub enum Network {
    /// A local development node with pre-funded accounts
    Development,
    /// The RSK testnet
    Testnet,
    /// The RSK testnet, under its fully qualified name
    RskTestnet,
    /// The RSK mainnet
    RskMainnet,
}

/// The class of deployment a network belongs to, which selects the contracts
/// config file
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum NetworkClass {
    /// Contracts deployed to a local development node
    Development,
    /// Contracts deployed to the public testnet
    Testnet,
    /// Contracts deployed to mainnet
    Mainnet,
}

impl Network {
    /// All supported networks
    pub const ALL: [Network; 4] = [
        Network::Development,
        Network::Testnet,
        Network::RskTestnet,
        Network::RskMainnet,
    ];

    /// The deployment class of the network
    pub fn class(&self) -> NetworkClass {
        match self {
            Network::Development => NetworkClass::Development,
            Network::Testnet | Network::RskTestnet => NetworkClass::Testnet,
            Network::RskMainnet => NetworkClass::Mainnet,
        }
    }

    /// The RPC URL used when none is given explicitly
    pub fn default_rpc_url(&self) -> &'static str {
        match self.class() {
            NetworkClass::Development => DEVELOPMENT_RPC_URL,
            NetworkClass::Testnet => RSK_TESTNET_RPC_URL,
            NetworkClass::Mainnet => RSK_MAINNET_RPC_URL,
        }
    }

    /// The chain ID the node must report, if the network pins one.
    ///
    /// Development nodes come in several flavors with different chain IDs, so
    /// they are not checked.
    pub fn expected_chain_id(&self) -> Option<u64> {
        match self.class() {
            NetworkClass::Development => None,
            NetworkClass::Testnet => Some(RSK_TESTNET_CHAIN_ID),
            NetworkClass::Mainnet => Some(RSK_MAINNET_CHAIN_ID),
        }
    }

    /// Whether transactions on this network must be priced with a legacy gas price.
    ///
    /// RSK nodes do not implement EIP-1559 fee markets.
    pub fn uses_legacy_gas(&self) -> bool {
        !matches!(self.class(), NetworkClass::Development)
    }

    /// The source of the signing credential, honoring an explicit account alias
    pub fn credential_source(&self, account: Option<&str>) -> CredentialSource {
        match self.class() {
            NetworkClass::Development => CredentialSource::Ephemeral,
            NetworkClass::Testnet | NetworkClass::Mainnet => CredentialSource::Keystore {
                alias: account.unwrap_or(DEFAULT_ACCOUNT_ALIAS).to_string(),
            },
        }
    }
}

impl Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Network::Development => write!(f, "development"),
            Network::Testnet => write!(f, "testnet"),
            Network::RskTestnet => write!(f, "rsk-testnet"),
            Network::RskMainnet => write!(f, "rsk-mainnet"),
        }
    }
}

impl FromStr for Network {
    type Err = ScriptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Network::ALL
            .into_iter()
            .find(|network| network.to_string() == s)
            .ok_or_else(|| ScriptError::UnsupportedNetwork(s.to_string()))
    }
}

impl Display for NetworkClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NetworkClass::Development => write!(f, "development"),
            NetworkClass::Testnet => write!(f, "testnet"),
            NetworkClass::Mainnet => write!(f, "mainnet"),
        }
    }
}

/// Everything a run needs to know about where it executes, resolved once from
/// the network identifier
#[derive(Clone, Debug)]
pub struct Environment {
    /// The selected network
    pub network: Network,
    /// Where the signing credential comes from
    pub credential: CredentialSource,
    /// The path of the contracts config file for the network
    pub config_path: PathBuf,
    /// The RPC URL of the node to talk to
    pub rpc_url: String,
}

impl Environment {
    /// Resolve the environment for a network.
    ///
    /// `rpc_url` and `account` override the network defaults when given.
    pub fn resolve(
        network: Network,
        config_dir: &Path,
        rpc_url: Option<&str>,
        account: Option<&str>,
    ) -> Self {
        Self {
            network,
            credential: network.credential_source(account),
            config_path: config_path(config_dir, network.class()),
            rpc_url: rpc_url.unwrap_or(network.default_rpc_url()).to_string(),
        }
    }

    /// Resolve the environment from a raw network identifier, failing on
    /// unsupported identifiers
    pub fn from_identifier(
        identifier: &str,
        config_dir: &Path,
        rpc_url: Option<&str>,
        account: Option<&str>,
    ) -> Result<Self, ScriptError> {
        let network = <Network as FromStr>::from_str(identifier)?;
        Ok(Self::resolve(network, config_dir, rpc_url, account))
    }
}

/// The path of the contracts config file for a class of networks
pub fn config_path(config_dir: &Path, class: NetworkClass) -> PathBuf {
    config_dir.join(format!("{class}{CONFIG_FILE_SUFFIX}"))
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::{Environment, Network};
    use crate::{credentials::CredentialSource, errors::ScriptError};

    #[test]
    fn test_every_network_resolves() {
        for network in Network::ALL {
            let env = Environment::resolve(network, Path::new("deployments"), None, None);
            assert!(!env.config_path.as_os_str().is_empty());
            assert!(!env.rpc_url.is_empty());
            assert_eq!(env.network, network);
        }
    }

    #[test]
    fn test_config_paths_follow_network_class() {
        let dir = Path::new("deployments");
        let path = |network| Environment::resolve(network, dir, None, None).config_path;

        assert_eq!(
            path(Network::Development),
            dir.join("development_contracts.json")
        );
        assert_eq!(path(Network::Testnet), dir.join("testnet_contracts.json"));
        assert_eq!(path(Network::RskTestnet), dir.join("testnet_contracts.json"));
        assert_eq!(path(Network::RskMainnet), dir.join("mainnet_contracts.json"));
    }

    #[test]
    fn test_credential_sources() {
        let dir = Path::new("deployments");

        let dev = Environment::resolve(Network::Development, dir, None, Some("ignored"));
        assert_eq!(dev.credential, CredentialSource::Ephemeral);

        let mainnet = Environment::resolve(Network::RskMainnet, dir, None, None);
        assert_eq!(
            mainnet.credential,
            CredentialSource::Keystore {
                alias: "rskdeployer".to_string()
            }
        );

        let testnet = Environment::resolve(Network::Testnet, dir, None, Some("ops"));
        assert_eq!(
            testnet.credential,
            CredentialSource::Keystore {
                alias: "ops".to_string()
            }
        );
    }

    #[test]
    fn test_identifier_round_trip() {
        for network in Network::ALL {
            let parsed: Network = network.to_string().parse().unwrap();
            assert_eq!(parsed, network);
        }
    }

    #[test]
    fn test_unsupported_identifier() {
        let res = Environment::from_identifier("ropsten", Path::new("."), None, None);
        assert!(matches!(res, Err(ScriptError::UnsupportedNetwork(id)) if id == "ropsten"));
    }

    #[test]
    fn test_resolve_from_identifier() {
        let env =
            Environment::from_identifier("rsk-mainnet", Path::new("deployments"), None, None)
                .unwrap();

        assert_eq!(env.network, Network::RskMainnet);
        assert_eq!(env.config_path, Path::new("deployments/mainnet_contracts.json"));
    }

    #[test]
    fn test_rpc_override() {
        let env = Environment::resolve(
            Network::RskTestnet,
            Path::new("."),
            Some("http://10.0.0.2:4444"),
            None,
        );
        assert_eq!(env.rpc_url, "http://10.0.0.2:4444");
        assert_eq!(Network::RskTestnet.expected_chain_id(), Some(31));
        assert_eq!(Network::Development.expected_chain_id(), None);
    }
}
