//! The contract registry: a flat mapping from logical contract names to
//! deployed addresses, loaded from the network's contracts config file

use std::{collections::BTreeMap, fs, path::Path, str::FromStr};

use alloy::primitives::Address;

use crate::errors::ScriptError;

/// An immutable mapping from logical contract name to on-chain address
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ContractRegistry {
    /// The deployed addresses, keyed by logical contract name
    addresses: BTreeMap<String, Address>,
}

impl ContractRegistry {
    /// Load the registry from a contracts config file.
    ///
    /// The file must hold a flat JSON object of string keys to hex addresses.
    pub fn load(path: &Path) -> Result<Self, ScriptError> {
        let contents = fs::read_to_string(path)
            .map_err(|e| ScriptError::ReadConfig(format!("{}: {}", path.display(), e)))?;

        Self::from_json(&contents)
            .map_err(|e| ScriptError::ParseConfig(format!("{}: {}", path.display(), e)))
    }

    /// Parse the registry from the contents of a contracts config file
    pub fn from_json(contents: &str) -> Result<Self, String> {
        let raw: BTreeMap<String, String> =
            serde_json::from_str(contents).map_err(|e| e.to_string())?;

        let addresses = raw
            .into_iter()
            .map(|(name, addr)| {
                Address::from_str(&addr)
                    .map(|addr| (name.clone(), addr))
                    .map_err(|e| format!("invalid address `{addr}` for `{name}`: {e}"))
            })
            .collect::<Result<_, _>>()?;

        Ok(Self { addresses })
    }

    /// Build a registry directly from name / address pairs
    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, Address)>,
        S: Into<String>,
    {
        Self {
            addresses: entries.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }

    /// Look up the address of a contract by logical name
    pub fn address(&self, name: &str) -> Result<Address, ScriptError> {
        self.addresses
            .get(name)
            .copied()
            .ok_or_else(|| ScriptError::MissingContract(name.to_string()))
    }

    /// Check that every given name is present, reporting all missing names at once
    pub fn require<S: AsRef<str>>(&self, names: &[S]) -> Result<(), ScriptError> {
        let missing: Vec<String> = names
            .iter()
            .map(AsRef::as_ref)
            .filter(|name| !self.addresses.contains_key(*name))
            .map(str::to_string)
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(ScriptError::MissingContracts(missing))
        }
    }

    /// Iterate over the registry entries in name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, Address)> {
        self.addresses.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// The number of contracts in the registry
    pub fn len(&self) -> usize {
        self.addresses.len()
    }

    /// Whether the registry is empty
    pub fn is_empty(&self) -> bool {
        self.addresses.is_empty()
    }

    /// Write a newly deployed address into the contracts config file at `path`,
    /// creating the file if it does not exist and keeping all other entries
    pub fn record(path: &Path, name: &str, address: Address) -> Result<(), ScriptError> {
        let mut entries: BTreeMap<String, String> = if path.exists() {
            let contents = fs::read_to_string(path)
                .map_err(|e| ScriptError::ReadConfig(format!("{}: {}", path.display(), e)))?;
            serde_json::from_str(&contents)
                .map_err(|e| ScriptError::ParseConfig(format!("{}: {}", path.display(), e)))?
        } else {
            BTreeMap::new()
        };

        entries.insert(name.to_string(), address.to_checksum(None));

        let contents = serde_json::to_string_pretty(&entries)
            .map_err(|e| ScriptError::WriteConfig(e.to_string()))?;
        if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(dir)
                .map_err(|e| ScriptError::WriteConfig(format!("{}: {}", dir.display(), e)))?;
        }
        fs::write(path, contents)
            .map_err(|e| ScriptError::WriteConfig(format!("{}: {}", path.display(), e)))
    }
}

#[cfg(test)]
mod tests {
    use std::{env, fs, path::PathBuf};

    use alloy::primitives::{address, Address};

    use super::ContractRegistry;
    use crate::errors::ScriptError;

    /// The path of a fixture file shipped with the crate
    fn fixture(name: &str) -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("tests")
            .join("fixtures")
            .join(name)
    }

    #[test]
    fn test_load_fixture() {
        let registry = ContractRegistry::load(&fixture("testnet_contracts.json")).unwrap();

        assert_eq!(
            registry.address("multisig").unwrap(),
            address!("189ecd23e9e34cfc07bfc3b7f5711a23f43f8a57")
        );
        assert!(registry.address("Staking").is_ok());
    }

    #[test]
    fn test_load_is_idempotent() {
        let path = fixture("testnet_contracts.json");
        let first = ContractRegistry::load(&path).unwrap();
        let second = ContractRegistry::load(&path).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_missing_file() {
        let res = ContractRegistry::load(&fixture("nonexistent_contracts.json"));
        assert!(matches!(res, Err(ScriptError::ReadConfig(_))));
    }

    #[test]
    fn test_malformed_file() {
        let res = ContractRegistry::load(&fixture("malformed_contracts.json"));
        assert!(matches!(res, Err(ScriptError::ParseConfig(_))));
    }

    #[test]
    fn test_invalid_address() {
        let res = ContractRegistry::from_json(r#"{"Staking": "0x1234"}"#);
        assert!(res.unwrap_err().contains("Staking"));
    }

    #[test]
    fn test_nested_object_rejected() {
        let res = ContractRegistry::from_json(r#"{"deployments": {"Staking": "0x00"}}"#);
        assert!(res.is_err());
    }

    #[test]
    fn test_unknown_name() {
        let registry = ContractRegistry::from_entries([("Staking", Address::ZERO)]);

        let res = registry.address("Stakin");
        assert!(matches!(res, Err(ScriptError::MissingContract(name)) if name == "Stakin"));
    }

    #[test]
    fn test_require_reports_all_missing() {
        let registry = ContractRegistry::from_entries([("Staking", Address::ZERO)]);

        assert!(registry.require(&["Staking"]).is_ok());
        match registry.require(&["multisig", "Staking", "SOV"]) {
            Err(ScriptError::MissingContracts(missing)) => {
                assert_eq!(missing, vec!["multisig".to_string(), "SOV".to_string()])
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_record_preserves_entries() {
        let path = env::temp_dir().join("protocol-scripts-record_contracts.json");
        let _ = fs::remove_file(&path);

        let staking = address!("5a0d867e0d70fcc6ade25c3f1b89d618b5b4eaa7");
        let multisig = address!("189ecd23e9e34cfc07bfc3b7f5711a23f43f8a57");
        ContractRegistry::record(&path, "Staking", staking).unwrap();
        ContractRegistry::record(&path, "multisig", multisig).unwrap();

        let registry = ContractRegistry::load(&path).unwrap();
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.address("Staking").unwrap(), staking);
        assert_eq!(registry.address("multisig").unwrap(), multisig);

        fs::remove_file(&path).unwrap();
    }
}
