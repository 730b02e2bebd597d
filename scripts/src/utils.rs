//! Utilities for the operator scripts.

use std::{
    fs,
    io::{self, Write},
    path::Path,
    str::FromStr,
};

use alloy::{
    primitives::{
        utils::{format_units, parse_units},
        Bytes, U256,
    },
    providers::{DynProvider, ProviderBuilder},
    signers::local::PrivateKeySigner,
    transports::http::reqwest::Url,
};
use serde::Deserialize;

use crate::{constants::TOKEN_DECIMALS, contracts::Wallet, errors::ScriptError};

/// Sets up the provider through which all contract handles talk to the node,
/// signing transactions with the given signer
pub fn setup_client(signer: PrivateKeySigner, rpc_url: &str) -> Result<Wallet, ScriptError> {
    let url = Url::parse(rpc_url).map_err(|e| ScriptError::ClientInitialization(e.to_string()))?;
    let provider = ProviderBuilder::new().wallet(signer).connect_http(url);

    Ok(DynProvider::new(provider))
}

/// Prompt the operator for a line of input on the terminal
pub fn prompt_for_input(prompt: &str) -> Result<String, ScriptError> {
    print!("{}: ", prompt);
    io::stdout()
        .flush()
        .map_err(|e| ScriptError::Prompt(e.to_string()))?;

    let mut input = String::new();
    io::stdin()
        .read_line(&mut input)
        .map_err(|e| ScriptError::Prompt(e.to_string()))?;

    Ok(input.trim().to_string())
}

/// Parse hex-encoded bytes, with or without a `0x` prefix
pub fn parse_hex_bytes(hex: &str) -> Result<Bytes, ScriptError> {
    Bytes::from_str(hex.trim()).map_err(|e| ScriptError::CalldataConstruction(e.to_string()))
}

/// Parse a decimal token amount, e.g. `1000.5`, into its base-unit value
pub fn parse_token_amount(amount: &str) -> Result<U256, String> {
    let amount = amount.trim();
    if amount.starts_with('-') {
        return Err(format!("negative amount `{amount}`"));
    }

    parse_units(amount, TOKEN_DECIMALS)
        .map(|units| units.get_absolute())
        .map_err(|e| format!("invalid amount `{amount}`: {e}"))
}

/// Format a base-unit token value as a decimal amount
pub fn format_token_amount(value: U256) -> String {
    format_units(value, TOKEN_DECIMALS).unwrap_or_else(|_| value.to_string())
}

/// The bytecode section of a compilation artifact
#[derive(Deserialize)]
#[serde(untagged)]
enum ArtifactBytecode {
    /// Foundry layout: `{"bytecode": {"object": "0x..."}}`
    Object {
        /// The hex-encoded creation code
        object: String,
    },
    /// Hardhat / Truffle layout: `{"bytecode": "0x..."}`
    Raw(String),
}

/// A compilation artifact, of which only the creation code is used
#[derive(Deserialize)]
struct Artifact {
    /// The creation code of the contract
    bytecode: ArtifactBytecode,
}

/// Read the creation code of a contract from a compilation artifact file
pub fn read_artifact_bytecode(path: &Path) -> Result<Bytes, ScriptError> {
    let contents = fs::read_to_string(path)
        .map_err(|e| ScriptError::ArtifactParsing(format!("{}: {}", path.display(), e)))?;
    parse_artifact_bytecode(&contents)
}

/// Parse the creation code of a contract from the contents of a compilation artifact
pub fn parse_artifact_bytecode(contents: &str) -> Result<Bytes, ScriptError> {
    let artifact: Artifact = serde_json::from_str(contents)
        .map_err(|e| ScriptError::ArtifactParsing(e.to_string()))?;

    let hex = match artifact.bytecode {
        ArtifactBytecode::Object { object } => object,
        ArtifactBytecode::Raw(raw) => raw,
    };
    let bytecode =
        Bytes::from_str(&hex).map_err(|e| ScriptError::ArtifactParsing(e.to_string()))?;

    if bytecode.is_empty() {
        return Err(ScriptError::ArtifactParsing(
            "artifact has no creation code, is the contract abstract?".to_string(),
        ));
    }

    Ok(bytecode)
}

#[cfg(test)]
mod tests {
    use alloy::primitives::{utils::parse_ether, U256};

    use super::{format_token_amount, parse_artifact_bytecode, parse_hex_bytes, parse_token_amount};
    use crate::errors::ScriptError;

    #[test]
    fn test_foundry_artifact() {
        let artifact = r#"{"abi": [], "bytecode": {"object": "0x6080604052", "linkReferences": {}}}"#;
        let bytecode = parse_artifact_bytecode(artifact).unwrap();
        assert_eq!(bytecode.as_ref(), &[0x60, 0x80, 0x60, 0x40, 0x52]);
    }

    #[test]
    fn test_hardhat_artifact() {
        let artifact = r#"{"contractName": "Staking", "abi": [], "bytecode": "0x6080"}"#;
        let bytecode = parse_artifact_bytecode(artifact).unwrap();
        assert_eq!(bytecode.as_ref(), &[0x60, 0x80]);
    }

    #[test]
    fn test_abstract_artifact() {
        let artifact = r#"{"abi": [], "bytecode": "0x"}"#;
        let res = parse_artifact_bytecode(artifact);
        assert!(matches!(res, Err(ScriptError::ArtifactParsing(_))));
    }

    #[test]
    fn test_token_amounts() {
        assert_eq!(parse_token_amount("1").unwrap(), parse_ether("1").unwrap());
        assert_eq!(
            parse_token_amount(" 2500.5 ").unwrap(),
            parse_ether("2500.5").unwrap()
        );
        assert!(parse_token_amount("-3").is_err());
        assert!(parse_token_amount("ten").is_err());

        assert_eq!(format_token_amount(U256::from(10).pow(U256::from(18))), "1.000000000000000000");
    }

    #[test]
    fn test_hex_bytes() {
        assert_eq!(parse_hex_bytes("0xdeadbeef").unwrap().len(), 4);
        assert_eq!(parse_hex_bytes("deadbeef").unwrap().len(), 4);
        assert!(parse_hex_bytes("0xzz").is_err());
    }
}
