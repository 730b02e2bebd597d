//! Definitions of errors that can occur during the execution of the operator scripts

use std::{
    error::Error,
    fmt::{self, Display, Formatter},
};

/// Errors that can occur during the execution of the operator scripts
#[derive(Debug)]
pub enum ScriptError {
    /// The network identifier is not one of the supported networks
    UnsupportedNetwork(String),
    /// Error reading a contracts config file
    ReadConfig(String),
    /// Error parsing a contracts config file
    ParseConfig(String),
    /// Error writing a contracts config file
    WriteConfig(String),
    /// A contract name was not present in the registry
    MissingContract(String),
    /// Several contract names required by a command were not present in the registry
    MissingContracts(Vec<String>),
    /// Error loading or decrypting the signing credential
    Credential(String),
    /// Error initializing the RPC client
    ClientInitialization(String),
    /// The node reported a chain ID other than the one expected for the network
    ChainIdMismatch {
        /// The chain ID expected for the selected network
        expected: u64,
        /// The chain ID reported by the node
        actual: u64,
    },
    /// Error parsing a compilation artifact
    ArtifactParsing(String),
    /// Error constructing calldata for a contract method
    CalldataConstruction(String),
    /// Error deploying a contract
    ContractDeployment(String),
    /// Error calling a contract method
    ContractInteraction(String),
    /// A transaction was included on-chain but reverted
    Reverted(String),
    /// A checkable precondition of a routine did not hold
    PreconditionFailed(String),
    /// A row of a CSV input could not be read or coerced
    CsvInput {
        /// The 1-based index of the offending row
        row: usize,
        /// A description of the failure
        reason: String,
    },
    /// Error reading operator input from the terminal
    Prompt(String),
}

impl Display for ScriptError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ScriptError::UnsupportedNetwork(s) => write!(f, "network not supported: {}", s),
            ScriptError::ReadConfig(s) => write!(f, "error reading contracts config: {}", s),
            ScriptError::ParseConfig(s) => write!(f, "error parsing contracts config: {}", s),
            ScriptError::WriteConfig(s) => write!(f, "error writing contracts config: {}", s),
            ScriptError::MissingContract(s) => write!(f, "contract `{}` not found in config", s),
            ScriptError::MissingContracts(names) => {
                write!(f, "contracts not found in config: {}", names.join(", "))
            }
            ScriptError::Credential(s) => write!(f, "error loading credential: {}", s),
            ScriptError::ClientInitialization(s) => write!(f, "error initializing client: {}", s),
            ScriptError::ChainIdMismatch { expected, actual } => write!(
                f,
                "node reports chain ID {} but the network expects {}",
                actual, expected
            ),
            ScriptError::ArtifactParsing(s) => write!(f, "error parsing artifact: {}", s),
            ScriptError::CalldataConstruction(s) => write!(f, "error constructing calldata: {}", s),
            ScriptError::ContractDeployment(s) => write!(f, "error deploying contract: {}", s),
            ScriptError::ContractInteraction(s) => {
                write!(f, "error interacting with contract: {}", s)
            }
            ScriptError::Reverted(s) => write!(f, "transaction reverted: {}", s),
            ScriptError::PreconditionFailed(s) => write!(f, "precondition failed: {}", s),
            ScriptError::CsvInput { row, reason } => {
                write!(f, "invalid CSV input at row {}: {}", row, reason)
            }
            ScriptError::Prompt(s) => write!(f, "error reading operator input: {}", s),
        }
    }
}

impl Error for ScriptError {}
