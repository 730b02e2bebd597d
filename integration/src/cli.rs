//! Definition of the CLI arguments for integration tests

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use scripts::constants::{DEFAULT_CONFIG_DIR, DEVELOPMENT_RPC_URL};

/// CLI tool for running integration tests against a running development node.
///
/// Assumes the contracts have already been deployed to the node and recorded
/// in `development_contracts.json`, and that the development account is an
/// owner of the multisig.
#[derive(Parser)]
pub(crate) struct Cli {
    /// Test to run, all tests are run if omitted
    #[arg(short, long)]
    pub(crate) test: Option<Tests>,

    /// Directory holding the contracts config files
    #[arg(short, long, default_value = DEFAULT_CONFIG_DIR)]
    pub(crate) config_dir: PathBuf,

    /// Devnet RPC URL
    #[arg(short, long, default_value = DEVELOPMENT_RPC_URL)]
    pub(crate) rpc_url: String,

    /// Foundry artifact of `integration/contracts/WiringTarget.sol`, deployed
    /// by the deploy wiring test
    #[arg(long, default_value = DEFAULT_WIRING_ARTIFACT)]
    pub(crate) wiring_artifact: PathBuf,
}

/// Where `forge build` places the wiring test contract's artifact
const DEFAULT_WIRING_ARTIFACT: &str = "out/WiringTarget.sol/WiringTarget.json";

#[derive(ValueEnum, Clone, Copy, Debug)]
pub(crate) enum Tests {
    RegistryLookups,
    TransactionLimitsOrder,
    StakesIdempotent,
    MultisigNoDedup,
    MissingKeyBeforeDispatch,
    DeployWiring,
}

impl Tests {
    /// Every test, in the order they run by default
    pub(crate) const ALL: [Tests; 6] = [
        Tests::RegistryLookups,
        Tests::TransactionLimitsOrder,
        Tests::StakesIdempotent,
        Tests::MultisigNoDedup,
        Tests::MissingKeyBeforeDispatch,
        Tests::DeployWiring,
    ];
}
