//! Integration tests for the operator scripts. These assume that a development
//! node is already running locally with the protocol deployed.

use std::path::Path;

use clap::Parser;
use cli::{Cli, Tests};
use colored::Colorize;
use eyre::{eyre, Result};
use scripts::{context::ScriptContext, network::Network};
use tests::{
    test_deploy_wiring, test_missing_key_before_dispatch, test_multisig_no_dedup, test_registry_lookups,
    test_stakes_idempotent, test_transaction_limits_order,
};
use utils::connect;

mod abis;
mod cli;
mod tests;
mod utils;

#[tokio::main]
async fn main() -> Result<()> {
    let Cli {
        test,
        config_dir,
        rpc_url,
        wiring_artifact,
    } = Cli::parse();

    tracing_subscriber::fmt().pretty().init();

    let ctx = connect(Network::Development, &config_dir, &rpc_url).await?;
    let tests = match test {
        Some(test) => vec![test],
        None => Tests::ALL.to_vec(),
    };

    println!("{}", "=== Running Integration Tests ===".bright_yellow().bold());
    let mut failed = 0;
    for test in tests {
        match run_test(test, &ctx, &wiring_artifact).await {
            Ok(()) => println!("  {} {:?}", "✓".green(), test),
            Err(e) => {
                failed += 1;
                println!("  {} {:?}: {}", "✗".red(), test, e);
            }
        }
    }

    if failed > 0 {
        return Err(eyre!("{failed} integration test(s) failed"));
    }

    Ok(())
}

/// Run a single test
async fn run_test(test: Tests, ctx: &ScriptContext, wiring_artifact: &Path) -> Result<()> {
    match test {
        Tests::RegistryLookups => test_registry_lookups(ctx).await,
        Tests::TransactionLimitsOrder => test_transaction_limits_order(ctx).await,
        Tests::StakesIdempotent => test_stakes_idempotent(ctx).await,
        Tests::MultisigNoDedup => test_multisig_no_dedup(ctx).await,
        Tests::MissingKeyBeforeDispatch => test_missing_key_before_dispatch(ctx).await,
        Tests::DeployWiring => test_deploy_wiring(ctx, wiring_artifact).await,
    }
}
