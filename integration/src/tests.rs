//! Integration tests for the operator scripts

use std::path::Path;

use alloy::{
    hex,
    primitives::{Bytes, U256},
    providers::Provider,
    sol_types::SolCall,
};
use clap::Parser;
use eyre::{bail, ensure, Result};
use itertools::Itertools;
use scripts::{
    cli::{Cli, DeployArgs},
    commands::{
        deploy::deploy,
        reads::{read_stakes, read_transaction_limits},
    },
    constants::{LOAN_TOKENS, MULTISIG_KEY, STAKING_KEY},
    context::ScriptContext,
    errors::ScriptError,
    multisig,
    registry::ContractRegistry,
};

use crate::abis::IWiringTarget::{self, initializeCall};

/// Name the deploy wiring test records its contract under
const WIRING_TARGET_KEY: &str = "WiringTarget";

/// Calldata of an `owner()` call, harmless whatever the target
const OWNER_CALLDATA: [u8; 4] = [0x8d, 0xa5, 0xcb, 0x5b];

/// Every registered contract and every loan token pair resolves to a
/// deployed contract
pub(crate) async fn test_registry_lookups(ctx: &ScriptContext) -> Result<()> {
    let names = LOAN_TOKENS
        .iter()
        .flat_map(|(loan_token, asset)| [*loan_token, *asset])
        .chain([STAKING_KEY, MULTISIG_KEY])
        .collect_vec();
    ctx.registry.require(&names)?;

    for (name, address) in ctx.registry.iter() {
        let code = ctx.provider.get_code_at(address).await?;
        ensure!(!code.is_empty(), "{name} at {address:#x} has no code");
    }

    Ok(())
}

/// Transaction limits are reported once per loan token, in the fixed order
pub(crate) async fn test_transaction_limits_order(ctx: &ScriptContext) -> Result<()> {
    let limits = read_transaction_limits(ctx).await?;

    ensure!(
        limits.len() == LOAN_TOKENS.len(),
        "expected {} limits, got {}",
        LOAN_TOKENS.len(),
        limits.len()
    );
    for (limit, (loan_token, asset)) in limits.iter().zip(LOAN_TOKENS) {
        ensure!(
            limit.loan_token == loan_token && limit.asset == asset,
            "expected {loan_token} ({asset}), got {limit}"
        );
    }

    Ok(())
}

/// Reading stakes twice without writes in between yields the same result
pub(crate) async fn test_stakes_idempotent(ctx: &ScriptContext) -> Result<()> {
    let first = read_stakes(ctx, ctx.sender).await?;
    let second = read_stakes(ctx, ctx.sender).await?;

    ensure!(first == second, "stakes changed between reads:\n{first}\n{second}");
    Ok(())
}

/// Submitting the same call twice creates two distinct proposals
pub(crate) async fn test_multisig_no_dedup(ctx: &ScriptContext) -> Result<()> {
    let target = ctx.address(STAKING_KEY)?;
    let calldata = Bytes::from_static(&OWNER_CALLDATA);

    let first = multisig::submit(ctx, target, U256::ZERO, calldata.clone()).await?;
    let second = multisig::submit(ctx, target, U256::ZERO, calldata.clone()).await?;
    ensure!(
        second == first + U256::from(1),
        "expected consecutive proposals, got {first} and {second}"
    );

    for id in [first, second] {
        let status = multisig::status(ctx, id).await?;
        ensure!(status.destination == target, "proposal {id} targets {:#x}", status.destination);
        ensure!(status.data == calldata, "proposal {id} carries {}", status.data);
    }

    Ok(())
}

/// A command referencing an unregistered contract fails its registry check
/// without sending any transaction
pub(crate) async fn test_missing_key_before_dispatch(ctx: &ScriptContext) -> Result<()> {
    let nonce_before = ctx.provider.get_transaction_count(ctx.sender).await?;

    let registry = ContractRegistry::from_entries(
        ctx.registry
            .iter()
            .filter(|(name, _)| *name != MULTISIG_KEY),
    );
    let cli = Cli::try_parse_from([
        "protocol-scripts",
        "--network",
        "development",
        "set-transaction-limit",
        "--loan-token",
        "iDOC",
        "--limit",
        "1000",
    ])?;

    match registry.require(&cli.command.required_contracts()?) {
        Err(ScriptError::MissingContracts(missing)) => {
            ensure!(missing == [MULTISIG_KEY], "unexpected missing contracts: {missing:?}")
        }
        other => bail!("expected a missing multisig, got {other:?}"),
    }

    let nonce_after = ctx.provider.get_transaction_count(ctx.sender).await?;
    ensure!(nonce_before == nonce_after, "a transaction was sent");
    Ok(())
}

/// Deploying runs the initializer before handing ownership to the multisig,
/// and records the new address in the contracts config
pub(crate) async fn test_deploy_wiring(ctx: &ScriptContext, artifact: &Path) -> Result<()> {
    let multisig = ctx.address(MULTISIG_KEY)?;
    let initial_value = U256::from(4242);
    let init_calldata = initializeCall { newValue: initial_value }.abi_encode();

    let args = DeployArgs {
        artifact: artifact.to_path_buf(),
        name: WIRING_TARGET_KEY.to_string(),
        constructor_args: None,
        init_calldata: Some(hex::encode_prefixed(init_calldata)),
        owner: MULTISIG_KEY.to_string(),
        keep_ownership: false,
    };
    deploy(args, ctx).await?;

    let registry = ContractRegistry::load(&ctx.config_path)?;
    let address = registry.address(WIRING_TARGET_KEY)?;
    let code = ctx.provider.get_code_at(address).await?;
    ensure!(!code.is_empty(), "recorded address {address:#x} has no code");

    let target = IWiringTarget::new(address, ctx.provider.clone());
    let value = target.value().call().await?;
    ensure!(value == initial_value, "initializer not applied, value is {value}");

    let owner = target.owner().call().await?;
    ensure!(owner == multisig, "owner is {owner:#x}, expected multisig {multisig:#x}");

    Ok(())
}
