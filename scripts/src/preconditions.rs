//! Checkable preconditions, read from chain state before a routine writes
//! anything

use alloy::{
    primitives::{Address, U256},
    providers::Provider,
};

use crate::{
    contracts::{Erc20, InvestorsClaim, Ownable, Wallet},
    errors::ScriptError,
    network::Network,
    utils::format_token_amount,
};

/// Check that the node serves the chain the network expects
pub async fn ensure_chain_id(provider: &Wallet, network: Network) -> Result<(), ScriptError> {
    let Some(expected) = network.expected_chain_id() else {
        return Ok(());
    };

    let actual = provider
        .get_chain_id()
        .await
        .map_err(|e| ScriptError::ClientInitialization(e.to_string()))?;

    check_chain_id(expected, actual)
}

/// Compare a reported chain ID against the expected one
pub fn check_chain_id(expected: u64, actual: u64) -> Result<(), ScriptError> {
    if expected == actual {
        Ok(())
    } else {
        Err(ScriptError::ChainIdMismatch { expected, actual })
    }
}

/// Check that `expected` is the current owner of an `Ownable` contract
pub async fn ensure_owner(contract: &Ownable, expected: Address) -> Result<(), ScriptError> {
    let owner = contract
        .owner()
        .call()
        .await
        .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?;

    if owner != expected {
        return Err(ScriptError::PreconditionFailed(format!(
            "{:#x} is owned by {:#x}, not {:#x}",
            contract.address(),
            owner,
            expected
        )));
    }

    Ok(())
}

/// Check that `holder` holds at least `required` of a token
pub async fn ensure_balance(
    token: &Erc20,
    holder: Address,
    required: U256,
) -> Result<(), ScriptError> {
    let balance = token
        .balanceOf(holder)
        .call()
        .await
        .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?;

    check_balance(holder, balance, required)
}

/// Compare a holder's balance against the amount a routine will spend
pub fn check_balance(holder: Address, balance: U256, required: U256) -> Result<(), ScriptError> {
    if balance < required {
        return Err(ScriptError::PreconditionFailed(format!(
            "{:#x} holds {} tokens but {} are needed",
            holder,
            format_token_amount(balance),
            format_token_amount(required)
        )));
    }

    Ok(())
}

/// Check that the investors list has been loaded into the claim contract and
/// not yet marked as initialized
pub async fn ensure_investor_list_loaded(claim: &InvestorsClaim) -> Result<(), ScriptError> {
    let qty = claim
        .investorsQty()
        .call()
        .await
        .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?;
    let initialized = claim
        .investorsListInitialized()
        .call()
        .await
        .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?;

    check_investor_list(qty, initialized)
}

/// Decide whether the investors list may be marked as initialized
pub fn check_investor_list(qty: U256, initialized: bool) -> Result<(), ScriptError> {
    if initialized {
        return Err(ScriptError::PreconditionFailed(
            "investors list is already initialized".to_string(),
        ));
    }
    if qty.is_zero() {
        return Err(ScriptError::PreconditionFailed(
            "no investors have been loaded, run `append-investors` first".to_string(),
        ));
    }

    Ok(())
}
