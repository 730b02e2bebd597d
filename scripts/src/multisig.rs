//! Relaying writes through the multisig wallet
//!
//! A relayed write is encoded into raw calldata and submitted as a proposal.
//! The state change itself only happens once enough owners have confirmed
//! it, which is outside the scope of a single run.

use std::fmt::{self, Display};

use alloy::primitives::{Address, Bytes, Log, U256};
use alloy::sol_types::SolEvent;
use tracing::info;

use crate::{
    constants::MULTISIG_KEY,
    context::ScriptContext,
    contracts::MultiSig,
    errors::ScriptError,
    solidity::IMultiSigWallet::Submission,
};

/// The on-chain state of a multisig proposal
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProposalStatus {
    /// The proposal identifier
    pub id: U256,
    /// The contract the proposal calls
    pub destination: Address,
    /// The native value the proposal transfers
    pub value: U256,
    /// The calldata of the proposal
    pub data: Bytes,
    /// Whether the proposal has been executed
    pub executed: bool,
    /// The number of owners that confirmed the proposal
    pub confirmations: U256,
    /// The number of confirmations needed to execute
    pub required: U256,
}

impl Display for ProposalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Proposal {}", self.id)?;
        writeln!(f, "\tdestination: {:#x}", self.destination)?;
        writeln!(f, "\tvalue: {}", self.value)?;
        writeln!(f, "\tdata: {}", self.data)?;
        writeln!(f, "\tconfirmations: {}/{}", self.confirmations, self.required)?;
        write!(f, "\texecuted: {}", self.executed)
    }
}

/// Submit a call to `target` as a multisig proposal, returning the proposal ID
///
/// Every submission creates a new proposal, even if identical calldata was
/// submitted before.
pub async fn submit(
    ctx: &ScriptContext,
    target: Address,
    value: U256,
    calldata: Bytes,
) -> Result<U256, ScriptError> {
    let multisig: MultiSig = ctx.contract(MULTISIG_KEY)?;
    info!(
        "Submitting call to {:#x} through multisig {:#x}",
        target,
        multisig.address()
    );

    let receipt = ctx
        .send(multisig.submitTransaction(target, value, calldata))
        .await?;

    proposal_id_from_logs(
        *multisig.address(),
        receipt.inner.logs().iter().map(|log| &log.inner),
    )
}

/// Confirm a pending proposal as the sending owner
pub async fn confirm(ctx: &ScriptContext, id: U256) -> Result<(), ScriptError> {
    let multisig: MultiSig = ctx.contract(MULTISIG_KEY)?;
    ctx.send(multisig.confirmTransaction(id)).await?;
    Ok(())
}

/// Execute a proposal that has gathered enough confirmations
pub async fn execute(ctx: &ScriptContext, id: U256) -> Result<(), ScriptError> {
    let multisig: MultiSig = ctx.contract(MULTISIG_KEY)?;

    let status = status(ctx, id).await?;
    if status.executed {
        return Err(ScriptError::PreconditionFailed(format!(
            "proposal {id} is already executed"
        )));
    }
    if status.confirmations < status.required {
        return Err(ScriptError::PreconditionFailed(format!(
            "proposal {} has {}/{} confirmations",
            id, status.confirmations, status.required
        )));
    }

    ctx.send(multisig.executeTransaction(id)).await?;
    Ok(())
}

/// Read the state of a proposal
pub async fn status(ctx: &ScriptContext, id: U256) -> Result<ProposalStatus, ScriptError> {
    let multisig: MultiSig = ctx.contract(MULTISIG_KEY)?;

    let count = multisig
        .transactionCount()
        .call()
        .await
        .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?;
    if id >= count {
        return Err(ScriptError::PreconditionFailed(format!(
            "proposal {id} does not exist, the multisig has {count} proposals"
        )));
    }

    let tx = multisig
        .transactions(id)
        .call()
        .await
        .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?;
    let confirmations = multisig
        .getConfirmationCount(id)
        .call()
        .await
        .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?;
    let required = multisig
        .required()
        .call()
        .await
        .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?;

    Ok(ProposalStatus {
        id,
        destination: tx.destination,
        value: tx.value,
        data: tx.data,
        executed: tx.executed,
        confirmations,
        required,
    })
}

/// Find the proposal ID in the `Submission` event emitted by the multisig
pub fn proposal_id_from_logs<'a>(
    multisig: Address,
    logs: impl IntoIterator<Item = &'a Log>,
) -> Result<U256, ScriptError> {
    logs.into_iter()
        .filter(|log| log.address == multisig)
        .find_map(|log| Submission::decode_log_data(&log.data).ok())
        .map(|event| event.transactionId)
        .ok_or_else(|| {
            ScriptError::ContractInteraction(
                "multisig did not emit a Submission event".to_string(),
            )
        })
}
