//! Helpers for dispatching reads and transactions against bound contracts
//!
//! Every write blocks until its receipt is available. Nothing here retries: a
//! failed send or a reverted receipt is returned to the caller as-is.

use std::future::Future;

use alloy::{
    contract::{CallBuilder, CallDecoder},
    network::{Ethereum, TransactionBuilder},
    providers::{PendingTransactionBuilder, Provider},
    rpc::types::{TransactionReceipt, TransactionRequest},
};
use tracing::info;

use crate::{contracts::Wallet, errors::ScriptError};

/// The call builder type produced by the contract handles
pub type ScriptCallBuilder<'a, C> = CallBuilder<&'a Wallet, C, Ethereum>;

/// How transactions are priced and confirmed
#[derive(Copy, Clone, Debug)]
pub struct TxSettings {
    /// The number of confirmations to wait for after inclusion
    pub confirmations: u64,
    /// The legacy gas price to attach, for networks without EIP-1559 fees
    pub gas_price: Option<u128>,
}

/// Send a contract call as a signed transaction and wait for its receipt.
///
/// Returns an error if the transaction could not be sent or if it reverted.
pub async fn send_tx<C: CallDecoder>(
    tx: ScriptCallBuilder<'_, C>,
    settings: TxSettings,
) -> Result<TransactionReceipt, ScriptError> {
    let tx = match settings.gas_price {
        Some(gas_price) => tx.gas_price(gas_price),
        None => tx,
    };

    let pending_tx = tx
        .send()
        .await
        .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?;

    wait_for_receipt(pending_tx, settings.confirmations).await
}

/// Send a raw transaction request, e.g. a deployment or a call with
/// pre-encoded calldata, and wait for its receipt
pub async fn send_request(
    provider: &Wallet,
    request: TransactionRequest,
    settings: TxSettings,
) -> Result<TransactionReceipt, ScriptError> {
    let request = match settings.gas_price {
        Some(gas_price) => request.with_gas_price(gas_price),
        None => request,
    };

    let pending_tx = provider
        .send_transaction(request)
        .await
        .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?;

    wait_for_receipt(pending_tx, settings.confirmations).await
}

/// Wait for a pending transaction to be confirmed and check that it succeeded
async fn wait_for_receipt(
    pending_tx: PendingTransactionBuilder<Ethereum>,
    confirmations: u64,
) -> Result<TransactionReceipt, ScriptError> {
    let tx_hash = *pending_tx.tx_hash();
    info!("Sent transaction {:#x}, waiting for confirmation", tx_hash);

    let receipt = pending_tx
        .with_required_confirmations(confirmations)
        .get_receipt()
        .await
        .map_err(|e| ScriptError::ContractInteraction(format!("{:#x}: {}", tx_hash, e)))?;

    if !receipt.status() {
        return Err(ScriptError::Reverted(format!("{:#x}", tx_hash)));
    }

    Ok(receipt)
}

/// Run the same read-only query against each item in turn, returning one
/// result per item in input order
pub async fn read_batch<T, R, F, Fut>(
    items: impl IntoIterator<Item = T>,
    mut query: F,
) -> Result<Vec<R>, ScriptError>
where
    F: FnMut(T) -> Fut,
    Fut: Future<Output = Result<R, ScriptError>>,
{
    let mut results = Vec::new();
    for item in items {
        results.push(query(item).await?);
    }

    Ok(results)
}
