//! The per-run script context, built once from the resolved environment and
//! passed by reference into every action routine

use std::path::PathBuf;

use alloy::{
    contract::CallDecoder,
    primitives::Address,
    providers::Provider,
    rpc::types::{TransactionReceipt, TransactionRequest},
    signers::local::PrivateKeySigner,
};
use tracing::info;

use crate::{
    contracts::{ContractBinding, Wallet},
    errors::ScriptError,
    network::{Environment, Network},
    preconditions::ensure_chain_id,
    registry::ContractRegistry,
    transactions::{send_request, send_tx, ScriptCallBuilder, TxSettings},
    utils::setup_client,
};

/// Everything an action routine needs: the network, a signing provider, and
/// the contract registry
#[derive(Clone)]
pub struct ScriptContext {
    /// The network the run targets
    pub network: Network,
    /// The contracts config file the registry was loaded from
    pub config_path: PathBuf,
    /// The signing provider
    pub provider: Wallet,
    /// The address transactions are sent from
    pub sender: Address,
    /// The deployed contracts
    pub registry: ContractRegistry,
    /// The number of confirmations to wait for on each transaction
    pub confirmations: u64,
}

impl ScriptContext {
    /// Connect to the environment's node with the given signer, checking that
    /// the node serves the expected chain
    pub async fn connect(
        env: &Environment,
        signer: PrivateKeySigner,
        registry: ContractRegistry,
        confirmations: u64,
    ) -> Result<Self, ScriptError> {
        let sender = signer.address();
        let provider = setup_client(signer, &env.rpc_url)?;
        ensure_chain_id(&provider, env.network).await?;

        info!(
            "Connected to {} at {} as {:#x}",
            env.network, env.rpc_url, sender
        );

        Ok(Self {
            network: env.network,
            config_path: env.config_path.clone(),
            provider,
            sender,
            registry,
            confirmations,
        })
    }

    /// Look up the address of a contract in the registry
    pub fn address(&self, name: &str) -> Result<Address, ScriptError> {
        self.registry.address(name)
    }

    /// Bind a typed handle to the contract registered under `name`
    pub fn contract<T: ContractBinding>(&self, name: &str) -> Result<T, ScriptError> {
        let address = self.registry.address(name)?;
        Ok(T::bind(address, self.provider.clone()))
    }

    /// Bind a typed handle to a contract at an address outside the registry
    pub fn contract_at<T: ContractBinding>(&self, address: Address) -> T {
        T::bind(address, self.provider.clone())
    }

    /// The pricing and confirmation settings for the next transaction
    pub async fn tx_settings(&self) -> Result<TxSettings, ScriptError> {
        let gas_price = if self.network.uses_legacy_gas() {
            let gas_price = self
                .provider
                .get_gas_price()
                .await
                .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?;
            Some(gas_price)
        } else {
            None
        };

        Ok(TxSettings {
            confirmations: self.confirmations,
            gas_price,
        })
    }

    /// Send a contract call as a transaction and wait for it to be confirmed
    pub async fn send<C: CallDecoder>(
        &self,
        tx: ScriptCallBuilder<'_, C>,
    ) -> Result<TransactionReceipt, ScriptError> {
        let settings = self.tx_settings().await?;
        send_tx(tx, settings).await
    }

    /// Send a raw transaction request and wait for it to be confirmed
    pub async fn send_request(
        &self,
        request: TransactionRequest,
    ) -> Result<TransactionReceipt, ScriptError> {
        let settings = self.tx_settings().await?;
        send_request(&self.provider, request, settings).await
    }
}
