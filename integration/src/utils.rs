//! Utilities for running integration tests

use std::path::Path;

use eyre::Result;
use scripts::{
    context::ScriptContext,
    credentials::{default_keystore_dir, CredentialSource},
    network::{Environment, Network},
    registry::ContractRegistry,
};

/// Connect to the development node with the ephemeral development account
pub(crate) async fn connect(
    network: Network,
    config_dir: &Path,
    rpc_url: &str,
) -> Result<ScriptContext> {
    let env = Environment::resolve(network, config_dir, Some(rpc_url), None);
    let registry = ContractRegistry::load(&env.config_path)?;
    let signer = CredentialSource::Ephemeral.load_signer(&default_keystore_dir(), None)?;

    let ctx = ScriptContext::connect(&env, signer, registry, 1 /* confirmations */).await?;
    Ok(ctx)
}
