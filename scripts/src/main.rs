use clap::Parser;
use scripts::{
    cli::{Cli, Command},
    context::ScriptContext,
    credentials::default_keystore_dir,
    errors::ScriptError,
    network::Environment,
    registry::ContractRegistry,
};
use tracing::warn;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), ScriptError> {
    let Cli {
        network,
        config_dir,
        rpc_url,
        account,
        keystore_dir,
        password,
        confirmations,
        command,
    } = Cli::parse();

    tracing_subscriber::fmt()
        .pretty()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let env = Environment::resolve(network, &config_dir, rpc_url.as_deref(), account.as_deref());

    // Every contract the command touches must be registered before anything is signed
    let registry = load_registry(&env, &command)?;
    registry.require(&command.required_contracts()?)?;

    let keystore_dir = keystore_dir.unwrap_or_else(default_keystore_dir);
    let signer = env.credential.load_signer(&keystore_dir, password.as_deref())?;
    let ctx = ScriptContext::connect(&env, signer, registry, confirmations).await?;

    command.run(&ctx).await
}

/// Load the network's contracts config, starting from an empty one if the
/// command is allowed to create it
fn load_registry(env: &Environment, command: &Command) -> Result<ContractRegistry, ScriptError> {
    if command.creates_config() && !env.config_path.exists() {
        warn!(
            "{} does not exist yet, it will be created",
            env.config_path.display()
        );
        return Ok(ContractRegistry::default());
    }

    ContractRegistry::load(&env.config_path)
}
