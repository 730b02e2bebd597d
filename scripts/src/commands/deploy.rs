//! Deploying contracts from compilation artifacts

use alloy::{network::TransactionBuilder, primitives::Bytes, rpc::types::TransactionRequest};
use tracing::info;

use crate::{
    cli::DeployArgs,
    context::ScriptContext,
    contracts::Ownable,
    errors::ScriptError,
    registry::ContractRegistry,
    utils::{parse_hex_bytes, read_artifact_bytecode},
};

/// Deploy a contract, run its initializer, hand its ownership over, and
/// record its address in the contracts config
pub async fn deploy(args: DeployArgs, ctx: &ScriptContext) -> Result<(), ScriptError> {
    let creation_code = creation_code(
        read_artifact_bytecode(&args.artifact)?,
        args.constructor_args.as_deref(),
    )?;
    let init_calldata = args
        .init_calldata
        .as_deref()
        .map(parse_hex_bytes)
        .transpose()?;
    let new_owner = if args.keep_ownership {
        None
    } else {
        Some(ctx.address(&args.owner)?)
    };

    info!("Deploying {} from {}", args.name, args.artifact.display());
    let receipt = ctx
        .send_request(TransactionRequest::default().with_deploy_code(creation_code))
        .await
        .map_err(|e| ScriptError::ContractDeployment(e.to_string()))?;
    let address = receipt.contract_address.ok_or_else(|| {
        ScriptError::ContractDeployment("receipt carries no contract address".to_string())
    })?;

    // Recorded before any follow-up call so the address survives their failure
    ContractRegistry::record(&ctx.config_path, &args.name, address)?;
    println!("{} deployed at {:#x}", args.name, address);

    if let Some(calldata) = init_calldata {
        info!("Initializing {}", args.name);
        ctx.send_request(
            TransactionRequest::default()
                .with_to(address)
                .with_input(calldata),
        )
        .await?;
    }

    if let Some(new_owner) = new_owner {
        let contract: Ownable = ctx.contract_at(address);
        ctx.send(contract.transferOwnership(new_owner)).await?;
        println!(
            "Ownership of {} transferred to {} ({:#x})",
            args.name, args.owner, new_owner
        );
    }

    Ok(())
}

/// Append hex-encoded constructor arguments to a contract's creation code
fn creation_code(bytecode: Bytes, constructor_args: Option<&str>) -> Result<Bytes, ScriptError> {
    let Some(constructor_args) = constructor_args else {
        return Ok(bytecode);
    };

    let mut code = bytecode.to_vec();
    code.extend_from_slice(&parse_hex_bytes(constructor_args)?);
    Ok(code.into())
}

#[cfg(test)]
mod tests {
    use alloy::{
        primitives::{Address, Bytes},
        sol_types::SolValue,
    };

    use super::creation_code;

    #[test]
    fn test_constructor_args_appended() {
        let bytecode = Bytes::from_static(&[0x60, 0x80]);
        let owner = Address::repeat_byte(0x11);
        let args = owner.abi_encode();

        let code = creation_code(bytecode.clone(), Some(&alloy::hex::encode(&args))).unwrap();
        assert_eq!(&code[..2], bytecode.as_ref());
        assert_eq!(&code[2..], args.as_slice());

        assert_eq!(creation_code(bytecode.clone(), None).unwrap(), bytecode);
    }

    #[test]
    fn test_bad_constructor_args() {
        let res = creation_code(Bytes::from_static(&[0x60]), Some("0xnothex"));
        assert!(res.is_err());
    }
}
