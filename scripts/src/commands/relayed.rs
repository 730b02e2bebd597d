//! Writes relayed through the multisig, and the proposal lifecycle

use alloy::{
    primitives::{Address, Bytes, U256},
    sol_types::SolCall,
};

use crate::{
    cli::{MultisigSubmitArgs, MultisigTransferArgs, ProposalArgs, SetTransactionLimitArgs},
    constants::MULTISIG_KEY,
    context::ScriptContext,
    contracts::Erc20,
    errors::ScriptError,
    multisig,
    preconditions::ensure_balance,
    solidity::{IERC20, ILoanToken},
    utils::{format_token_amount, parse_hex_bytes, parse_token_amount},
};

/// Propose setting the transaction limit of a loan token for one asset
pub async fn set_transaction_limit(
    args: SetTransactionLimitArgs,
    ctx: &ScriptContext,
) -> Result<(), ScriptError> {
    let limit = parse_token_amount(&args.limit).map_err(ScriptError::CalldataConstruction)?;
    let loan_token = ctx.address(&args.loan_token)?;
    let asset = ctx.address(args.underlying()?)?;

    let calldata = transaction_limit_calldata(asset, limit);
    let id = multisig::submit(ctx, loan_token, U256::ZERO, calldata).await?;

    println!(
        "Proposal {} submitted: set {} limit for {} to {}",
        id,
        args.loan_token,
        args.underlying()?,
        format_token_amount(limit)
    );
    Ok(())
}

/// Propose transferring tokens held by the multisig
pub async fn multisig_transfer(
    args: MultisigTransferArgs,
    ctx: &ScriptContext,
) -> Result<(), ScriptError> {
    let amount = parse_token_amount(&args.amount).map_err(ScriptError::CalldataConstruction)?;
    let token: Erc20 = ctx.contract(&args.token)?;
    ensure_balance(&token, ctx.address(MULTISIG_KEY)?, amount).await?;

    let calldata = transfer_calldata(args.to, amount);
    let id = multisig::submit(ctx, *token.address(), U256::ZERO, calldata).await?;

    println!(
        "Proposal {} submitted: transfer {} {} to {:#x}",
        id,
        format_token_amount(amount),
        args.token,
        args.to
    );
    Ok(())
}

/// Propose an arbitrary pre-encoded call
pub async fn multisig_submit(
    args: MultisigSubmitArgs,
    ctx: &ScriptContext,
) -> Result<(), ScriptError> {
    let target = ctx.address(&args.target)?;
    let calldata = parse_hex_bytes(&args.calldata)?;
    let value = parse_token_amount(&args.value).map_err(ScriptError::CalldataConstruction)?;

    let id = multisig::submit(ctx, target, value, calldata).await?;
    println!("Proposal {} submitted: call to {} ({:#x})", id, args.target, target);
    Ok(())
}

/// Confirm a proposal as the operator
pub async fn multisig_confirm(args: ProposalArgs, ctx: &ScriptContext) -> Result<(), ScriptError> {
    multisig::confirm(ctx, U256::from(args.id)).await?;
    println!("Proposal {} confirmed", args.id);
    Ok(())
}

/// Execute a proposal with enough confirmations
pub async fn multisig_execute(args: ProposalArgs, ctx: &ScriptContext) -> Result<(), ScriptError> {
    multisig::execute(ctx, U256::from(args.id)).await?;
    println!("Proposal {} executed", args.id);
    Ok(())
}

/// Print the state of a proposal
pub async fn multisig_status(args: ProposalArgs, ctx: &ScriptContext) -> Result<(), ScriptError> {
    let status = multisig::status(ctx, U256::from(args.id)).await?;
    println!("{status}");
    Ok(())
}

/// Calldata of a `setTransactionLimits` call for a single asset
fn transaction_limit_calldata(asset: Address, limit: U256) -> Bytes {
    ILoanToken::setTransactionLimitsCall {
        addresses: vec![asset],
        limits: vec![limit],
    }
    .abi_encode()
    .into()
}

/// Calldata of an ERC20 `transfer` call
fn transfer_calldata(to: Address, amount: U256) -> Bytes {
    IERC20::transferCall { to, value: amount }.abi_encode().into()
}

#[cfg(test)]
mod tests {
    use alloy::{
        primitives::{keccak256, Address, U256},
        sol_types::SolCall,
    };

    use super::{transaction_limit_calldata, transfer_calldata};
    use crate::solidity::{IERC20, ILoanToken};

    #[test]
    fn test_transaction_limit_calldata() {
        let asset = Address::repeat_byte(0x42);
        let limit = U256::from(5000);
        let calldata = transaction_limit_calldata(asset, limit);

        let selector = keccak256("setTransactionLimits(address[],uint256[])");
        assert_eq!(&calldata[..4], &selector[..4]);

        let call = ILoanToken::setTransactionLimitsCall::abi_decode(&calldata).unwrap();
        assert_eq!(call.addresses, vec![asset]);
        assert_eq!(call.limits, vec![limit]);
    }

    #[test]
    fn test_transfer_calldata() {
        let to = Address::repeat_byte(0x07);
        let calldata = transfer_calldata(to, U256::from(10));

        assert_eq!(&calldata[..4], IERC20::transferCall::SELECTOR.as_slice());
        // selector, then two 32-byte words
        assert_eq!(calldata.len(), 4 + 64);
    }
}
