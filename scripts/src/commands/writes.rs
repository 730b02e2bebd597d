//! Direct writes, signed and sent by the operator's own account

use alloy::primitives::{aliases::U96, ruint::UintTryFrom, U256};
use tracing::info;

use crate::{
    cli::{StakeArgs, TransferOwnershipArgs},
    constants::{SOV_KEY, STAKING_KEY},
    context::ScriptContext,
    contracts::{Erc20, Ownable, Staking},
    errors::ScriptError,
    preconditions::{ensure_balance, ensure_owner},
    utils::{format_token_amount, parse_token_amount},
};

/// Approve the staking contract to pull governance tokens, then stake them
pub async fn stake(args: StakeArgs, ctx: &ScriptContext) -> Result<(), ScriptError> {
    let amount = parse_token_amount(&args.amount).map_err(ScriptError::CalldataConstruction)?;
    let stake_amount = to_u96(amount)?;
    let delegatee = args.delegatee.unwrap_or(ctx.sender);

    let staking: Staking = ctx.contract(STAKING_KEY)?;
    let sov: Erc20 = ctx.contract(SOV_KEY)?;
    ensure_balance(&sov, ctx.sender, amount).await?;

    info!("Approving {} SOV for staking", format_token_amount(amount));
    ctx.send(sov.approve(*staking.address(), amount)).await?;

    info!("Staking until {}", args.until);
    ctx.send(staking.stake(stake_amount, U256::from(args.until), ctx.sender, delegatee))
        .await?;

    println!(
        "Staked {} SOV until {}, delegated to {:#x}",
        format_token_amount(amount),
        args.until,
        delegatee
    );
    Ok(())
}

/// Transfer ownership of a registered contract to another registered contract,
/// checking first that the operator currently owns it
pub async fn transfer_ownership(
    args: TransferOwnershipArgs,
    ctx: &ScriptContext,
) -> Result<(), ScriptError> {
    let contract: Ownable = ctx.contract(&args.contract)?;
    let new_owner = ctx.address(&args.to)?;
    ensure_owner(&contract, ctx.sender).await?;

    ctx.send(contract.transferOwnership(new_owner)).await?;

    println!(
        "Ownership of {} transferred to {} ({:#x})",
        args.contract, args.to, new_owner
    );
    Ok(())
}

/// Narrow an amount to the 96 bits the staking contract accounts in
fn to_u96(amount: U256) -> Result<U96, ScriptError> {
    U96::uint_try_from(amount).map_err(|_| {
        ScriptError::CalldataConstruction(format!(
            "{} does not fit in 96 bits",
            format_token_amount(amount)
        ))
    })
}

#[cfg(test)]
mod tests {
    use alloy::primitives::{aliases::U96, utils::parse_ether, U256};

    use super::to_u96;

    #[test]
    fn test_to_u96() {
        let amount = parse_ether("1000.5").unwrap();
        assert_eq!(U256::from(to_u96(amount).unwrap()), amount);

        assert_eq!(to_u96(U256::from(U96::MAX)).unwrap(), U96::MAX);
        assert!(to_u96(U256::from(U96::MAX) + U256::from(1)).is_err());
        assert_eq!(to_u96(U256::ZERO).unwrap(), U96::ZERO);
    }
}
