//! Read-only routines, printing what they read and signing nothing

use std::{
    fmt::{self, Display},
    time::{SystemTime, UNIX_EPOCH},
};

use alloy::{
    primitives::{aliases::U96, Address, U256},
    providers::Provider,
};
use itertools::Itertools;

use crate::{
    cli::{BalancesArgs, StakesArgs, VotingPowerArgs, WeightArgs},
    constants::{LOAN_TOKENS, STAKING_KEY},
    context::ScriptContext,
    contracts::{Erc20, LoanToken, Staking},
    errors::ScriptError,
    transactions::read_batch,
    utils::format_token_amount,
};

/// The transaction limit of a loan token for one asset
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransactionLimit {
    /// Registry name of the loan token
    pub loan_token: String,
    /// Registry name of the asset
    pub asset: String,
    /// The limit in base units
    pub limit: U256,
}

impl Display for TransactionLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}): {}",
            self.loan_token,
            self.asset,
            format_token_amount(self.limit)
        )
    }
}

/// The stakes of a user, one amount per lock date
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Stakes {
    /// The lock dates, as unix timestamps
    pub dates: Vec<U256>,
    /// The amount staked until each date
    pub amounts: Vec<U96>,
}

impl Display for Stakes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.dates.is_empty() {
            return write!(f, "no stakes");
        }

        let lines = self
            .dates
            .iter()
            .zip(&self.amounts)
            .map(|(date, amount)| {
                format!(
                    "until {}: {}",
                    date,
                    format_token_amount(U256::from(*amount))
                )
            })
            .join("\n");
        write!(f, "{lines}")
    }
}

/// Print the transaction limit of every known loan token
pub async fn transaction_limits(ctx: &ScriptContext) -> Result<(), ScriptError> {
    for limit in read_transaction_limits(ctx).await? {
        println!("{limit}");
    }

    Ok(())
}

/// Read the transaction limit of every known loan token, in a fixed order
pub async fn read_transaction_limits(
    ctx: &ScriptContext,
) -> Result<Vec<TransactionLimit>, ScriptError> {
    read_batch(LOAN_TOKENS, |(loan_token, asset)| async move {
        let contract: LoanToken = ctx.contract(loan_token)?;
        let limit = contract
            .transactionLimit(ctx.address(asset)?)
            .call()
            .await
            .map_err(|e| ScriptError::ContractInteraction(format!("{loan_token}: {e}")))?;

        Ok(TransactionLimit {
            loan_token: loan_token.to_string(),
            asset: asset.to_string(),
            limit,
        })
    })
    .await
}

/// Print the stakes of a user
pub async fn stakes(args: StakesArgs, ctx: &ScriptContext) -> Result<(), ScriptError> {
    let stakes = read_stakes(ctx, args.user).await?;
    println!("Stakes of {:#x}:\n{}", args.user, stakes);
    Ok(())
}

/// Read the stakes of a user
pub async fn read_stakes(ctx: &ScriptContext, user: Address) -> Result<Stakes, ScriptError> {
    let staking: Staking = ctx.contract(STAKING_KEY)?;
    let stakes = staking
        .getStakes(user)
        .call()
        .await
        .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?;

    Ok(Stakes {
        dates: stakes.dates,
        amounts: stakes.stakes,
    })
}

/// Print the voting power of a user at a past block
pub async fn voting_power(args: VotingPowerArgs, ctx: &ScriptContext) -> Result<(), ScriptError> {
    let staking: Staking = ctx.contract(STAKING_KEY)?;

    // Prior votes are only defined for mined blocks
    let block = match args.block {
        Some(block) => block,
        None => ctx
            .provider
            .get_block_number()
            .await
            .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?
            .saturating_sub(1),
    };
    let date = match args.date {
        Some(date) => date,
        None => now()?,
    };

    let votes = staking
        .getPriorVotes(args.user, U256::from(block), U256::from(date))
        .call()
        .await
        .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?;

    println!(
        "Voting power of {:#x} at block {}: {}",
        args.user,
        block,
        format_token_amount(U256::from(votes))
    );
    Ok(())
}

/// Print the weight a stake locked until a given date carries
pub async fn weight(args: WeightArgs, ctx: &ScriptContext) -> Result<(), ScriptError> {
    let staking: Staking = ctx.contract(STAKING_KEY)?;
    let start_date = match args.start_date {
        Some(start_date) => start_date,
        None => now()?,
    };

    let weight = staking
        .computeWeightByDate(U256::from(args.date), U256::from(start_date))
        .call()
        .await
        .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?;

    println!("Weight of lock date {}: {}", args.date, weight);
    Ok(())
}

/// Print the token balance of each account
pub async fn balances(args: BalancesArgs, ctx: &ScriptContext) -> Result<(), ScriptError> {
    let token: Erc20 = ctx.contract(&args.token)?;

    let balances = read_batch(args.accounts.iter().copied(), |account| {
        let token = &token;
        async move {
            token
                .balanceOf(account)
                .call()
                .await
                .map_err(|e| ScriptError::ContractInteraction(format!("{account:#x}: {e}")))
        }
    })
    .await?;

    for (account, balance) in args.accounts.iter().zip(balances) {
        println!("{:#x}: {} {}", account, format_token_amount(balance), args.token);
    }

    Ok(())
}

/// The current unix timestamp
fn now() -> Result<u64, ScriptError> {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .map_err(|e| ScriptError::PreconditionFailed(e.to_string()))
}

#[cfg(test)]
mod tests {
    use alloy::primitives::{aliases::U96, utils::parse_ether, U256};

    use super::{Stakes, TransactionLimit};

    #[test]
    fn test_display_limit() {
        let limit = TransactionLimit {
            loan_token: "iDOC".to_string(),
            asset: "DoC".to_string(),
            limit: parse_ether("5000").unwrap(),
        };
        assert_eq!(limit.to_string(), "iDOC (DoC): 5000.000000000000000000");
    }

    #[test]
    fn test_display_stakes() {
        let stakes = Stakes {
            dates: vec![U256::from(1_700_000_000u64), U256::from(1_710_000_000u64)],
            amounts: vec![U96::from(10u64).pow(U96::from(18u64)), U96::ZERO],
        };
        let lines: Vec<String> = stakes.to_string().lines().map(String::from).collect();

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "until 1700000000: 1.000000000000000000");

        let empty = Stakes {
            dates: vec![],
            amounts: vec![],
        };
        assert_eq!(empty.to_string(), "no stakes");
    }
}
