//! CSV-driven batches: one transaction (or a fixed group of them) per input row
//!
//! Rows are processed strictly in file order and a batch stops at the first
//! failure. Nothing is checkpointed: after an interruption the operator reruns
//! with `--skip` set to the number of rows already processed, which the error
//! log reports.

use alloy::primitives::{Address, U256};
use tracing::{error, info};

use crate::{
    cli::{AppendInvestorsArgs, CsvBatchArgs, DistributeArgs},
    constants::{INVESTORS_CLAIM_KEY, SOV_KEY, VESTING_REGISTRY_KEY},
    context::ScriptContext,
    contracts::{Erc20, InvestorsClaim, VestingRegistry},
    csv_input::{read_amounts, read_vestings, AmountRow, VestingKind, VestingRow},
    errors::ScriptError,
    preconditions::{ensure_balance, ensure_investor_list_loaded},
    utils::format_token_amount,
};

/// Transfer tokens from the operator's account to every listed account
pub async fn distribute(args: DistributeArgs, ctx: &ScriptContext) -> Result<(), ScriptError> {
    let rows = read_amounts(&args.batch.csv)?;
    let rows = remaining_rows(&rows, args.batch.skip)?;

    let token: Erc20 = ctx.contract(&args.token)?;
    let total = total_amount(rows.iter().map(|row| row.amount));
    ensure_balance(&token, ctx.sender, total).await?;
    info!(
        "Distributing {} {} over {} rows",
        format_token_amount(total),
        args.token,
        rows.len()
    );

    for (row_number, AmountRow { account, amount }) in numbered(rows, args.batch.skip) {
        ctx.send(token.transfer(*account, *amount))
            .await
            .inspect_err(|_| report_failure(row_number))?;

        info!("Row {row_number} done");
        println!(
            "{}: sent {} {} to {:#x}",
            row_number,
            format_token_amount(*amount),
            args.token,
            account
        );
    }

    Ok(())
}

/// Create a vesting contract for every listed receiver and stake its tokens
/// from the vesting registry's balance
pub async fn create_vestings(args: CsvBatchArgs, ctx: &ScriptContext) -> Result<(), ScriptError> {
    let rows = read_vestings(&args.csv)?;
    let rows = remaining_rows(&rows, args.skip)?;

    let registry: VestingRegistry = ctx.contract(VESTING_REGISTRY_KEY)?;
    let sov: Erc20 = ctx.contract(SOV_KEY)?;
    let total = total_amount(rows.iter().map(|row| row.amount));
    ensure_balance(&sov, *registry.address(), total).await?;
    info!(
        "Creating {} vestings holding {} SOV",
        rows.len(),
        format_token_amount(total)
    );

    for (row_number, row) in numbered(rows, args.skip) {
        let vesting = create_vesting(&registry, row, ctx)
            .await
            .inspect_err(|_| report_failure(row_number))?;

        info!("Row {row_number} done");
        println!(
            "{}: vesting {:#x} for {:#x} holding {} SOV",
            row_number,
            vesting,
            row.receiver,
            format_token_amount(row.amount)
        );
    }

    Ok(())
}

/// Create a single vesting contract and stake its tokens, returning its address
async fn create_vesting(
    registry: &VestingRegistry,
    row: &VestingRow,
    ctx: &ScriptContext,
) -> Result<Address, ScriptError> {
    let VestingRow {
        receiver,
        amount,
        cliff,
        duration,
        kind,
    } = *row;

    let vesting = match kind {
        VestingKind::Regular => {
            ctx.send(registry.createVesting(receiver, amount, cliff, duration))
                .await?;
            registry.getVesting(receiver).call().await
        }
        VestingKind::Team => {
            ctx.send(registry.createTeamVesting(receiver, amount, cliff, duration))
                .await?;
            registry.getTeamVesting(receiver).call().await
        }
    }
    .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?;

    if vesting == Address::ZERO {
        return Err(ScriptError::ContractInteraction(format!(
            "no vesting registered for {receiver:#x}"
        )));
    }

    ctx.send(registry.stakeTokens(vesting, amount)).await?;
    Ok(vesting)
}

/// Load the investors list into the claim contract in a single call
pub async fn append_investors(
    args: AppendInvestorsArgs,
    ctx: &ScriptContext,
) -> Result<(), ScriptError> {
    let rows = read_amounts(&args.csv)?;
    if rows.is_empty() {
        return Err(ScriptError::CsvInput {
            row: 0,
            reason: "no investors listed".to_string(),
        });
    }

    let claim: InvestorsClaim = ctx.contract(INVESTORS_CLAIM_KEY)?;
    let initialized = claim
        .investorsListInitialized()
        .call()
        .await
        .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?;
    if initialized {
        return Err(ScriptError::PreconditionFailed(
            "investors list is already initialized".to_string(),
        ));
    }

    let total = total_amount(rows.iter().map(|row| row.amount));
    let (investors, amounts): (Vec<_>, Vec<_>) =
        rows.into_iter().map(|row| (row.account, row.amount)).unzip();
    let count = investors.len();

    ctx.send(claim.appendInvestorsAmountsList(investors, amounts))
        .await?;

    println!(
        "Appended {} investors owed {} SOV in total",
        count,
        format_token_amount(total)
    );
    Ok(())
}

/// Mark the investors list as complete, opening claims
pub async fn init_investor_claims(ctx: &ScriptContext) -> Result<(), ScriptError> {
    let claim: InvestorsClaim = ctx.contract(INVESTORS_CLAIM_KEY)?;
    ensure_investor_list_loaded(&claim).await?;

    ctx.send(claim.setInvestorsAmountsListInitialized()).await?;
    println!("Investors list initialized");
    Ok(())
}

/// The rows left to process after skipping the first `skip`
fn remaining_rows<T>(rows: &[T], skip: usize) -> Result<&[T], ScriptError> {
    rows.get(skip..).ok_or_else(|| ScriptError::CsvInput {
        row: skip,
        reason: format!("cannot skip {} rows of {}", skip, rows.len()),
    })
}

/// Pair each remaining row with its 1-based row number in the input file
fn numbered<T>(rows: &[T], skip: usize) -> impl Iterator<Item = (usize, &T)> {
    rows.iter().enumerate().map(move |(i, row)| (skip + i + 1, row))
}

/// Sum the amounts a batch will move
fn total_amount(amounts: impl Iterator<Item = U256>) -> U256 {
    amounts.fold(U256::ZERO, |total, amount| total.saturating_add(amount))
}

/// Log how to resume a batch that failed at `row_number`
fn report_failure(row_number: usize) {
    error!(
        "Row {} failed, rows before it are done; rerun with `--skip {}` to resume",
        row_number,
        row_number - 1
    );
}

#[cfg(test)]
mod tests {
    use alloy::primitives::U256;

    use super::{numbered, remaining_rows, total_amount};
    use crate::errors::ScriptError;

    #[test]
    fn test_skip_rows() {
        let rows = ["a", "b", "c"];

        assert_eq!(remaining_rows(&rows, 0).unwrap(), &rows);
        assert_eq!(remaining_rows(&rows, 2).unwrap(), &["c"]);
        assert!(remaining_rows(&rows, 3).unwrap().is_empty());
        assert!(matches!(
            remaining_rows(&rows, 4),
            Err(ScriptError::CsvInput { row: 4, .. })
        ));
    }

    #[test]
    fn test_row_numbers_account_for_skip() {
        let rows = ["a", "b", "c", "d"];
        let remaining = remaining_rows(&rows, 2).unwrap();
        let numbers: Vec<_> = numbered(remaining, 2).collect();

        assert_eq!(numbers, vec![(3, &"c"), (4, &"d")]);
    }

    #[test]
    fn test_total_amount() {
        let amounts = [U256::from(10), U256::from(25), U256::from(7)];
        assert_eq!(total_amount(amounts.into_iter()), U256::from(42));
        assert_eq!(total_amount(std::iter::empty()), U256::ZERO);
    }
}
