//! Row-oriented CSV inputs for the batch routines
//!
//! Columns are positional and files carry no header. Lines whose first
//! non-blank character is `#` are skipped and fields are trimmed. Any row that
//! cannot be coerced aborts the whole read with the offending row number,
//! counted over data rows only so that it lines up with the `--skip` flag of
//! the batch commands.

use std::{fs::File, io::Read, path::Path, str::FromStr};

use alloy::primitives::{Address, U256};
use csv::{ReaderBuilder, StringRecord, Trim};

use crate::{
    constants::{CSV_COMMENT_PREFIX, SECONDS_PER_WEEK, TEAM_VESTING_MARKER},
    errors::ScriptError,
    utils::parse_token_amount,
};

/// An amount of tokens attributed to an account, used both for transfers and
/// for investor claim lists
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AmountRow {
    /// The account receiving or owed the tokens
    pub account: Address,
    /// The amount in base units
    pub amount: U256,
}

/// The kind of vesting contract created for a receiver
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum VestingKind {
    /// A regular, revocation-free vesting
    Regular,
    /// A team vesting, revocable by governance
    Team,
}

/// A vesting schedule to create for a single receiver
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VestingRow {
    /// The owner of the vested tokens
    pub receiver: Address,
    /// The amount in base units
    pub amount: U256,
    /// The cliff in seconds
    pub cliff: U256,
    /// The total duration in seconds
    pub duration: U256,
    /// The kind of vesting contract
    pub kind: VestingKind,
}

/// Read amount rows: `account, amount`
pub fn read_amounts(path: &Path) -> Result<Vec<AmountRow>, ScriptError> {
    read_amounts_from(open(path)?)
}

/// Read amount rows from any reader
pub fn read_amounts_from<R: Read>(reader: R) -> Result<Vec<AmountRow>, ScriptError> {
    read_rows(reader, 2, |record| {
        Ok(AmountRow {
            account: parse_address(&record[0])?,
            amount: parse_token_amount(&record[1])?,
        })
    })
}

/// Read vesting rows: `receiver, amount, cliff_weeks, duration_weeks[, team|regular]`
pub fn read_vestings(path: &Path) -> Result<Vec<VestingRow>, ScriptError> {
    read_vestings_from(open(path)?)
}

/// Read vesting rows from any reader
pub fn read_vestings_from<R: Read>(reader: R) -> Result<Vec<VestingRow>, ScriptError> {
    read_rows(reader, 4, |record| {
        let cliff = parse_weeks(&record[2])?;
        let duration = parse_weeks(&record[3])?;
        if duration < cliff {
            return Err(format!("duration {duration}s is shorter than cliff {cliff}s"));
        }

        let kind = match record.get(4).unwrap_or_default() {
            "" | "regular" => VestingKind::Regular,
            TEAM_VESTING_MARKER => VestingKind::Team,
            other => return Err(format!("unknown vesting kind `{other}`")),
        };

        Ok(VestingRow {
            receiver: parse_address(&record[0])?,
            amount: parse_token_amount(&record[1])?,
            cliff,
            duration,
            kind,
        })
    })
}

/// Open a CSV input file
fn open(path: &Path) -> Result<File, ScriptError> {
    File::open(path).map_err(|e| ScriptError::CsvInput {
        row: 0,
        reason: format!("{}: {}", path.display(), e),
    })
}

/// Read every row of a CSV input, requiring at least `min_columns` columns and
/// converting each with `parse_row`
fn read_rows<R, T, F>(reader: R, min_columns: usize, parse_row: F) -> Result<Vec<T>, ScriptError>
where
    R: Read,
    F: Fn(&StringRecord) -> Result<T, String>,
{
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .comment(Some(CSV_COMMENT_PREFIX))
        .from_reader(reader);

    // The reader only recognizes comments starting in the first column
    reader
        .records()
        .filter(|record| !matches!(record, Ok(record) if is_indented_comment(record)))
        .enumerate()
        .map(|(i, record)| {
            let row = i + 1;
            let record = record.map_err(|e| ScriptError::CsvInput {
                row,
                reason: e.to_string(),
            })?;

            if record.len() < min_columns {
                return Err(ScriptError::CsvInput {
                    row,
                    reason: format!(
                        "expected at least {} columns, found {}",
                        min_columns,
                        record.len()
                    ),
                });
            }

            parse_row(&record).map_err(|reason| ScriptError::CsvInput { row, reason })
        })
        .collect()
}

/// Whether a record is a comment line preceded by whitespace
fn is_indented_comment(record: &StringRecord) -> bool {
    record
        .get(0)
        .is_some_and(|field| field.as_bytes().first() == Some(&CSV_COMMENT_PREFIX))
}

/// Parse an address column
fn parse_address(s: &str) -> Result<Address, String> {
    Address::from_str(s).map_err(|e| format!("invalid address `{s}`: {e}"))
}

/// Parse a column holding a whole number of weeks into seconds
fn parse_weeks(s: &str) -> Result<U256, String> {
    let weeks = s
        .parse::<u64>()
        .map_err(|e| format!("invalid number of weeks `{s}`: {e}"))?;
    Ok(U256::from(weeks) * U256::from(SECONDS_PER_WEEK))
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use alloy::primitives::{address, utils::parse_ether, U256};

    use super::{read_amounts, read_amounts_from, read_vestings, read_vestings_from, VestingKind};
    use crate::{constants::SECONDS_PER_WEEK, errors::ScriptError};

    /// The path of a fixture file shipped with the crate
    fn fixture(name: &str) -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("tests")
            .join("fixtures")
            .join(name)
    }

    #[test]
    fn test_read_amount_fixture() {
        let rows = read_amounts(&fixture("transfers.csv")).unwrap();

        assert_eq!(rows.len(), 3);
        assert_eq!(
            rows[0].account,
            address!("511893483dcc1a9a98f153ec8298b63be010a99f")
        );
        assert_eq!(rows[1].amount, parse_ether("0.25").unwrap());
        assert_eq!(rows[2].amount, parse_ether("7").unwrap());
    }

    #[test]
    fn test_read_vesting_fixture() {
        let rows = read_vestings(&fixture("vestings.csv")).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].kind, VestingKind::Regular);
        assert_eq!(rows[0].cliff, U256::from(4 * SECONDS_PER_WEEK));
        assert_eq!(rows[0].duration, U256::from(104 * SECONDS_PER_WEEK));
        assert_eq!(rows[1].kind, VestingKind::Team);
        assert_eq!(rows[1].amount, parse_ether("2500.5").unwrap());
    }

    #[test]
    fn test_short_row_reports_row_number() {
        let input = "0x511893483dcc1a9a98f153ec8298b63be010a99f,1\n0x511893483dcc1a9a98f153ec8298b63be010a99f\n";
        let res = read_amounts_from(input.as_bytes());

        assert!(matches!(res, Err(ScriptError::CsvInput { row: 2, .. })));
    }

    #[test]
    fn test_indented_comment_skipped() {
        let input = "  # paid out in March, batch 2\n0x511893483dcc1a9a98f153ec8298b63be010a99f,1\n\t# done\n0x511893483dcc1a9a98f153ec8298b63be010a99f\n";
        let res = read_amounts_from(input.as_bytes());

        // The short row is the second data row once comments are dropped
        assert!(matches!(res, Err(ScriptError::CsvInput { row: 2, .. })));

        let input = "  # only a note\n0x511893483dcc1a9a98f153ec8298b63be010a99f, 1\n";
        let rows = read_amounts_from(input.as_bytes()).unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn test_bad_amount() {
        let input = "0x511893483dcc1a9a98f153ec8298b63be010a99f,lots\n";
        let res = read_amounts_from(input.as_bytes());

        match res {
            Err(ScriptError::CsvInput { row, reason }) => {
                assert_eq!(row, 1);
                assert!(reason.contains("lots"));
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_bad_address() {
        let input = "0x5118,1\n";
        let res = read_amounts_from(input.as_bytes());
        assert!(matches!(res, Err(ScriptError::CsvInput { row: 1, .. })));
    }

    #[test]
    fn test_vesting_cliff_after_duration() {
        let input = "0x511893483dcc1a9a98f153ec8298b63be010a99f,1,10,4\n";
        let res = read_vestings_from(input.as_bytes());
        assert!(matches!(res, Err(ScriptError::CsvInput { row: 1, .. })));
    }

    #[test]
    fn test_unknown_vesting_kind() {
        let input = "0x511893483dcc1a9a98f153ec8298b63be010a99f,1,4,8,advisor\n";
        let res = read_vestings_from(input.as_bytes());
        assert!(matches!(res, Err(ScriptError::CsvInput { row: 1, .. })));
    }
}
