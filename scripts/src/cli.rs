//! Definitions of CLI arguments and commands for the operator scripts

use std::path::PathBuf;

use alloy::primitives::Address;
use clap::{Args, Parser, Subcommand};

use crate::{
    commands::{
        batches::{append_investors, create_vestings, distribute, init_investor_claims},
        deploy::deploy,
        reads::{balances, stakes, transaction_limits, voting_power, weight},
        relayed::{
            multisig_confirm, multisig_execute, multisig_status, multisig_submit,
            multisig_transfer, set_transaction_limit,
        },
        writes::{stake, transfer_ownership},
    },
    constants::{
        DEFAULT_CONFIG_DIR, DEFAULT_CONFIRMATIONS, INVESTORS_CLAIM_KEY, LOAN_TOKENS, MULTISIG_KEY,
        SOV_KEY, STAKING_KEY, VESTING_REGISTRY_KEY,
    },
    context::ScriptContext,
    errors::ScriptError,
    network::Network,
};

/// Operator scripts for administering the deployed protocol contracts
#[derive(Parser)]
pub struct Cli {
    /// The network to run against
    #[arg(short, long)]
    pub network: Network,

    /// Directory holding the `<network-class>_contracts.json` files
    #[arg(long, env = "CONTRACTS_CONFIG_DIR", default_value = DEFAULT_CONFIG_DIR)]
    pub config_dir: PathBuf,

    /// Network RPC URL, overriding the network's default
    #[arg(short, long, env = "RPC_URL")]
    pub rpc_url: Option<String>,

    /// Alias of the stored account to sign with on public networks
    #[arg(short, long)]
    pub account: Option<String>,

    /// Directory holding encrypted keystores, defaults to `~/.foundry/keystores`
    #[arg(long, env = "KEYSTORE_DIR")]
    pub keystore_dir: Option<PathBuf>,

    /// Passphrase of the stored account, prompted for if absent
    #[arg(long, env = "KEYSTORE_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Number of confirmations to wait for after each transaction
    #[arg(long, default_value_t = DEFAULT_CONFIRMATIONS)]
    pub confirmations: u64,

    /// The action routine to run
    #[command(subcommand)]
    pub command: Command,
}

/// The action routines
#[derive(Subcommand)]
pub enum Command {
    /// Deploy a contract from a compilation artifact and hand its ownership over
    Deploy(DeployArgs),
    /// Print the transaction limits of every loan token
    TransactionLimits,
    /// Print the stakes of a user
    Stakes(StakesArgs),
    /// Print the voting power of a user
    VotingPower(VotingPowerArgs),
    /// Print the staking weight of a lock date
    Weight(WeightArgs),
    /// Print token balances of several accounts
    Balances(BalancesArgs),
    /// Stake governance tokens from the signing account
    Stake(StakeArgs),
    /// Transfer ownership of a contract owned by the signing account
    TransferOwnership(TransferOwnershipArgs),
    /// Propose a new transaction limit for a loan token through the multisig
    SetTransactionLimit(SetTransactionLimitArgs),
    /// Propose a token transfer out of the multisig
    MultisigTransfer(MultisigTransferArgs),
    /// Propose an arbitrary call through the multisig
    MultisigSubmit(MultisigSubmitArgs),
    /// Confirm a multisig proposal
    MultisigConfirm(ProposalArgs),
    /// Execute a fully confirmed multisig proposal
    MultisigExecute(ProposalArgs),
    /// Print the state of a multisig proposal
    MultisigStatus(ProposalArgs),
    /// Transfer tokens to every account listed in a CSV file
    Distribute(DistributeArgs),
    /// Create and fund a vesting contract for every row of a CSV file
    CreateVestings(CsvBatchArgs),
    /// Load the investors list of the claim contract from a CSV file
    AppendInvestors(AppendInvestorsArgs),
    /// Mark the investors list of the claim contract as complete
    InitInvestorClaims,
}

impl Command {
    /// The registry names the command dereferences, checked before anything
    /// is signed or sent
    pub fn required_contracts(&self) -> Result<Vec<String>, ScriptError> {
        let names: Vec<&str> = match self {
            Command::Deploy(args) => {
                if args.keep_ownership {
                    vec![]
                } else {
                    vec![args.owner.as_str()]
                }
            }
            Command::TransactionLimits => LOAN_TOKENS
                .iter()
                .flat_map(|(loan_token, underlying)| [*loan_token, *underlying])
                .collect(),
            Command::Stakes(_) | Command::VotingPower(_) | Command::Weight(_) => {
                vec![STAKING_KEY]
            }
            Command::Balances(args) => vec![args.token.as_str()],
            Command::Stake(_) => vec![STAKING_KEY, SOV_KEY],
            Command::TransferOwnership(args) => vec![args.contract.as_str(), args.to.as_str()],
            Command::SetTransactionLimit(args) => {
                vec![MULTISIG_KEY, args.loan_token.as_str(), args.underlying()?]
            }
            Command::MultisigTransfer(args) => vec![MULTISIG_KEY, args.token.as_str()],
            Command::MultisigSubmit(args) => vec![MULTISIG_KEY, args.target.as_str()],
            Command::MultisigConfirm(_)
            | Command::MultisigExecute(_)
            | Command::MultisigStatus(_) => vec![MULTISIG_KEY],
            Command::Distribute(args) => vec![args.token.as_str()],
            Command::CreateVestings(_) => vec![VESTING_REGISTRY_KEY, SOV_KEY],
            Command::AppendInvestors(_) | Command::InitInvestorClaims => {
                vec![INVESTORS_CLAIM_KEY]
            }
        };

        Ok(names.into_iter().map(str::to_string).collect())
    }

    /// Whether the command may run before the network's contracts config file exists
    pub fn creates_config(&self) -> bool {
        matches!(self, Command::Deploy(_))
    }

    /// Run the command against the given context
    pub async fn run(self, ctx: &ScriptContext) -> Result<(), ScriptError> {
        match self {
            Command::Deploy(args) => deploy(args, ctx).await,
            Command::TransactionLimits => transaction_limits(ctx).await,
            Command::Stakes(args) => stakes(args, ctx).await,
            Command::VotingPower(args) => voting_power(args, ctx).await,
            Command::Weight(args) => weight(args, ctx).await,
            Command::Balances(args) => balances(args, ctx).await,
            Command::Stake(args) => stake(args, ctx).await,
            Command::TransferOwnership(args) => transfer_ownership(args, ctx).await,
            Command::SetTransactionLimit(args) => set_transaction_limit(args, ctx).await,
            Command::MultisigTransfer(args) => multisig_transfer(args, ctx).await,
            Command::MultisigSubmit(args) => multisig_submit(args, ctx).await,
            Command::MultisigConfirm(args) => multisig_confirm(args, ctx).await,
            Command::MultisigExecute(args) => multisig_execute(args, ctx).await,
            Command::MultisigStatus(args) => multisig_status(args, ctx).await,
            Command::Distribute(args) => distribute(args, ctx).await,
            Command::CreateVestings(args) => create_vestings(args, ctx).await,
            Command::AppendInvestors(args) => append_investors(args, ctx).await,
            Command::InitInvestorClaims => init_investor_claims(ctx).await,
        }
    }
}

/// Deploy a contract and wire it into the protocol.
///
/// The initializer, if any, is always called before ownership is handed over,
/// since the deployer can no longer configure the contract afterwards.
#[derive(Args)]
pub struct DeployArgs {
    /// Path to the compilation artifact (Foundry or Hardhat JSON)
    #[arg(long)]
    pub artifact: PathBuf,

    /// Name under which to record the deployed address in the contracts config
    #[arg(long)]
    pub name: String,

    /// ABI-encoded constructor arguments in hex
    #[arg(long)]
    pub constructor_args: Option<String>,

    /// Calldata, in hex, of the initializer to call after deployment
    #[arg(long)]
    pub init_calldata: Option<String>,

    /// Registry name of the new owner
    #[arg(long, default_value = MULTISIG_KEY)]
    pub owner: String,

    /// Keep ownership with the deploying account. Required when the network
    /// has no contracts config yet, as the new owner is looked up there
    #[arg(long)]
    pub keep_ownership: bool,
}

/// Read the stakes of a user
#[derive(Args)]
pub struct StakesArgs {
    /// The staker's address
    #[arg(short, long)]
    pub user: Address,
}

/// Read the voting power of a user
#[derive(Args)]
pub struct VotingPowerArgs {
    /// The voter's address
    #[arg(short, long)]
    pub user: Address,

    /// Block at which to read the votes, defaults to the block before the latest
    #[arg(short, long)]
    pub block: Option<u64>,

    /// Unix timestamp the weights are computed from, defaults to now
    #[arg(short, long)]
    pub date: Option<u64>,
}

/// Compute the staking weight of a lock date
#[derive(Args)]
pub struct WeightArgs {
    /// Unix timestamp of the lock date
    #[arg(short, long)]
    pub date: u64,

    /// Unix timestamp the weight is computed from, defaults to now
    #[arg(short, long)]
    pub start_date: Option<u64>,
}

/// Read token balances
#[derive(Args)]
pub struct BalancesArgs {
    /// Registry name of the token
    #[arg(short, long, default_value = SOV_KEY)]
    pub token: String,

    /// The accounts to read balances of
    #[arg(short, long, num_args = 1.., required = true)]
    pub accounts: Vec<Address>,
}

/// Stake governance tokens
#[derive(Args)]
pub struct StakeArgs {
    /// Amount of tokens to stake, in whole tokens (e.g. `1000.5`)
    #[arg(long)]
    pub amount: String,

    /// Unix timestamp until which the tokens are locked
    #[arg(long)]
    pub until: u64,

    /// Delegatee of the voting power, defaults to the signing account
    #[arg(long)]
    pub delegatee: Option<Address>,
}

/// Transfer ownership of a contract
#[derive(Args)]
pub struct TransferOwnershipArgs {
    /// Registry name of the contract
    #[arg(short, long)]
    pub contract: String,

    /// Registry name of the new owner
    #[arg(short, long, default_value = MULTISIG_KEY)]
    pub to: String,
}

/// Propose a new transaction limit
#[derive(Args)]
pub struct SetTransactionLimitArgs {
    /// Registry name of the loan token
    #[arg(short, long)]
    pub loan_token: String,

    /// Registry name of the asset the limit applies to, defaults to the loan
    /// token's underlying asset
    #[arg(short, long)]
    pub underlying: Option<String>,

    /// The new limit, in whole tokens
    #[arg(long)]
    pub limit: String,
}

impl SetTransactionLimitArgs {
    /// The registry name of the asset the limit applies to
    pub fn underlying(&self) -> Result<&str, ScriptError> {
        if let Some(underlying) = &self.underlying {
            return Ok(underlying);
        }

        LOAN_TOKENS
            .iter()
            .find(|(loan_token, _)| *loan_token == self.loan_token)
            .map(|(_, underlying)| *underlying)
            .ok_or_else(|| {
                ScriptError::CalldataConstruction(format!(
                    "no known underlying asset for `{}`, pass --underlying",
                    self.loan_token
                ))
            })
    }
}

/// Propose a token transfer out of the multisig
#[derive(Args)]
pub struct MultisigTransferArgs {
    /// Registry name of the token
    #[arg(short, long, default_value = SOV_KEY)]
    pub token: String,

    /// The receiver of the tokens
    #[arg(long)]
    pub to: Address,

    /// Amount to transfer, in whole tokens
    #[arg(long)]
    pub amount: String,
}

/// Propose an arbitrary call through the multisig
#[derive(Args)]
pub struct MultisigSubmitArgs {
    /// Registry name of the contract to call
    #[arg(short, long)]
    pub target: String,

    /// The calldata, in hex
    #[arg(short, long)]
    pub calldata: String,

    /// Native value to send along, in whole coins
    #[arg(short, long, default_value = "0")]
    pub value: String,
}

/// Identify a multisig proposal
#[derive(Args)]
pub struct ProposalArgs {
    /// The proposal ID
    #[arg(short, long)]
    pub id: u64,
}

/// Transfer tokens to a list of accounts
#[derive(Args)]
pub struct DistributeArgs {
    /// Registry name of the token
    #[arg(short, long, default_value = SOV_KEY)]
    pub token: String,

    /// The CSV input of `receiver, amount` rows
    #[command(flatten)]
    pub batch: CsvBatchArgs,
}

/// A CSV-driven batch of transactions
#[derive(Args)]
pub struct CsvBatchArgs {
    /// Path to the CSV input
    #[arg(long)]
    pub csv: PathBuf,

    /// Number of leading rows to skip, e.g. rows already processed by an
    /// interrupted run
    #[arg(long, default_value_t = 0)]
    pub skip: usize,
}

/// Load the investors list
#[derive(Args)]
pub struct AppendInvestorsArgs {
    /// Path to the CSV input of `investor, amount` rows
    #[arg(long)]
    pub csv: PathBuf,
}
