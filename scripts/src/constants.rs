//! Constants used in the operator scripts

// -----------------
// | Network setup |
// -----------------

/// The RPC URL of a locally running development node
pub const DEVELOPMENT_RPC_URL: &str = "http://127.0.0.1:8545";

/// The public RPC URL of the RSK testnet
pub const RSK_TESTNET_RPC_URL: &str = "https://public-node.testnet.rsk.co";

/// The public RPC URL of the RSK mainnet
pub const RSK_MAINNET_RPC_URL: &str = "https://public-node.rsk.co";

/// The chain ID of the RSK testnet
pub const RSK_TESTNET_CHAIN_ID: u64 = 31;

/// The chain ID of the RSK mainnet
pub const RSK_MAINNET_CHAIN_ID: u64 = 30;

/// The private key of the first pre-funded account of a local development node
pub const DEVELOPMENT_PRIVATE_KEY: &str =
    "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

/// The alias of the stored credential used on public networks
pub const DEFAULT_ACCOUNT_ALIAS: &str = "rskdeployer";

/// The directory, relative to the home directory, holding encrypted keystores
pub const DEFAULT_KEYSTORE_SUBDIR: &str = ".foundry/keystores";

/// The extension some tools append to keystore files
pub const KEYSTORE_EXTENSION: &str = "json";

/// The directory holding the per-network contracts config files
pub const DEFAULT_CONFIG_DIR: &str = "deployments";

/// The suffix appended to the network class to form a contracts config file name
pub const CONFIG_FILE_SUFFIX: &str = "_contracts.json";

/// The number of confirmations to wait for after each transaction is included
pub const DEFAULT_CONFIRMATIONS: u64 = 1;

// -------------------------
// | Contracts config keys |
// -------------------------

/// The multisig wallet key in the contracts config file
pub const MULTISIG_KEY: &str = "multisig";

/// The staking contract key in the contracts config file
pub const STAKING_KEY: &str = "Staking";

/// The governance token key in the contracts config file
pub const SOV_KEY: &str = "SOV";

/// The vesting registry key in the contracts config file
pub const VESTING_REGISTRY_KEY: &str = "VestingRegistry";

/// The investors claim contract key in the contracts config file
pub const INVESTORS_CLAIM_KEY: &str = "OriginInvestorsClaim";

/// The loan tokens whose transaction limits are managed by the scripts, paired
/// with the key of the underlying asset each limit is denominated in
pub const LOAN_TOKENS: [(&str, &str); 5] = [
    ("iDOC", "DoC"),
    ("iRBTC", "WRBTC"),
    ("iUSDT", "USDT"),
    ("iBPro", "BPro"),
    ("iXUSD", "XUSD"),
];

// --------------
// | CSV inputs |
// --------------

/// The number of decimals of the tokens handled by the CSV-driven routines
pub const TOKEN_DECIMALS: u8 = 18;

/// The number of seconds in a week, the unit of vesting cliffs and durations
pub const SECONDS_PER_WEEK: u64 = 7 * 24 * 60 * 60;

/// The prefix marking a comment line in CSV inputs
pub const CSV_COMMENT_PREFIX: u8 = b'#';

/// The marker in the optional fifth vesting column selecting a team vesting
pub const TEAM_VESTING_MARKER: &str = "team";
