//! Typed contract handles bound from registry entries

use alloy::{
    network::Ethereum,
    primitives::Address,
    providers::DynProvider,
};

use crate::solidity::{
    IERC20::IERC20Instance, ILoanToken::ILoanTokenInstance,
    IMultiSigWallet::IMultiSigWalletInstance, IOriginInvestorsClaim::IOriginInvestorsClaimInstance,
    IOwnable::IOwnableInstance, IStaking::IStakingInstance,
    IVestingRegistry::IVestingRegistryInstance,
};

/// The provider type shared by all contract handles
pub type Wallet = DynProvider<Ethereum>;

/// A staking contract handle
pub type Staking = IStakingInstance<Wallet, Ethereum>;
/// An ERC20 token handle
pub type Erc20 = IERC20Instance<Wallet, Ethereum>;
/// A loan token handle
pub type LoanToken = ILoanTokenInstance<Wallet, Ethereum>;
/// A multisig wallet handle
pub type MultiSig = IMultiSigWalletInstance<Wallet, Ethereum>;
/// A vesting registry handle
pub type VestingRegistry = IVestingRegistryInstance<Wallet, Ethereum>;
/// An investors claim contract handle
pub type InvestorsClaim = IOriginInvestorsClaimInstance<Wallet, Ethereum>;
/// A handle on any contract exposing `Ownable` methods
pub type Ownable = IOwnableInstance<Wallet, Ethereum>;

/// A typed contract client that can be bound to a deployed address
pub trait ContractBinding: Sized {
    /// Bind the client to the contract deployed at `address`
    fn bind(address: Address, provider: Wallet) -> Self;
}

/// Implement [`ContractBinding`] for `sol!`-generated instance types
macro_rules! impl_contract_binding {
    ($($instance:ty),* $(,)?) => {
        $(
            impl ContractBinding for $instance {
                fn bind(address: Address, provider: Wallet) -> Self {
                    <$instance>::new(address, provider)
                }
            }
        )*
    };
}

impl_contract_binding!(
    Staking,
    Erc20,
    LoanToken,
    MultiSig,
    VestingRegistry,
    InvestorsClaim,
    Ownable,
);
