//! Solidity ABI definitions for the contracts used in integration tests

use alloy::sol;

sol! {
    #[sol(rpc)]
    interface IWiringTarget {
        function owner() external view returns (address);
        function value() external view returns (uint256);
        function initialize(uint256 newValue) external;
    }
}
