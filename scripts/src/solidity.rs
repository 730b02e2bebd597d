//! Definitions of the Solidity interfaces called by the operator scripts
//!
//! Each interface only lists the functions the scripts use, not the full ABI
//! of the deployed contract.

use alloy::sol;

sol! {
    #[sol(rpc)]
    interface IStaking {
        function stake(uint96 amount, uint256 until, address stakeFor, address delegatee) external;
        function getStakes(address account) external view returns (uint256[] memory dates, uint96[] memory stakes);
        function computeWeightByDate(uint256 date, uint256 startDate) external pure returns (uint96 weight);
        function getPriorVotes(address account, uint256 blockNumber, uint256 date) external view returns (uint96);
    }
}

sol! {
    #[sol(rpc)]
    interface IERC20 {
        function balanceOf(address account) external view returns (uint256);
        function transfer(address to, uint256 value) external returns (bool);
        function approve(address spender, uint256 value) external returns (bool);
    }
}

sol! {
    #[sol(rpc)]
    interface ILoanToken {
        function transactionLimit(address asset) external view returns (uint256);
        function setTransactionLimits(address[] memory addresses, uint256[] memory limits) external;
    }
}

sol! {
    #[sol(rpc)]
    interface IMultiSigWallet {
        function submitTransaction(address destination, uint256 value, bytes memory data) external returns (uint256 transactionId);
        function confirmTransaction(uint256 transactionId) external;
        function executeTransaction(uint256 transactionId) external;
        function transactionCount() external view returns (uint256);
        function transactions(uint256 transactionId) external view returns (address destination, uint256 value, bytes memory data, bool executed);
        function getConfirmationCount(uint256 transactionId) external view returns (uint256 count);
        function isConfirmed(uint256 transactionId) external view returns (bool);
        function required() external view returns (uint256);

        #[derive(Debug, PartialEq, Eq)]
        event Submission(uint256 indexed transactionId);
        #[derive(Debug, PartialEq, Eq)]
        event Confirmation(address indexed sender, uint256 indexed transactionId);
    }
}

sol! {
    #[sol(rpc)]
    interface IVestingRegistry {
        function createVesting(address tokenOwner, uint256 amount, uint256 cliff, uint256 duration) external;
        function createTeamVesting(address tokenOwner, uint256 amount, uint256 cliff, uint256 duration) external;
        function getVesting(address tokenOwner) external view returns (address);
        function getTeamVesting(address tokenOwner) external view returns (address);
        function stakeTokens(address vesting, uint256 amount) external;
    }
}

sol! {
    #[sol(rpc)]
    interface IOriginInvestorsClaim {
        function appendInvestorsAmountsList(address[] calldata investors, uint256[] calldata claimAmounts) external;
        function setInvestorsAmountsListInitialized() external;
        function investorsQty() external view returns (uint256);
        function investorsListInitialized() external view returns (bool);
    }
}

sol! {
    #[sol(rpc)]
    interface IOwnable {
        function owner() external view returns (address);
        function transferOwnership(address newOwner) external;
    }
}
