use alloy_sol_types::sol;

pub mod units;

pub use alloy_primitives::{Address, U256};

/// Ticker suffix rendered next to the token-denominated buy price.
pub const TOKEN_SYMBOL: &str = "TOK";

sol! {
    /// The crowdsale surface the console drives. Method names match the
    /// deployed contract's ABI, including its `ICOdeadLine` spelling.
    interface ICrowdsale {
        function contributors(address account) external view returns (uint256 weiAmount, bool whitelisted);
        function token() external view returns (address);
        function buyTokens(address beneficiary) external payable;
        function whitelistAddress(address account) external;
        function refundTokens() external;
        function refundTokensForAddress(address account) external;
        function transferTokenOwnership(address newOwner) external;
        function getAddresses() external view returns (address[]);
        function tokensSold() external view returns (uint256);
        function buyPrice() external view returns (uint256);
        function softcap() external view returns (uint256);
        function hardcap() external view returns (uint256);
        function crowdSaleStatus() external view returns (string);
        function ICOdeadLine() external view returns (uint256);
        function weiDelivered() external view returns (uint256);
    }

    /// The sale token. Only the balance lookup is needed client-side.
    interface ISaleToken {
        function balanceOf(address account) external view returns (uint256);
    }
}
