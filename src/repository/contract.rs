use alloy::sol;

// Smart contract ABI definitions for Ethereum blockchain interactions
sol! {
    /// ERC20 token standard interface.
    ///
    /// Contains the view functions needed for balance/metadata queries plus the
    /// `approve`/`allowance` pair used before router swaps, and the `Transfer`
    /// event scanned out of swap receipts.
    #[sol(rpc)]
    interface IERC20 {
        /// Returns the token balance of the specified account.
        ///
        /// # Arguments
        /// * `account` - The address to query the balance of
        ///
        /// # Returns
        /// The balance in the token's smallest unit (considering decimals)
        function balanceOf(address account) external view returns (uint256);

        /// Returns the number of decimals used by the token.
        ///
        /// # Returns
        /// The number of decimals (e.g., 18 for most tokens, 6 for USDT/USDC)
        function decimals() external view returns (uint8);

        /// Returns the token symbol.
        ///
        /// # Returns
        /// The token symbol as a string (e.g., "WETH", "USDC", "LINK")
        function symbol() external view returns (string memory);

        /// Returns the token name.
        ///
        /// # Returns
        /// The full token name (e.g., "Wrapped Ether")
        function name() external view returns (string memory);

        /// Returns the remaining number of tokens that `spender` is allowed to
        /// transfer on behalf of `owner`.
        function allowance(address owner, address spender) external view returns (uint256);

        /// Sets `amount` as the allowance of `spender` over the caller's tokens.
        ///
        /// Sets, does not increment: a second call replaces the previous allowance.
        function approve(address spender, uint256 amount) external returns (bool);

        /// Emitted when `value` tokens are moved from `from` to `to`.
        event Transfer(address indexed from, address indexed to, uint256 value);
    }

    /// Chainlink price feed aggregator interface.
    ///
    /// Publishes periodically updated asset price data. The raw `answer` must be
    /// scaled by the feed's own `decimals` to get a human-readable price.
    #[sol(rpc)]
    interface AggregatorV3Interface {
        /// Returns the number of decimals the feed's answer is scaled by (usually 8).
        function decimals() external view returns (uint8);

        /// Returns the data from the latest completed round.
        ///
        /// # Returns
        /// * `roundId` - The round in which the answer was computed
        /// * `answer` - The price, scaled by the feed's decimals
        /// * `startedAt` - Timestamp of when the round started
        /// * `updatedAt` - Timestamp of when the round was updated
        /// * `answeredInRound` - The round in which the answer was last updated
        function latestRoundData()
            external
            view
            returns (
                uint80 roundId,
                int256 answer,
                uint256 startedAt,
                uint256 updatedAt,
                uint80 answeredInRound
            );
    }

    /// Wrapped-native-currency (WETH9) interface.
    #[sol(rpc)]
    interface IWETH9 {
        /// Wraps the attached native value into WETH credited to the caller.
        function deposit() external payable;

        /// Unwraps `wad` WETH back into native currency.
        function withdraw(uint256 wad) external;

        /// Returns the WETH balance of `owner`.
        function balanceOf(address owner) external view returns (uint256);
    }

    /// Uniswap V3 QuoterV2 interface for getting swap quotes.
    ///
    /// Simulates swaps and returns exact output amounts without executing the swap.
    #[sol(rpc)]
    interface IQuoterV2 {
        /// QuoteExactInputSingle parameters struct
        struct QuoteExactInputSingleParams {
            address tokenIn;
            address tokenOut;
            uint256 amountIn;
            uint24 fee;
            uint160 sqrtPriceLimitX96;
        }

        /// Returns the amount out for a single-hop exact input swap without executing the swap.
        ///
        /// # Arguments
        /// * `params` - The parameters for the quote
        ///
        /// # Returns
        /// * `amountOut` - The expected output amount
        /// * `sqrtPriceX96After` - The sqrt price after the swap
        /// * `initializedTicksCrossed` - The number of ticks crossed
        /// * `gasEstimate` - The estimated gas usage
        function quoteExactInputSingle(QuoteExactInputSingleParams calldata params)
            external
            returns (
                uint256 amountOut,
                uint160 sqrtPriceX96After,
                uint32 initializedTicksCrossed,
                uint256 gasEstimate
            );
    }

    /// Uniswap V3 SwapRouter interface for executing swaps.
    ///
    /// Only used for ABI-encoding the swap calldata carried by a discovered
    /// route; the transaction itself is submitted as a raw call to the router.
    #[sol(rpc)]
    interface ISwapRouter {
        /// ExactInputSingle parameters struct
        struct ExactInputSingleParams {
            address tokenIn;
            address tokenOut;
            uint24 fee;
            address recipient;
            uint256 deadline;
            uint256 amountIn;
            uint256 amountOutMinimum;
            uint160 sqrtPriceLimitX96;
        }

        /// Swaps `amountIn` of one token for as much as possible of another token.
        ///
        /// # Arguments
        /// * `params` - The parameters necessary for the swap
        ///
        /// # Returns
        /// The amount of the received token
        function exactInputSingle(ExactInputSingleParams calldata params)
            external
            payable
            returns (uint256 amountOut);
    }
}
