pub mod alloy;
pub mod contract;
pub mod error;

use ::alloy::primitives::{Address, B256, Bytes, Log, U256};
use ::alloy::primitives::aliases::I256;
use async_trait::async_trait;

pub use self::alloy::AlloyEthereumRepository;
pub use error::RepositoryError;

pub(crate) type RepoResult<T> = std::result::Result<T, RepositoryError>;

/// Balance and display metadata for an ERC20 token holding.
#[derive(Debug, Clone)]
pub struct TokenBalance {
    pub balance: U256,
    pub decimals: u8,
    pub symbol: String,
}

/// On-chain metadata of an ERC20 token contract.
///
/// Values are assumed immutable for the lifetime of a run and are not
/// re-verified between calls.
#[derive(Debug, Clone)]
pub struct TokenMetadata {
    pub decimals: u8,
    pub symbol: String,
    pub name: String,
}

/// Latest answer from a Chainlink aggregator, together with the feed's
/// own decimal precision.
#[derive(Debug, Clone, Copy)]
pub struct FeedRound {
    pub answer: I256,
    pub decimals: u8,
}

/// EIP-1559 fee parameters for transaction submission.
#[derive(Debug, Clone, Copy)]
pub struct FeeData {
    pub max_fee_per_gas: u128,
    pub max_priority_fee_per_gas: u128,
}

/// Confirmation record of a finalized transaction.
///
/// A deliberately thin projection of the provider's receipt type: status,
/// gas accounting fields and the emitted event logs are all the pipeline
/// ever inspects.
#[derive(Debug, Clone)]
pub struct TxReceipt {
    pub tx_hash: B256,
    pub status: bool,
    pub gas_used: u64,
    pub effective_gas_price: u128,
    pub logs: Vec<Log>,
}

impl TxReceipt {
    /// Cost of the transaction in wei: `gasUsed * effectiveGasPrice`.
    ///
    /// Integer arithmetic in U256, no precision loss.
    pub fn gas_cost_wei(&self) -> U256 {
        U256::from(self.gas_used) * U256::from(self.effective_gas_price)
    }
}

/// Trait for Ethereum blockchain data access operations.
///
/// Abstraction layer over RPC communication: read-only queries (balances,
/// token metadata, price feeds, quotes) and the three transaction-submitting
/// operations the task scripts need (approve, wrap, router call).
/// Implementations handle provider communication and error conversion.
#[async_trait]
pub trait EthereumRepository: Send + Sync {
    /// Address of the configured local signer, if any. `None` means the
    /// repository can only serve read-only queries.
    fn signer_address(&self) -> Option<Address>;

    /// Chain id reported by the connected endpoint.
    async fn get_chain_id(&self) -> RepoResult<u64>;

    /// Retrieves the native ETH balance for a given address, in wei.
    async fn get_eth_balance(&self, address: Address) -> RepoResult<U256>;

    /// Retrieves the ERC20 token balance and display metadata for a given
    /// token and owner.
    ///
    /// # Errors
    /// Fails with [`RepositoryError::ContractError`] if the address is not a
    /// valid ERC20 contract.
    async fn get_erc20_balance(&self, token: Address, owner: Address) -> RepoResult<TokenBalance>;

    /// Retrieves decimals, symbol and name for an ERC20 token contract.
    async fn get_token_metadata(&self, token: Address) -> RepoResult<TokenMetadata>;

    /// Returns the amount `spender` may currently transfer on behalf of `owner`.
    async fn get_allowance(
        &self,
        token: Address,
        owner: Address,
        spender: Address,
    ) -> RepoResult<U256>;

    /// Reads the latest round from a Chainlink price feed.
    ///
    /// Single attempt, no retry: a revert or unreachable endpoint surfaces
    /// directly to the caller.
    async fn get_feed_round(&self, feed: Address) -> RepoResult<FeedRound>;

    /// Gets a quote for a Uniswap V3 exact-input single-hop swap from QuoterV2.
    ///
    /// # Arguments
    /// * `quoter` - The QuoterV2 contract address
    /// * `token_in` / `token_out` - The pair to quote
    /// * `amount_in` - The input amount in the input token's smallest unit
    /// * `fee` - The pool fee tier (500 for 0.05%, 3000 for 0.3%, 10000 for 1%)
    ///
    /// # Returns
    /// The expected output amount and the estimated gas for the swap.
    async fn get_v3_quote(
        &self,
        quoter: Address,
        token_in: Address,
        token_out: Address,
        amount_in: U256,
        fee: u32,
    ) -> RepoResult<(U256, u64)>;

    /// Retrieves the current gas price from the network, in wei.
    async fn get_gas_price(&self) -> RepoResult<u128>;

    /// Queries current EIP-1559 fee parameters from the endpoint.
    async fn get_fee_data(&self) -> RepoResult<FeeData>;

    /// Submits an ERC20 approval transaction and awaits its receipt.
    ///
    /// One on-chain transaction; irreversible once confirmed. The receipt is
    /// returned regardless of its status, the caller decides what a revert
    /// means for its pipeline.
    async fn approve(
        &self,
        token: Address,
        spender: Address,
        raw_amount: U256,
    ) -> RepoResult<TxReceipt>;

    /// Deposits `raw_amount` wei of native currency into the WETH contract
    /// and awaits the receipt.
    async fn wrap_eth(&self, weth: Address, raw_amount: U256) -> RepoResult<TxReceipt>;

    /// Sends a transaction carrying opaque router calldata and native value
    /// to `router`, with explicit fee parameters, and awaits the receipt.
    async fn send_router_transaction(
        &self,
        router: Address,
        calldata: Bytes,
        value: U256,
        fees: FeeData,
    ) -> RepoResult<TxReceipt>;
}
