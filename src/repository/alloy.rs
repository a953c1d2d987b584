use std::str::FromStr;

use alloy::network::{EthereumWallet, TransactionBuilder};
use alloy::primitives::{
    Address, Bytes, U256,
    aliases::{U24, U160},
};
use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use alloy::rpc::types::{TransactionReceipt, TransactionRequest};
use alloy::signers::local::PrivateKeySigner;
use async_trait::async_trait;
use tracing::instrument;

use super::error::RepositoryError;
use crate::repository::contract::{AggregatorV3Interface, IERC20, IQuoterV2, IWETH9};
use crate::repository::{
    EthereumRepository, FeeData, FeedRound, RepoResult, TokenBalance, TokenMetadata, TxReceipt,
};

/// Alloy-backed implementation of [`EthereumRepository`].
///
/// Wraps a single HTTP provider; when a private key is supplied the wallet is
/// layered into the provider stack so the write operations can sign and send.
pub struct AlloyEthereumRepository {
    provider: DynProvider,
    signer: Option<Address>,
}

impl AlloyEthereumRepository {
    /// Connects a read-only repository.
    pub fn connect(rpc_url: &str) -> Result<Self, RepositoryError> {
        let url = rpc_url
            .parse()
            .map_err(|e| RepositoryError::ParseError(format!("Invalid RPC URL: {e}")))?;
        let provider = ProviderBuilder::new().connect_http(url).erased();

        Ok(Self {
            provider,
            signer: None,
        })
    }

    /// Connects a repository with a local signer for transaction submission.
    pub fn connect_with_wallet(rpc_url: &str, private_key: &str) -> Result<Self, RepositoryError> {
        let url = rpc_url
            .parse()
            .map_err(|e| RepositoryError::ParseError(format!("Invalid RPC URL: {e}")))?;

        let signer = PrivateKeySigner::from_str(private_key)
            .map_err(|e| RepositoryError::ParseError(format!("Invalid private key: {e}")))?;
        let address = signer.address();
        let wallet = EthereumWallet::from(signer);

        let provider = ProviderBuilder::new().wallet(wallet).connect_http(url).erased();

        Ok(Self {
            provider,
            signer: Some(address),
        })
    }

    fn require_signer(&self, operation: &str) -> RepoResult<Address> {
        self.signer.ok_or_else(|| {
            RepositoryError::WalletRequired(format!("{operation} requires a configured private key"))
        })
    }

    fn convert_receipt(receipt: TransactionReceipt) -> TxReceipt {
        TxReceipt {
            tx_hash: receipt.transaction_hash,
            status: receipt.status(),
            gas_used: receipt.gas_used,
            effective_gas_price: receipt.effective_gas_price,
            logs: receipt.inner.logs().iter().map(|log| log.inner.clone()).collect(),
        }
    }
}

#[async_trait]
impl EthereumRepository for AlloyEthereumRepository {
    fn signer_address(&self) -> Option<Address> {
        self.signer
    }

    #[instrument(skip(self), err)]
    async fn get_chain_id(&self) -> RepoResult<u64> {
        self.provider
            .get_chain_id()
            .await
            .map_err(|e| RepositoryError::RpcError(e.to_string()))
    }

    #[instrument(skip(self), err)]
    async fn get_eth_balance(&self, address: Address) -> RepoResult<U256> {
        self.provider.get_balance(address).await.map_err(|e| {
            if e.to_string().contains("429") {
                tracing::warn!("Rate limited while getting ETH balance for {}", address);
            }
            RepositoryError::RpcError(e.to_string())
        })
    }

    #[instrument(skip(self), err)]
    async fn get_erc20_balance(&self, token: Address, owner: Address) -> RepoResult<TokenBalance> {
        let contract = IERC20::new(token, self.provider.clone());

        let balance = contract
            .balanceOf(owner)
            .call()
            .await
            .map_err(|e| RepositoryError::ContractError(e.to_string()))?;

        let decimals = contract
            .decimals()
            .call()
            .await
            .map_err(|e| RepositoryError::ContractError(e.to_string()))?;

        let symbol = contract
            .symbol()
            .call()
            .await
            .map_err(|e| RepositoryError::ContractError(e.to_string()))?;

        Ok(TokenBalance {
            balance,
            decimals,
            symbol,
        })
    }

    #[instrument(skip(self), err)]
    async fn get_token_metadata(&self, token: Address) -> RepoResult<TokenMetadata> {
        let contract = IERC20::new(token, self.provider.clone());

        let decimals = contract
            .decimals()
            .call()
            .await
            .map_err(|e| RepositoryError::ContractError(e.to_string()))?;

        let symbol = contract
            .symbol()
            .call()
            .await
            .map_err(|e| RepositoryError::ContractError(e.to_string()))?;

        let name = contract
            .name()
            .call()
            .await
            .map_err(|e| RepositoryError::ContractError(e.to_string()))?;

        Ok(TokenMetadata {
            decimals,
            symbol,
            name,
        })
    }

    #[instrument(skip(self), err)]
    async fn get_allowance(
        &self,
        token: Address,
        owner: Address,
        spender: Address,
    ) -> RepoResult<U256> {
        let contract = IERC20::new(token, self.provider.clone());

        contract
            .allowance(owner, spender)
            .call()
            .await
            .map_err(|e| RepositoryError::ContractError(e.to_string()))
    }

    #[instrument(skip(self), err)]
    async fn get_feed_round(&self, feed: Address) -> RepoResult<FeedRound> {
        let contract = AggregatorV3Interface::new(feed, self.provider.clone());

        let decimals = contract
            .decimals()
            .call()
            .await
            .map_err(|e| RepositoryError::ContractError(format!("Failed to get feed decimals: {e}")))?;

        let round = contract
            .latestRoundData()
            .call()
            .await
            .map_err(|e| RepositoryError::ContractError(format!("Failed to get latest round: {e}")))?;

        Ok(FeedRound {
            answer: round.answer,
            decimals,
        })
    }

    #[instrument(skip(self), err)]
    async fn get_v3_quote(
        &self,
        quoter: Address,
        token_in: Address,
        token_out: Address,
        amount_in: U256,
        fee: u32,
    ) -> RepoResult<(U256, u64)> {
        let contract = IQuoterV2::new(quoter, self.provider.clone());

        let params = IQuoterV2::QuoteExactInputSingleParams {
            tokenIn: token_in,
            tokenOut: token_out,
            amountIn: amount_in,
            fee: U24::from(fee),
            sqrtPriceLimitX96: U160::ZERO,
        };

        let result = contract
            .quoteExactInputSingle(params)
            .call()
            .await
            .map_err(|e| {
                tracing::debug!(
                    "Quote failed for {} -> {} (fee: {}): {}",
                    token_in,
                    token_out,
                    fee,
                    e
                );
                RepositoryError::ContractError(format!("Failed to get V3 quote: {e}"))
            })?;

        Ok((result.amountOut, result.gasEstimate.to::<u64>()))
    }

    #[instrument(skip(self), err)]
    async fn get_gas_price(&self) -> RepoResult<u128> {
        self.provider
            .get_gas_price()
            .await
            .map_err(|e| RepositoryError::RpcError(e.to_string()))
    }

    #[instrument(skip(self), err)]
    async fn get_fee_data(&self) -> RepoResult<FeeData> {
        let estimate = self
            .provider
            .estimate_eip1559_fees()
            .await
            .map_err(|e| RepositoryError::RpcError(format!("Failed to fetch fee data: {e}")))?;

        Ok(FeeData {
            max_fee_per_gas: estimate.max_fee_per_gas,
            max_priority_fee_per_gas: estimate.max_priority_fee_per_gas,
        })
    }

    #[instrument(skip(self), err)]
    async fn approve(
        &self,
        token: Address,
        spender: Address,
        raw_amount: U256,
    ) -> RepoResult<TxReceipt> {
        self.require_signer("approve")?;
        let contract = IERC20::new(token, self.provider.clone());

        let pending = contract
            .approve(spender, raw_amount)
            .send()
            .await
            .map_err(|e| RepositoryError::TransactionError(format!("Failed to send approval: {e}")))?;

        let receipt = pending
            .get_receipt()
            .await
            .map_err(|e| RepositoryError::TransactionError(format!("Approval not confirmed: {e}")))?;

        Ok(Self::convert_receipt(receipt))
    }

    #[instrument(skip(self), err)]
    async fn wrap_eth(&self, weth: Address, raw_amount: U256) -> RepoResult<TxReceipt> {
        self.require_signer("wrap_eth")?;
        let contract = IWETH9::new(weth, self.provider.clone());

        let pending = contract
            .deposit()
            .value(raw_amount)
            .send()
            .await
            .map_err(|e| RepositoryError::TransactionError(format!("Failed to send deposit: {e}")))?;

        let receipt = pending
            .get_receipt()
            .await
            .map_err(|e| RepositoryError::TransactionError(format!("Deposit not confirmed: {e}")))?;

        Ok(Self::convert_receipt(receipt))
    }

    #[instrument(skip(self, calldata), err)]
    async fn send_router_transaction(
        &self,
        router: Address,
        calldata: Bytes,
        value: U256,
        fees: FeeData,
    ) -> RepoResult<TxReceipt> {
        let from = self.require_signer("send_router_transaction")?;

        let tx = TransactionRequest::default()
            .with_from(from)
            .with_to(router)
            .with_input(calldata)
            .with_value(value)
            .with_max_fee_per_gas(fees.max_fee_per_gas)
            .with_max_priority_fee_per_gas(fees.max_priority_fee_per_gas);

        let pending = self
            .provider
            .send_transaction(tx)
            .await
            .map_err(|e| RepositoryError::TransactionError(format!("Failed to send swap: {e}")))?;

        let receipt = pending
            .get_receipt()
            .await
            .map_err(|e| RepositoryError::TransactionError(format!("Swap not confirmed: {e}")))?;

        Ok(Self::convert_receipt(receipt))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    // Test addresses
    const VITALIK_ADDRESS: &str = "0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045";
    const DAI_CONTRACT: &str = "0x6b175474e89094c44da98b954eedeac495271d0f";
    const INVALID_CONTRACT: &str = "0x0000000000000000000000000000000000000001";

    // Chainlink ETH/USD feed on Ethereum mainnet
    const ETH_USD_FEED: &str = "0x5f4eC3Df9cbd43714FE2740f5E3616155c5b8419";

    const RPC_URL: &str = "https://eth.llamarpc.com";

    // Rate limiting delay between tests (in milliseconds)
    const TEST_DELAY_MS: u64 = 1000;

    /// Helper function to add delay between tests to avoid rate limiting
    async fn rate_limit_delay() {
        tokio::time::sleep(Duration::from_millis(TEST_DELAY_MS)).await;
    }

    fn create_test_repository() -> AlloyEthereumRepository {
        let rpc_url = std::env::var("RPC_URL").unwrap_or_else(|_| RPC_URL.to_string());
        AlloyEthereumRepository::connect(&rpc_url).expect("Invalid RPC URL")
    }

    #[test]
    fn wallet_initialization_with_valid_key() {
        // Well-known hardhat test key (DO NOT use in production!)
        let test_private_key = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

        let repo = AlloyEthereumRepository::connect_with_wallet(RPC_URL, test_private_key)
            .expect("Failed to create repository with wallet");

        let expected = Address::from_str("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266").unwrap();
        assert_eq!(repo.signer_address(), Some(expected));
    }

    #[test]
    fn wallet_initialization_with_invalid_key() {
        let result = AlloyEthereumRepository::connect_with_wallet(RPC_URL, "not_a_valid_key");
        match result {
            Err(RepositoryError::ParseError(msg)) => {
                assert!(msg.contains("Invalid private key"));
            }
            other => panic!("Expected ParseError, got: {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn repository_without_wallet_is_read_only() {
        let repo = create_test_repository();
        assert!(repo.signer_address().is_none());
    }

    #[tokio::test]
    #[serial_test::serial]
    #[ignore = "requires live RPC endpoint"]
    async fn get_eth_balance_should_work() {
        rate_limit_delay().await;
        let repo = create_test_repository();

        let address = Address::from_str(VITALIK_ADDRESS).expect("Invalid address");
        let balance = repo.get_eth_balance(address).await.expect("balance query failed");
        assert!(balance > U256::ZERO, "Expected non-zero balance");
    }

    #[tokio::test]
    #[serial_test::serial]
    #[ignore = "requires live RPC endpoint"]
    async fn get_token_metadata_dai_should_work() {
        rate_limit_delay().await;
        let repo = create_test_repository();

        let token = Address::from_str(DAI_CONTRACT).expect("Invalid token address");
        let metadata = repo.get_token_metadata(token).await.expect("metadata query failed");

        assert_eq!(metadata.decimals, 18, "DAI should have 18 decimals");
        assert_eq!(metadata.symbol, "DAI", "Symbol should be DAI");
        assert!(!metadata.name.is_empty());
    }

    #[tokio::test]
    #[serial_test::serial]
    #[ignore = "requires live RPC endpoint"]
    async fn get_token_metadata_invalid_contract_should_return_error() {
        rate_limit_delay().await;
        let repo = create_test_repository();

        let token = Address::from_str(INVALID_CONTRACT).expect("Invalid token address");
        let result = repo.get_token_metadata(token).await;

        match result {
            Err(RepositoryError::ContractError(_)) => {}
            other => panic!("Expected ContractError, got: {:?}", other.map(|_| ())),
        }
    }

    #[tokio::test]
    #[serial_test::serial]
    #[ignore = "requires live RPC endpoint"]
    async fn get_feed_round_eth_usd_should_work() {
        rate_limit_delay().await;
        let repo = create_test_repository();

        let feed = Address::from_str(ETH_USD_FEED).expect("Invalid feed address");
        let round = repo.get_feed_round(feed).await.expect("feed query failed");

        assert_eq!(round.decimals, 8, "ETH/USD feed publishes 8 decimals");
        assert!(round.answer.is_positive(), "Expected a positive price answer");
    }
}
