use std::sync::Arc;

use alloy::primitives::{Address, U256};
use tracing::{info, instrument};

use crate::repository::EthereumRepository;

use super::ServiceResult;
use super::error::ServiceError;
use super::gas::GasReporter;
use super::registry::{AddressBook, NetworkEntry};
use super::types::{
    ApprovalReport, BalanceReport, PriceReport, TokenBalanceReport, TokenDescriptor, WrapReport,
};
use super::utils::{format_feed_answer, format_units, parse_units};

/// Account-level operations on a single configured network: balances, token
/// metadata, feed reads, approvals and ETH wrapping.
pub struct TaskService {
    repository: Arc<dyn EthereumRepository>,
    book: AddressBook,
    chain_id: u64,
}

impl TaskService {
    pub fn new(repository: Arc<dyn EthereumRepository>, book: AddressBook, chain_id: u64) -> Self {
        Self {
            repository,
            book,
            chain_id,
        }
    }

    pub fn network(&self) -> ServiceResult<&NetworkEntry> {
        self.book.network(self.chain_id)
    }

    pub fn repository(&self) -> Arc<dyn EthereumRepository> {
        self.repository.clone()
    }

    /// Load the on-chain metadata of a token contract into a descriptor.
    #[instrument(skip(self), err)]
    pub async fn describe_token(&self, token: Address) -> ServiceResult<TokenDescriptor> {
        let metadata = self.repository.get_token_metadata(token).await?;

        Ok(TokenDescriptor {
            chain_id: self.chain_id,
            address: token,
            decimals: metadata.decimals,
            symbol: metadata.symbol,
            name: metadata.name,
        })
    }

    /// Resolve a symbol against the address book and load its on-chain
    /// metadata. The registry address is authoritative; the chain supplies
    /// decimals, canonical symbol casing and name.
    #[instrument(skip(self), err)]
    pub async fn resolve_token(&self, symbol: &str) -> ServiceResult<TokenDescriptor> {
        let address = self.network()?.token(symbol)?;
        self.describe_token(address).await
    }

    #[instrument(skip(self), err)]
    pub async fn eth_balance(&self, address: Address) -> ServiceResult<BalanceReport> {
        let balance = self.repository.get_eth_balance(address).await?;

        Ok(BalanceReport {
            balance: balance.to_string(),
            formatted_balance: format_units(balance, 18),
        })
    }

    #[instrument(skip(self), err)]
    pub async fn token_balance(
        &self,
        token: Address,
        holder: Address,
    ) -> ServiceResult<TokenBalanceReport> {
        let holding = self.repository.get_erc20_balance(token, holder).await?;

        Ok(TokenBalanceReport {
            balance: holding.balance.to_string(),
            formatted_balance: format_units(holding.balance, holding.decimals),
            decimals: holding.decimals,
            symbol: holding.symbol,
        })
    }

    /// Latest answer from a Chainlink feed, scaled by the feed's decimals.
    #[instrument(skip(self), err)]
    pub async fn feed_price(&self, feed: Address) -> ServiceResult<PriceReport> {
        let round = self.repository.get_feed_round(feed).await?;
        let price = format_feed_answer(round.answer, round.decimals)?;

        Ok(PriceReport {
            price: price.to_string(),
        })
    }

    /// Latest ETH/USD answer from the network's registered feed.
    #[instrument(skip(self), err)]
    pub async fn eth_usd_price(&self) -> ServiceResult<PriceReport> {
        let feed = self.network()?.eth_usd_feed()?;
        self.feed_price(feed).await
    }

    /// Approve `spender` for a human-readable amount of a token.
    ///
    /// Waits for the receipt, fails on a reverted transaction and reads the
    /// resulting allowance back so the report reflects on-chain state.
    #[instrument(skip(self), err)]
    pub async fn approve_token(
        &self,
        token: Address,
        spender: Address,
        amount: &str,
    ) -> ServiceResult<ApprovalReport> {
        let token = self.describe_token(token).await?;
        let raw_amount = parse_units(amount, token.decimals)?;

        self.approve_raw(&token, spender, raw_amount).await
    }

    /// Approval with a pre-scaled raw amount, shared with the swap pipeline.
    #[instrument(skip(self, token), err)]
    pub async fn approve_raw(
        &self,
        token: &TokenDescriptor,
        spender: Address,
        raw_amount: U256,
    ) -> ServiceResult<ApprovalReport> {
        let owner = self
            .repository
            .signer_address()
            .ok_or_else(|| ServiceError::WalletRequired("approve".to_string()))?;

        let receipt = self
            .repository
            .approve(token.address, spender, raw_amount)
            .await
            .map_err(|e| ServiceError::ApprovalFailed(e.to_string()))?;
        if !receipt.status {
            return Err(ServiceError::ApprovalFailed(format!(
                "transaction {} reverted",
                receipt.tx_hash
            )));
        }

        let allowance = self
            .repository
            .get_allowance(token.address, owner, spender)
            .await?;
        let gas_spent_usd = self.gas_reporter()?.gas_spent_in_usd(&receipt).await?;
        info!(tx_hash = %receipt.tx_hash, %allowance, "approval confirmed");

        Ok(ApprovalReport {
            tx_hash: receipt.tx_hash,
            allowance: format_units(allowance, token.decimals),
            symbol: token.symbol.clone(),
            gas_spent_usd,
        })
    }

    /// Wrap native ETH into WETH and report the resulting WETH balance.
    #[instrument(skip(self), err)]
    pub async fn wrap_eth(&self, amount: &str) -> ServiceResult<WrapReport> {
        let owner = self
            .repository
            .signer_address()
            .ok_or_else(|| ServiceError::WalletRequired("wrap-eth".to_string()))?;
        let weth = self.network()?.token("WETH")?;
        let raw_amount = parse_units(amount, 18)?;

        let receipt = self.repository.wrap_eth(weth, raw_amount).await?;
        if !receipt.status {
            return Err(ServiceError::UpstreamCallFailed(format!(
                "wrap transaction {} reverted",
                receipt.tx_hash
            )));
        }

        let holding = self.repository.get_erc20_balance(weth, owner).await?;
        info!(tx_hash = %receipt.tx_hash, weth_balance = %holding.balance, "wrap confirmed");

        Ok(WrapReport {
            tx_hash: receipt.tx_hash,
            amount: format_units(raw_amount, 18),
            weth_balance: format_units(holding.balance, holding.decimals),
        })
    }

    fn gas_reporter(&self) -> ServiceResult<GasReporter> {
        let feed = self.network()?.eth_usd_feed()?;
        Ok(GasReporter::new(self.repository.clone(), feed))
    }
}
