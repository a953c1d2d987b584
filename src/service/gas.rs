use std::sync::Arc;

use alloy::primitives::{Address, U256};
use rust_decimal::Decimal;
use tracing::instrument;

use crate::repository::{EthereumRepository, TxReceipt};

use super::ServiceResult;
use super::utils::{format_feed_answer, format_usd, wei_to_usd};

/// USD cost of a transaction given its gas usage and the ETH/USD price.
///
/// Pure arithmetic so the same inputs always produce the same output.
pub fn gas_spent_usd(gas_used: u64, effective_gas_price: u128, eth_usd: Decimal) -> ServiceResult<Decimal> {
    let wei = U256::from(gas_used) * U256::from(effective_gas_price);
    wei_to_usd(wei, eth_usd)
}

/// Prices transaction receipts in USD via a Chainlink ETH/USD feed.
pub struct GasReporter {
    repository: Arc<dyn EthereumRepository>,
    eth_usd_feed: Address,
}

impl GasReporter {
    pub fn new(repository: Arc<dyn EthereumRepository>, eth_usd_feed: Address) -> Self {
        Self {
            repository,
            eth_usd_feed,
        }
    }

    /// Fetch the current ETH/USD price from the configured feed.
    #[instrument(skip(self), err)]
    pub async fn eth_usd_price(&self) -> ServiceResult<Decimal> {
        let round = self.repository.get_feed_round(self.eth_usd_feed).await?;
        format_feed_answer(round.answer, round.decimals)
    }

    /// Render the USD cost of a mined transaction, e.g. `$1.37`.
    #[instrument(skip_all, err)]
    pub async fn gas_spent_in_usd(&self, receipt: &TxReceipt) -> ServiceResult<String> {
        let price = self.eth_usd_price().await?;
        let usd = wei_to_usd(receipt.gas_cost_wei(), price)?;
        Ok(format_usd(usd))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cost_is_deterministic() {
        let price = Decimal::from(2000);
        let a = gas_spent_usd(21_000, 30_000_000_000, price).unwrap();
        let b = gas_spent_usd(21_000, 30_000_000_000, price).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn cost_at_known_price() {
        // 21000 gas at 50 gwei is 0.00105 ETH; at $2000/ETH that is $2.10.
        let usd = gas_spent_usd(21_000, 50_000_000_000, Decimal::from(2000)).unwrap();
        assert_eq!(format_usd(usd), "$2.10");
    }

    #[test]
    fn cost_grows_with_gas_used() {
        let price = Decimal::from(2000);
        let small = gas_spent_usd(21_000, 30_000_000_000, price).unwrap();
        let large = gas_spent_usd(300_000, 30_000_000_000, price).unwrap();
        assert!(large > small);
    }

    #[test]
    fn cost_grows_with_gas_price() {
        let price = Decimal::from(2000);
        let cheap = gas_spent_usd(21_000, 10_000_000_000, price).unwrap();
        let dear = gas_spent_usd(21_000, 100_000_000_000, price).unwrap();
        assert!(dear > cheap);
    }

    #[test]
    fn zero_gas_costs_nothing() {
        let usd = gas_spent_usd(0, 30_000_000_000, Decimal::from(2000)).unwrap();
        assert_eq!(usd, Decimal::ZERO);
    }
}
