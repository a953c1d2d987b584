use std::sync::Arc;

use alloy::primitives::{
    Address, U256,
    aliases::{U24, U160},
};
use alloy::sol_types::SolCall;
use async_trait::async_trait;
use tracing::{debug, instrument};

use crate::repository::EthereumRepository;
use crate::repository::contract::ISwapRouter;

use super::ServiceResult;
use super::gas::gas_spent_usd;
use super::registry::UniswapConfig;
use super::types::{Route, SwapOptions, TokenDescriptor};
use super::utils::format_feed_answer;

/// Uniswap V3 fee tiers probed when searching for a pool, in basis points
/// of a basis point (500 = 0.05%).
const FEE_TIERS: [u32; 3] = [500, 3000, 10_000];

/// Finds an executable route for a token pair, or reports that none exists.
#[async_trait]
pub trait RouteDiscovery: Send + Sync {
    async fn find_route(
        &self,
        token_in: &TokenDescriptor,
        token_out: &TokenDescriptor,
        amount_in: U256,
        options: &SwapOptions,
    ) -> ServiceResult<Option<Route>>;
}

/// Route discovery over Uniswap V3 single-hop pools.
///
/// Each configured fee tier is quoted through QuoterV2 and the tier with the
/// best output wins. A pair with no quotable pool yields no route rather
/// than an error.
pub struct SmartRouter {
    repository: Arc<dyn EthereumRepository>,
    uniswap: UniswapConfig,
    eth_usd_feed: Address,
}

impl SmartRouter {
    pub fn new(
        repository: Arc<dyn EthereumRepository>,
        uniswap: UniswapConfig,
        eth_usd_feed: Address,
    ) -> Self {
        Self {
            repository,
            uniswap,
            eth_usd_feed,
        }
    }

    async fn best_quote(
        &self,
        token_in: Address,
        token_out: Address,
        amount_in: U256,
    ) -> ServiceResult<Option<(u32, U256, u64)>> {
        let mut best: Option<(u32, U256, u64)> = None;
        for fee in FEE_TIERS {
            match self
                .repository
                .get_v3_quote(self.uniswap.quoter, token_in, token_out, amount_in, fee)
                .await
            {
                Ok((amount_out, gas_estimate)) if amount_out > U256::ZERO => {
                    debug!(fee, %amount_out, "quoted fee tier");
                    if best.is_none_or(|(_, out, _)| amount_out > out) {
                        best = Some((fee, amount_out, gas_estimate));
                    }
                }
                Ok(_) => debug!(fee, "fee tier quoted zero output"),
                // No pool at this tier, or the pool cannot fill the amount.
                Err(e) => debug!(fee, error = %e, "fee tier not quotable"),
            }
        }
        Ok(best)
    }

    async fn estimate_gas_usd(&self, gas_estimate: u64) -> ServiceResult<rust_decimal::Decimal> {
        let gas_price = self.repository.get_gas_price().await?;
        let round = self.repository.get_feed_round(self.eth_usd_feed).await?;
        let eth_usd = format_feed_answer(round.answer, round.decimals)?;
        gas_spent_usd(gas_estimate, gas_price, eth_usd)
    }
}

#[async_trait]
impl RouteDiscovery for SmartRouter {
    #[instrument(skip(self, options), err)]
    async fn find_route(
        &self,
        token_in: &TokenDescriptor,
        token_out: &TokenDescriptor,
        amount_in: U256,
        options: &SwapOptions,
    ) -> ServiceResult<Option<Route>> {
        let Some((fee_tier, quote_out, gas_estimate)) = self
            .best_quote(token_in.address, token_out.address, amount_in)
            .await?
        else {
            debug!(
                token_in = %token_in.symbol,
                token_out = %token_out.symbol,
                "no quotable pool on any fee tier"
            );
            return Ok(None);
        };

        let slippage = U256::from(10_000 - options.slippage_bps);
        let minimum_out = quote_out * slippage / U256::from(10_000u64);

        let params = ISwapRouter::ExactInputSingleParams {
            tokenIn: token_in.address,
            tokenOut: token_out.address,
            fee: U24::from(fee_tier),
            recipient: options.recipient,
            deadline: U256::from(options.deadline),
            amountIn: amount_in,
            amountOutMinimum: minimum_out,
            sqrtPriceLimitX96: U160::ZERO,
        };
        let calldata = ISwapRouter::exactInputSingleCall { params }.abi_encode();

        let estimated_gas_usd = self.estimate_gas_usd(gas_estimate).await?;

        Ok(Some(Route {
            calldata: calldata.into(),
            value: U256::ZERO,
            quote_out,
            minimum_out,
            estimated_gas: gas_estimate,
            estimated_gas_usd,
            fee_tier,
        }))
    }
}
