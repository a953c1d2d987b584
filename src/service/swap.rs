use std::io::BufRead;
use std::sync::Arc;

use alloy::primitives::{Address, Log, U256};
use alloy::sol_types::SolEvent;
use console::style;
use tracing::{info, instrument, warn};

use crate::repository::contract::IERC20;
use crate::repository::{EthereumRepository, FeeData};

use super::ServiceResult;
use super::error::ServiceError;
use super::gas::GasReporter;
use super::router::RouteDiscovery;
use super::tasks::TaskService;
use super::types::{Route, SwapOptions, SwapReport, TokenDescriptor};
use super::utils::{format_units, format_usd, parse_units};

/// Amount of ETH wrapped up front on a local fork so a freshly forked
/// account holds WETH to trade with.
const FORK_PREWRAP_WEI: u128 = 1_000_000_000_000_000_000;

/// Whether the process talks to a local fork or a real network.
///
/// On a fork the confirmation prompt is skipped and the account is funded
/// first: 1 ETH is wrapped, and when the input token is not WETH the wrapped
/// amount is swapped into it before the requested swap runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionTarget {
    Live,
    Fork,
}

/// Drives a swap end to end: resolve, route, confirm, approve, submit,
/// verify and report.
pub struct SwapExecutor {
    tasks: TaskService,
    router: Arc<dyn RouteDiscovery>,
    target: ExecutionTarget,
    assume_yes: bool,
    fee_overrides: Option<FeeData>,
    recipient_override: Option<Address>,
}

impl SwapExecutor {
    pub fn new(tasks: TaskService, router: Arc<dyn RouteDiscovery>, target: ExecutionTarget) -> Self {
        Self {
            tasks,
            router,
            target,
            assume_yes: false,
            fee_overrides: None,
            recipient_override: None,
        }
    }

    /// Skip the interactive confirmation prompt.
    pub fn assume_yes(mut self, yes: bool) -> Self {
        self.assume_yes = yes;
        self
    }

    /// Submit the swap with caller-chosen EIP-1559 fees instead of the
    /// node's suggestions.
    pub fn with_fee_overrides(mut self, fees: Option<FeeData>) -> Self {
        self.fee_overrides = fees;
        self
    }

    /// Deliver the output token to an address other than the signer.
    pub fn with_recipient(mut self, recipient: Option<Address>) -> Self {
        self.recipient_override = recipient;
        self
    }

    /// Execute a swap between two registered token symbols.
    #[instrument(skip(self), err)]
    pub async fn swap(
        &self,
        token_in_symbol: &str,
        amount_in: &str,
        token_out_symbol: &str,
    ) -> ServiceResult<SwapReport> {
        let repository = self.tasks.repository();
        let signer = repository
            .signer_address()
            .ok_or_else(|| ServiceError::WalletRequired("swap".to_string()))?;

        let token_in = self.tasks.resolve_token(token_in_symbol).await?;
        let token_out = self.tasks.resolve_token(token_out_symbol).await?;
        let raw_amount_in = parse_units(amount_in, token_in.decimals)?;

        if self.target == ExecutionTarget::Fork {
            self.fund_fork_account(&repository, signer, &token_in).await?;
        }

        let recipient = self.recipient_override.unwrap_or(signer);
        let options = SwapOptions::new(recipient);

        let network = self.tasks.network()?;
        let uniswap = network.uniswap()?;
        let eth_usd_feed = network.eth_usd_feed()?;

        let route = self
            .router
            .find_route(&token_in, &token_out, raw_amount_in, &options)
            .await?
            .ok_or_else(|| ServiceError::NoRouteFound {
                token_in: token_in.symbol.clone(),
                token_out: token_out.symbol.clone(),
            })?;

        self.print_route_detail(&token_out, &route, &options);
        self.confirm(&quote_prompt(amount_in, &token_in, &token_out, &route))?;

        let approval = self
            .tasks
            .approve_raw(&token_in, uniswap.swap_router, raw_amount_in)
            .await?;
        println!(
            "{}",
            style(format!(
                "Approved {} {} for the router (gas: {})",
                amount_in, token_in.symbol, approval.gas_spent_usd
            ))
            .green()
        );

        let fees = self.fee_data(&repository).await?;

        let receipt = repository
            .send_router_transaction(uniswap.swap_router, route.calldata.clone(), route.value, fees)
            .await
            .map_err(|e| ServiceError::SwapFailed(e.to_string()))?;
        if !receipt.status {
            return Err(ServiceError::SwapFailed(format!(
                "transaction {} reverted",
                receipt.tx_hash
            )));
        }

        let amount_out = match find_transfer_to_recipient(&receipt.logs, token_out.address, recipient)
        {
            Some(value) => format_units(value, token_out.decimals),
            None => {
                warn!(tx_hash = %receipt.tx_hash, "no transfer log to recipient in receipt");
                "?".to_string()
            }
        };

        let gas_spent_usd = GasReporter::new(repository, eth_usd_feed)
            .gas_spent_in_usd(&receipt)
            .await?;
        info!(tx_hash = %receipt.tx_hash, amount_out, gas_spent_usd, "swap confirmed");

        println!(
            "{}",
            style(format!(
                "Swapped {} {} for {} {} (gas: {})",
                amount_in, token_in.symbol, amount_out, token_out.symbol, gas_spent_usd
            ))
            .green()
            .bold()
        );
        if let Some(link) = network.tx_link(receipt.tx_hash) {
            println!("{}", style(link).dim());
        }

        Ok(SwapReport {
            tx_hash: receipt.tx_hash,
            amount_in: amount_in.to_string(),
            token_in_symbol: token_in.symbol,
            amount_out,
            token_out_symbol: token_out.symbol,
            gas_spent_usd,
        })
    }

    /// Fund the fork account: wrap 1 ETH, and when the requested input token
    /// is not WETH, swap the wrapped amount into it so the account holds
    /// something to trade with.
    async fn fund_fork_account(
        &self,
        repository: &Arc<dyn EthereumRepository>,
        signer: Address,
        token_in: &TokenDescriptor,
    ) -> ServiceResult<()> {
        let network = self.tasks.network()?;
        let weth_address = network.token("WETH")?;
        let uniswap = network.uniswap()?;

        info!("pre-wrapping 1 ETH on fork");
        let funding = U256::from(FORK_PREWRAP_WEI);
        let receipt = repository.wrap_eth(weth_address, funding).await?;
        if !receipt.status {
            return Err(ServiceError::UpstreamCallFailed(format!(
                "fork pre-wrap transaction {} reverted",
                receipt.tx_hash
            )));
        }

        if token_in.address == weth_address {
            return Ok(());
        }

        // The wrapped WETH is not what the operator asked to sell, so swap
        // it into the input token first.
        info!(token_in = %token_in.symbol, "swapping wrapped ETH into the input token on fork");
        let weth = self.tasks.describe_token(weth_address).await?;
        let options = SwapOptions::new(signer);
        let route = self
            .router
            .find_route(&weth, token_in, funding, &options)
            .await?
            .ok_or_else(|| ServiceError::NoRouteFound {
                token_in: weth.symbol.clone(),
                token_out: token_in.symbol.clone(),
            })?;

        self.tasks
            .approve_raw(&weth, uniswap.swap_router, funding)
            .await?;
        let fees = self.fee_data(repository).await?;
        let receipt = repository
            .send_router_transaction(uniswap.swap_router, route.calldata, route.value, fees)
            .await
            .map_err(|e| ServiceError::SwapFailed(e.to_string()))?;
        if !receipt.status {
            return Err(ServiceError::SwapFailed(format!(
                "fork funding swap {} reverted",
                receipt.tx_hash
            )));
        }

        Ok(())
    }

    async fn fee_data(&self, repository: &Arc<dyn EthereumRepository>) -> ServiceResult<FeeData> {
        match self.fee_overrides {
            Some(fees) => Ok(fees),
            None => repository
                .get_fee_data()
                .await
                .map_err(|e| ServiceError::FeeDataUnavailable(e.to_string())),
        }
    }

    fn print_route_detail(&self, token_out: &TokenDescriptor, route: &Route, options: &SwapOptions) {
        println!(
            "{}",
            style(format!(
                "Route found on the {:.2}% fee tier (minimum out {} {} after {} bps slippage, ~{} gas)",
                route.fee_tier as f64 / 10_000.0,
                format_units(route.minimum_out, token_out.decimals),
                token_out.symbol,
                options.slippage_bps,
                route.estimated_gas,
            ))
            .dim()
        );
    }

    fn confirm(&self, quote: &str) -> ServiceResult<()> {
        if self.assume_yes
            || self.target == ExecutionTarget::Fork
            || std::env::var("SKIP_PROMPTS").is_ok()
        {
            return Ok(());
        }

        println!("{}", style(format!("{quote} [y/N] ")).yellow());
        let mut line = String::new();
        std::io::stdin()
            .lock()
            .read_line(&mut line)
            .map_err(|_| ServiceError::Aborted)?;
        if is_affirmative(&line) {
            Ok(())
        } else {
            Err(ServiceError::Aborted)
        }
    }
}

/// The single-line quote shown at the confirmation prompt, e.g.
/// `Swap 0.5 WETH to 1000.0 USDC using $6.00 worth of gas?`.
pub(crate) fn quote_prompt(
    amount_in: &str,
    token_in: &TokenDescriptor,
    token_out: &TokenDescriptor,
    route: &Route,
) -> String {
    format!(
        "Swap {} {} to {} {} using {} worth of gas?",
        amount_in,
        token_in.symbol,
        format_units(route.quote_out, token_out.decimals),
        token_out.symbol,
        format_usd(route.estimated_gas_usd),
    )
}

/// Scan receipt logs for a Transfer of `token` to `recipient` and return the
/// transferred amount. Logs from other contracts and undecodable logs are
/// skipped.
pub(crate) fn find_transfer_to_recipient(
    logs: &[Log],
    token: Address,
    recipient: Address,
) -> Option<U256> {
    logs.iter()
        .filter(|log| log.address == token)
        .filter_map(|log| IERC20::Transfer::decode_log_data(&log.data).ok())
        .find(|transfer| transfer.to == recipient)
        .map(|transfer| transfer.value)
}

/// Whether a prompt reply means yes. Only `y` and `yes` qualify, case
/// insensitively; everything else aborts.
pub(crate) fn is_affirmative(input: &str) -> bool {
    matches!(input.trim().to_lowercase().as_str(), "y" | "yes")
}
