pub mod cli;
pub mod config;
pub mod etherscan;
pub mod repository;
pub mod service;

use std::str::FromStr;
use std::sync::Arc;

use alloy::primitives::Address;
use anyhow::Context;
use clap::Parser;
use console::style;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::cli::{Cli, Commands, SwapArgs};
use crate::config::Config;
use crate::etherscan::EtherscanClient;
use crate::repository::{AlloyEthereumRepository, EthereumRepository, FeeData};
use crate::service::{
    AddressBook, ExecutionTarget, SmartRouter, SwapExecutor, TaskService,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,alloy=warn,hyper=warn,reqwest=warn".into());

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_file(true)
        .with_line_number(true)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();

    let cli = Cli::parse();
    let config = Config::from_yaml(&cli.config).await;

    let repository = build_repository(&config)?;
    let chain_id = repository
        .get_chain_id()
        .await
        .context("failed to query the chain id from the RPC endpoint")?;
    tracing::info!(chain_id, network = %config.network.name, "connected");

    let tasks = TaskService::new(repository.clone(), AddressBook::new(), chain_id);

    match cli.command {
        Commands::Balance { account } => {
            let account = match account {
                Some(raw) => parse_address(&raw)?,
                None => signer_address(&repository)?,
            };
            let report = tasks.eth_balance(account).await?;
            println!(
                "{} ETH ({} wei)",
                style(&report.formatted_balance).bold(),
                report.balance
            );
        }

        Commands::GetTokenBalance { token, account } => {
            let token = parse_address(&token)?;
            let account = match account {
                Some(raw) => parse_address(&raw)?,
                None => signer_address(&repository)?,
            };
            let report = tasks.token_balance(token, account).await?;
            println!(
                "{} {} ({} raw, {} decimals)",
                style(&report.formatted_balance).bold(),
                report.symbol,
                report.balance,
                report.decimals
            );
        }

        Commands::GetTokenMetadata { token } => {
            let token = tasks.describe_token(parse_address(&token)?).await?;
            println!("{} ({})", style(&token.name).bold(), token.symbol);
            println!("  address:  {}", token.address);
            println!("  decimals: {}", token.decimals);
        }

        Commands::GetPrice { price_feed } => {
            let report = match price_feed {
                Some(raw) => tasks.feed_price(parse_address(&raw)?).await?,
                None => tasks.eth_usd_price().await?,
            };
            println!("Price: {}", style(&report.price).bold().green());
        }

        Commands::GetAbi { contract, file_name } => {
            let contract = parse_address(&contract)?;
            let client = EtherscanClient::new(config.etherscan.api_key.clone(), chain_id)?;
            let path = client.write_abi(contract, &file_name, "abis").await?;
            println!("ABI written to {}", style(path.display()).bold());
        }

        Commands::WrapEth { amount } => {
            let report = tasks.wrap_eth(&amount).await?;
            println!(
                "{}",
                style(format!(
                    "Wrapped {} ETH, WETH balance is now {}",
                    report.amount, report.weth_balance
                ))
                .green()
            );
            print_tx_link(&tasks, report.tx_hash)?;
        }

        Commands::Approve {
            token,
            spender,
            amount,
        } => {
            let token = parse_address(&token)?;
            let spender = parse_address(&spender)?;
            let report = tasks.approve_token(token, spender, &amount).await?;
            println!(
                "{}",
                style(format!(
                    "Approved: allowance is now {} {} (gas: {})",
                    report.allowance, report.symbol, report.gas_spent_usd
                ))
                .green()
            );
            print_tx_link(&tasks, report.tx_hash)?;
        }

        Commands::Swap {
            args,
            max_fee_per_gas,
            max_priority_fee_per_gas,
        } => {
            let fees = max_fee_per_gas.zip(max_priority_fee_per_gas).map(
                |(max_fee_per_gas, max_priority_fee_per_gas)| FeeData {
                    max_fee_per_gas,
                    max_priority_fee_per_gas,
                },
            );
            run_swap(&config, repository, tasks, chain_id, args, fees).await?;
        }

        Commands::SmartSwap { args } => {
            run_swap(&config, repository, tasks, chain_id, args, None).await?;
        }
    }

    Ok(())
}

/// Connect with the configured wallet, or fall back to a read-only
/// connection when no usable key is present.
fn build_repository(config: &Config) -> anyhow::Result<Arc<dyn EthereumRepository>> {
    if config.wallet.has_signer() {
        match AlloyEthereumRepository::connect_with_wallet(
            &config.rpc.url,
            &config.wallet.private_key,
        ) {
            Ok(repository) => return Ok(Arc::new(repository)),
            Err(e) => {
                tracing::warn!(error = %e, "wallet setup failed, continuing read-only");
            }
        }
    }

    let repository = AlloyEthereumRepository::connect(&config.rpc.url)
        .context("failed to connect to the RPC endpoint")?;
    Ok(Arc::new(repository))
}

async fn run_swap(
    config: &Config,
    repository: Arc<dyn EthereumRepository>,
    tasks: TaskService,
    chain_id: u64,
    args: SwapArgs,
    fees: Option<FeeData>,
) -> anyhow::Result<()> {
    let book = AddressBook::new();
    let network = book.network(chain_id)?;
    let router = SmartRouter::new(
        repository,
        network.uniswap()?,
        network.eth_usd_feed()?,
    );

    let target = if config.is_fork() {
        ExecutionTarget::Fork
    } else {
        ExecutionTarget::Live
    };

    let recipient = match args.recipient.as_deref().or(config.wallet.recipient()) {
        Some(raw) => Some(parse_address(raw)?),
        None => None,
    };

    let executor = SwapExecutor::new(tasks, Arc::new(router), target)
        .assume_yes(args.yes)
        .with_fee_overrides(fees)
        .with_recipient(recipient);

    executor
        .swap(&args.token_in, &args.amount, &args.token_out)
        .await?;

    Ok(())
}

fn parse_address(raw: &str) -> anyhow::Result<Address> {
    Address::from_str(raw).with_context(|| format!("invalid address: {raw}"))
}

fn signer_address(repository: &Arc<dyn EthereumRepository>) -> anyhow::Result<Address> {
    repository
        .signer_address()
        .context("no address given and no wallet configured")
}

fn print_tx_link(tasks: &TaskService, tx_hash: alloy::primitives::B256) -> anyhow::Result<()> {
    if let Some(link) = tasks.network()?.tx_link(tx_hash) {
        println!("{}", style(link).dim());
    }
    Ok(())
}
