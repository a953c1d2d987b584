use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "eth-trading-cli", version, about = "CLI for price feeds, token tasks and Uniswap V3 swaps")]
pub struct Cli {
    /// Path to the YAML configuration file
    #[arg(long, global = true, default_value = "config/default.yaml")]
    pub config: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show the native ETH balance of an account
    Balance {
        /// Account to query (defaults to the signer)
        #[arg(long)]
        account: Option<String>,
    },

    /// Show an ERC20 balance with symbol and decimals applied
    GetTokenBalance {
        /// Token contract address
        #[arg(long)]
        token: String,
        /// Account to query (defaults to the signer)
        #[arg(long)]
        account: Option<String>,
    },

    /// Show on-chain decimals, symbol and name for a token contract
    GetTokenMetadata {
        #[arg(long)]
        token: String,
    },

    /// Show the latest answer of a Chainlink price feed
    GetPrice {
        /// Feed contract address (defaults to the network's ETH/USD feed)
        #[arg(long)]
        price_feed: Option<String>,
    },

    /// Download a verified contract ABI from Etherscan into abis/
    GetAbi {
        #[arg(long)]
        contract: String,
        /// File name for the ABI (written to abis/<file-name>.json)
        #[arg(long)]
        file_name: String,
    },

    /// Wrap native ETH into WETH
    WrapEth {
        /// Amount of ETH, human readable (e.g. 0.5)
        #[arg(long)]
        amount: String,
    },

    /// Approve a spender to transfer an ERC20 amount on your behalf
    Approve {
        /// Token contract address
        #[arg(long)]
        token: String,
        #[arg(long)]
        spender: String,
        /// Amount in token units, human readable
        #[arg(long)]
        amount: String,
    },

    /// Swap between two registered tokens with explicit EIP-1559 fees
    Swap {
        #[command(flatten)]
        args: SwapArgs,
        /// Max fee per gas in wei (queried from the node when omitted)
        #[arg(long, requires = "max_priority_fee_per_gas")]
        max_fee_per_gas: Option<u128>,
        /// Max priority fee per gas in wei
        #[arg(long, requires = "max_fee_per_gas")]
        max_priority_fee_per_gas: Option<u128>,
    },

    /// Swap between two registered tokens with automatic fee selection
    SmartSwap {
        #[command(flatten)]
        args: SwapArgs,
    },
}

#[derive(Debug, clap::Args)]
pub struct SwapArgs {
    /// Input token symbol
    #[arg(long = "in")]
    pub token_in: String,

    /// Input amount, human readable
    #[arg(long)]
    pub amount: String,

    /// Output token symbol
    #[arg(long = "out")]
    pub token_out: String,

    /// Deliver the output to this address instead of the signer
    #[arg(long)]
    pub recipient: Option<String>,

    /// Skip the confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_swap_with_fee_overrides() {
        let cli = Cli::parse_from([
            "eth-trading-cli",
            "swap",
            "--in",
            "WETH",
            "--amount",
            "0.5",
            "--out",
            "USDC",
            "--max-fee-per-gas",
            "30000000000",
            "--max-priority-fee-per-gas",
            "1000000000",
            "--yes",
        ]);

        match cli.command {
            Commands::Swap {
                args,
                max_fee_per_gas,
                max_priority_fee_per_gas,
            } => {
                assert_eq!(args.token_in, "WETH");
                assert_eq!(args.token_out, "USDC");
                assert_eq!(args.amount, "0.5");
                assert!(args.yes);
                assert_eq!(max_fee_per_gas, Some(30_000_000_000));
                assert_eq!(max_priority_fee_per_gas, Some(1_000_000_000));
            }
            other => panic!("Expected Swap, got: {other:?}"),
        }
    }

    #[test]
    fn priority_fee_requires_max_fee() {
        let result = Cli::try_parse_from([
            "eth-trading-cli",
            "swap",
            "--in",
            "WETH",
            "--amount",
            "0.5",
            "--out",
            "USDC",
            "--max-priority-fee-per-gas",
            "1000000000",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn parses_smart_swap_without_fee_flags() {
        let cli = Cli::parse_from([
            "eth-trading-cli",
            "smart-swap",
            "--in",
            "WETH",
            "--amount",
            "1",
            "--out",
            "WBTC",
        ]);

        match cli.command {
            Commands::SmartSwap { args } => {
                assert_eq!(args.token_in, "WETH");
                assert!(!args.yes);
                assert!(args.recipient.is_none());
            }
            other => panic!("Expected SmartSwap, got: {other:?}"),
        }
    }

    #[test]
    fn config_flag_is_global() {
        let cli = Cli::parse_from([
            "eth-trading-cli",
            "get-price",
            "--config",
            "config/test.yaml",
        ]);
        assert_eq!(cli.config, "config/test.yaml");
    }

    #[test]
    fn parses_address_flags() {
        let cli = Cli::parse_from([
            "eth-trading-cli",
            "get-token-balance",
            "--token",
            "0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2",
            "--account",
            "0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045",
        ]);

        match cli.command {
            Commands::GetTokenBalance { token, account } => {
                assert!(token.starts_with("0xC02a"));
                assert!(account.unwrap().starts_with("0xd8dA"));
            }
            other => panic!("Expected GetTokenBalance, got: {other:?}"),
        }
    }

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
