use std::collections::HashMap;

use alloy::primitives::{Address, B256, address};

use super::ServiceResult;
use super::error::ServiceError;

// Chainlink ETH/USD price feeds
const MAINNET_ETH_USD_FEED: Address = address!("0x5f4eC3Df9cbd43714FE2740f5E3616155c5b8419");
const ARBITRUM_ETH_USD_FEED: Address = address!("0x639Fe6ab55C921f74e7fac1ee960C0B6293ba612");

// Uniswap V3 (same deployment addresses on mainnet and Arbitrum One)
const V3_SWAP_ROUTER: Address = address!("0xE592427A0AEce92De3Edee1F18E0157C05861564");
const V3_QUOTER_V2: Address = address!("0x61fFE014bA17989E743c5F6cB21bF9697530B21e");

// Token contract addresses on Ethereum mainnet
const MAINNET_WBTC: Address = address!("0x2260FAC5E5542a773Aa44fBCfeDf7C193bc2C599");
const MAINNET_WETH: Address = address!("0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2");
const MAINNET_RETH: Address = address!("0xae78736Cd615f374D3085123A210448E74Fc6393");
const MAINNET_USDC: Address = address!("0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48");
const MAINNET_LINK: Address = address!("0x514910771AF9Ca656af840dff83E8264EcF986CA");

// Token contract addresses on Arbitrum One
const ARBITRUM_WBTC: Address = address!("0x2f2a2543B76A4166549F7aaB2e75Bef0aefC5B0f");
const ARBITRUM_WETH: Address = address!("0x82aF49447D8a07e3bd95BD0d56f35241523fBab1");
const ARBITRUM_RETH: Address = address!("0xEC70Dcb4A1EFa46b8F2D97C310C9c4790ba5ffA8");
const ARBITRUM_USDC: Address = address!("0xaf88d065e77c8cC2239327C5EDb3A432268e5831");
const ARBITRUM_LINK: Address = address!("0xf97f4df75117a78c1A5a0DBb814Af92458539FB4");

/// Chainlink capability of a network: the price feeds deployed on it.
#[derive(Debug, Clone, Copy)]
pub struct PriceFeedConfig {
    pub eth_usd: Address,
}

/// Uniswap capability of a network: router and quoter deployments.
#[derive(Debug, Clone, Copy)]
pub struct UniswapConfig {
    pub swap_router: Address,
    pub quoter: Address,
}

/// Static per-network contract addresses.
///
/// Capabilities a network may lack (price feeds, a router deployment) are
/// Option-typed so absence is checked at the lookup site instead of by
/// runtime property probing.
#[derive(Debug, Clone)]
pub struct NetworkEntry {
    pub chain_id: u64,
    pub name: &'static str,
    chainlink: Option<PriceFeedConfig>,
    uniswap: Option<UniswapConfig>,
    tokens: HashMap<&'static str, Address>,
    explorer_tx_prefix: Option<&'static str>,
}

impl NetworkEntry {
    /// Total token lookup, case-insensitive; fails closed on unknown input.
    pub fn token(&self, symbol: &str) -> ServiceResult<Address> {
        let key = symbol.to_uppercase();
        self.tokens.get(key.as_str()).copied().ok_or_else(|| {
            tracing::warn!("Token symbol not found for {}: {}", self.name, symbol);
            ServiceError::InvalidTokenSymbol(format!(
                "{} (supported tokens: {})",
                symbol,
                self.token_symbols().join(", ")
            ))
        })
    }

    /// All token symbols configured for this network, sorted alphabetically.
    pub fn token_symbols(&self) -> Vec<&'static str> {
        let mut symbols: Vec<&'static str> = self.tokens.keys().copied().collect();
        symbols.sort_unstable();
        symbols
    }

    /// The Uniswap deployment for this network, if any.
    pub fn uniswap(&self) -> ServiceResult<UniswapConfig> {
        self.capability(self.uniswap)
    }

    /// The ETH/USD feed for this network, if any.
    pub fn eth_usd_feed(&self) -> ServiceResult<Address> {
        self.capability(self.chainlink.map(|c| c.eth_usd))
    }

    fn capability<T>(&self, value: Option<T>) -> ServiceResult<T> {
        value.ok_or(ServiceError::NetworkNotConfigured(self.chain_id))
    }

    /// Block-explorer link for a transaction hash, when the network has a
    /// public explorer (the local fork does not).
    pub fn tx_link(&self, tx_hash: B256) -> Option<String> {
        self.explorer_tx_prefix
            .map(|prefix| format!("{prefix}{tx_hash}"))
    }
}

/// Address book mapping chain ids to their contract addresses.
///
/// Static data loaded at process start and immutable afterwards.
#[derive(Debug, Clone)]
pub struct AddressBook {
    entries: HashMap<u64, NetworkEntry>,
}

impl AddressBook {
    pub fn new() -> Self {
        let mut entries = HashMap::new();

        entries.insert(
            1,
            NetworkEntry {
                chain_id: 1,
                name: "mainnet",
                chainlink: Some(PriceFeedConfig {
                    eth_usd: MAINNET_ETH_USD_FEED,
                }),
                uniswap: Some(UniswapConfig {
                    swap_router: V3_SWAP_ROUTER,
                    quoter: V3_QUOTER_V2,
                }),
                tokens: HashMap::from([
                    ("WBTC", MAINNET_WBTC),
                    ("WETH", MAINNET_WETH),
                    ("RETH", MAINNET_RETH),
                    ("USDC", MAINNET_USDC),
                    ("LINK", MAINNET_LINK),
                ]),
                explorer_tx_prefix: Some("https://etherscan.io/tx/"),
            },
        );

        entries.insert(
            42161,
            NetworkEntry {
                chain_id: 42161,
                name: "arbitrum",
                chainlink: Some(PriceFeedConfig {
                    eth_usd: ARBITRUM_ETH_USD_FEED,
                }),
                uniswap: Some(UniswapConfig {
                    swap_router: V3_SWAP_ROUTER,
                    quoter: V3_QUOTER_V2,
                }),
                tokens: HashMap::from([
                    ("WBTC", ARBITRUM_WBTC),
                    ("WETH", ARBITRUM_WETH),
                    ("RETH", ARBITRUM_RETH),
                    ("USDC", ARBITRUM_USDC),
                    ("LINK", ARBITRUM_LINK),
                ]),
                explorer_tx_prefix: Some("https://arbiscan.io/tx/"),
            },
        );

        // Local fork of Arbitrum One, so the Arbitrum deployments apply.
        entries.insert(
            31337,
            NetworkEntry {
                chain_id: 31337,
                name: "localhost",
                chainlink: Some(PriceFeedConfig {
                    eth_usd: ARBITRUM_ETH_USD_FEED,
                }),
                uniswap: Some(UniswapConfig {
                    swap_router: V3_SWAP_ROUTER,
                    quoter: V3_QUOTER_V2,
                }),
                tokens: HashMap::from([
                    ("WBTC", ARBITRUM_WBTC),
                    ("WETH", ARBITRUM_WETH),
                    ("RETH", ARBITRUM_RETH),
                    ("USDC", ARBITRUM_USDC),
                    ("LINK", ARBITRUM_LINK),
                ]),
                explorer_tx_prefix: None,
            },
        );

        Self { entries }
    }

    /// Lookup the entry for a chain id; unknown chains fail closed.
    pub fn network(&self, chain_id: u64) -> ServiceResult<&NetworkEntry> {
        self.entries
            .get(&chain_id)
            .ok_or(ServiceError::NetworkNotConfigured(chain_id))
    }

    /// All configured chain ids.
    pub fn chain_ids(&self) -> Vec<u64> {
        let mut ids: Vec<u64> = self.entries.keys().copied().collect();
        ids.sort_unstable();
        ids
    }
}

impl Default for AddressBook {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_existing_network() {
        let book = AddressBook::new();

        assert_eq!(book.network(1).unwrap().name, "mainnet");
        assert_eq!(book.network(42161).unwrap().name, "arbitrum");
        assert_eq!(book.network(31337).unwrap().name, "localhost");
    }

    #[test]
    fn lookup_unknown_network_fails_closed() {
        let book = AddressBook::new();

        match book.network(5) {
            Err(ServiceError::NetworkNotConfigured(5)) => {}
            other => panic!("Expected NetworkNotConfigured, got: {other:?}"),
        }
    }

    #[test]
    fn token_lookup_round_trips_for_all_networks() {
        let book = AddressBook::new();

        for chain_id in book.chain_ids() {
            let entry = book.network(chain_id).unwrap();
            for symbol in entry.token_symbols() {
                let address = entry.token(symbol).unwrap();
                assert_eq!(entry.token(&symbol.to_lowercase()).unwrap(), address);
            }
        }
    }

    #[test]
    fn token_lookup_is_case_insensitive() {
        let book = AddressBook::new();
        let entry = book.network(1).unwrap();

        assert_eq!(entry.token("weth").unwrap(), MAINNET_WETH);
        assert_eq!(entry.token("rEth").unwrap(), MAINNET_RETH);
    }

    #[test]
    fn unknown_symbol_fails_with_invalid_token_symbol() {
        let book = AddressBook::new();
        let entry = book.network(1).unwrap();

        match entry.token("DOGE") {
            Err(ServiceError::InvalidTokenSymbol(msg)) => {
                assert!(msg.contains("DOGE"));
                assert!(msg.contains("WETH"), "error should list supported tokens");
            }
            other => panic!("Expected InvalidTokenSymbol, got: {other:?}"),
        }
    }

    #[test]
    fn capabilities_are_present_where_configured() {
        let book = AddressBook::new();

        let mainnet = book.network(1).unwrap();
        assert_eq!(mainnet.eth_usd_feed().unwrap(), MAINNET_ETH_USD_FEED);
        assert_eq!(mainnet.uniswap().unwrap().swap_router, V3_SWAP_ROUTER);

        let localhost = book.network(31337).unwrap();
        assert!(localhost.tx_link(B256::ZERO).is_none());
        assert!(
            book.network(42161)
                .unwrap()
                .tx_link(B256::ZERO)
                .unwrap()
                .starts_with("https://arbiscan.io/tx/")
        );
    }
}
