use alloy::primitives::{Address, B256, Bytes, U256};
use rust_decimal::Decimal;
use serde::Serialize;

/// Value object describing an ERC20 token, built once per run from on-chain
/// metadata and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenDescriptor {
    pub chain_id: u64,
    pub address: Address,
    pub decimals: u8,
    pub symbol: String,
    pub name: String,
}

/// How to swap: recipient, slippage tolerance and deadline.
#[derive(Debug, Clone, Copy)]
pub struct SwapOptions {
    pub recipient: Address,
    /// Slippage tolerance in basis points (50 = 0.5%).
    pub slippage_bps: u32,
    /// Unix timestamp after which the router must revert the swap.
    pub deadline: u64,
}

impl SwapOptions {
    const DEFAULT_SLIPPAGE_BPS: u32 = 50;
    const DEFAULT_DEADLINE_SECS: i64 = 1800;

    pub fn new(recipient: Address) -> Self {
        Self {
            recipient,
            slippage_bps: Self::DEFAULT_SLIPPAGE_BPS,
            deadline: (chrono::Utc::now().timestamp() + Self::DEFAULT_DEADLINE_SECS) as u64,
        }
    }
}

/// A computed execution path for a prospective trade.
///
/// Opaque to the executor beyond the call payload, the attached native value
/// and the quote figures shown at the confirmation prompt.
#[derive(Debug, Clone)]
pub struct Route {
    pub calldata: Bytes,
    pub value: U256,
    pub quote_out: U256,
    pub minimum_out: U256,
    pub estimated_gas: u64,
    pub estimated_gas_usd: Decimal,
    pub fee_tier: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct BalanceReport {
    /// Raw balance in wei
    pub balance: String,
    /// Balance formatted as ETH
    pub formatted_balance: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TokenBalanceReport {
    /// Raw balance in the token's smallest unit
    pub balance: String,
    /// Balance formatted with the token's decimals
    pub formatted_balance: String,
    pub decimals: u8,
    pub symbol: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PriceReport {
    /// Latest feed answer formatted with the feed's decimals
    pub price: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ApprovalReport {
    #[serde(skip)]
    pub tx_hash: B256,
    /// Resulting allowance formatted with the token's decimals
    pub allowance: String,
    pub symbol: String,
    /// Gas spent on the approval transaction, e.g. "$1.99"
    pub gas_spent_usd: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct WrapReport {
    #[serde(skip)]
    pub tx_hash: B256,
    /// Amount of ETH wrapped, human readable
    pub amount: String,
    /// Resulting WETH balance, human readable
    pub weth_balance: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SwapReport {
    #[serde(skip)]
    pub tx_hash: B256,
    pub amount_in: String,
    pub token_in_symbol: String,
    /// Amount actually received by the recipient, or "?" when no matching
    /// transfer log was found in the receipt
    pub amount_out: String,
    pub token_out_symbol: String,
    /// Gas spent on the swap transaction, e.g. "$1.99"
    pub gas_spent_usd: String,
}
