use thiserror::Error;

use crate::repository::RepositoryError;

#[derive(Debug, Clone, Error)]
pub enum ServiceError {
    // Business validation errors
    /// The token symbol is not present in the target network's token map.
    #[error("Invalid token symbol: {0}")]
    InvalidTokenSymbol(String),

    /// No address book entry exists for the connected chain.
    #[error("Network not configured for chain id {0}")]
    NetworkNotConfigured(u64),

    /// The provided address is invalid or malformed.
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    /// The requested amount is malformed or cannot be scaled to raw units.
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    // Pipeline errors
    /// The routing engine found no viable path between the two tokens.
    #[error("No route found for {token_in} -> {token_out}")]
    NoRouteFound { token_in: String, token_out: String },

    /// The approval transaction was mined with a non-success status.
    #[error("Transfer approval failed: {0}")]
    ApprovalFailed(String),

    /// The swap transaction was mined with a non-success status.
    #[error("Swap failed: {0}")]
    SwapFailed(String),

    /// EIP-1559 fee parameters could not be obtained from the endpoint.
    #[error("Failed to fetch gas fee data: {0}")]
    FeeDataUnavailable(String),

    /// The operator declined the quote at the confirmation prompt.
    #[error("Aborted by operator")]
    Aborted,

    /// A signing wallet is required for this operation but none is configured.
    #[error("Wallet required: {0}")]
    WalletRequired(String),

    // Infrastructure errors (abstracted from repository layer)
    /// A generic RPC/contract-call failure from the repository layer.
    #[error("Upstream call failed: {0}")]
    UpstreamCallFailed(String),
}

impl From<RepositoryError> for ServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::RpcError(msg)
            | RepositoryError::ContractError(msg)
            | RepositoryError::TransactionError(msg)
            | RepositoryError::Other(msg) => ServiceError::UpstreamCallFailed(msg),
            RepositoryError::ParseError(msg) => ServiceError::InvalidAddress(msg),
            RepositoryError::WalletRequired(msg) => ServiceError::WalletRequired(msg),
        }
    }
}
