//! Etherscan contract-ABI retrieval.
//!
//! API: https://api.etherscan.io/v2/api?chainid=1&module=contract&action=getabi

use std::path::{Path, PathBuf};
use std::time::Duration;

use alloy::primitives::Address;
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, instrument};

/// Etherscan API base URL (v2 supports multiple chains)
const ETHERSCAN_API_URL: &str = "https://api.etherscan.io/v2/api";

/// Timeout for API calls
const API_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Error)]
pub enum EtherscanError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Etherscan replied with status != "1": bad key, unverified contract,
    /// rate limiting. The message field carries the reason.
    #[error("Etherscan API error: {0}")]
    Api(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid ABI payload: {0}")]
    InvalidAbi(#[from] serde_json::Error),
}

#[derive(Debug, Deserialize)]
struct AbiResponse {
    status: String,
    message: String,
    result: Option<String>,
}

/// Thin client for the Etherscan contract API.
pub struct EtherscanClient {
    client: Client,
    api_key: String,
    chain_id: u64,
}

impl EtherscanClient {
    pub fn new(api_key: impl Into<String>, chain_id: u64) -> Result<Self, EtherscanError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(API_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            chain_id,
        })
    }

    /// Fetch the verified ABI of a contract as a JSON string.
    #[instrument(skip(self), err)]
    pub async fn get_abi(&self, contract: Address) -> Result<String, EtherscanError> {
        let response: AbiResponse = self
            .client
            .get(ETHERSCAN_API_URL)
            .query(&[
                ("chainid", self.chain_id.to_string()),
                ("module", "contract".to_string()),
                ("action", "getabi".to_string()),
                ("address", contract.to_string()),
                ("apikey", self.api_key.clone()),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if response.status != "1" {
            return Err(EtherscanError::Api(format!(
                "{}: {}",
                response.message,
                response.result.unwrap_or_default()
            )));
        }

        response
            .result
            .ok_or_else(|| EtherscanError::Api("empty result for status 1 response".to_string()))
    }

    /// Fetch a contract's ABI and write it, pretty-printed, to
    /// `abis/<name>.json`. Returns the path written.
    #[instrument(skip(self), err)]
    pub async fn write_abi(
        &self,
        contract: Address,
        name: &str,
        out_dir: impl AsRef<Path> + std::fmt::Debug,
    ) -> Result<PathBuf, EtherscanError> {
        let abi = self.get_abi(contract).await?;

        // Round-trip through serde_json to validate and pretty-print.
        let parsed: serde_json::Value = serde_json::from_str(&abi)?;
        let pretty = serde_json::to_string_pretty(&parsed)?;

        let out_dir = out_dir.as_ref();
        std::fs::create_dir_all(out_dir)?;
        let path = out_dir.join(format!("{name}.json"));
        std::fs::write(&path, pretty)?;
        debug!(path = %path.display(), "wrote contract ABI");

        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_response_is_rejected() {
        let body = r#"{"status":"0","message":"NOTOK","result":"Invalid API Key"}"#;
        let response: AbiResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.status, "0");
        assert_eq!(response.message, "NOTOK");
    }

    #[test]
    fn abi_response_parses_success_shape() {
        let body = r#"{"status":"1","message":"OK","result":"[{\"type\":\"function\"}]"}"#;
        let response: AbiResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.status, "1");
        assert!(response.result.unwrap().contains("function"));
    }
}
