use std::time::Duration;

use async_trait::async_trait;
use ballot_core::BallotError;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::types::{AddressRequest, ApiResponse, ClaimResponse};

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Errors returned by the faucet backend client.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("invalid backend URL: {0}")]
    InvalidUrl(String),

    #[error("request to {endpoint} failed: {reason}")]
    Http { endpoint: String, reason: String },

    #[error("{endpoint} returned HTTP {status}: {body}")]
    Status {
        endpoint: String,
        status: u16,
        body: String,
    },

    #[error("could not decode {endpoint} response: {reason}")]
    Decode { endpoint: String, reason: String },
}

impl From<BackendError> for BallotError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::InvalidUrl(_) => Self::Config(err.to_string()),
            _ => Self::Backend(err.to_string()),
        }
    }
}

// ---------------------------------------------------------------------------
// Trait
// ---------------------------------------------------------------------------

/// The three endpoints of the faucet backend.
#[async_trait]
pub trait BackendApi: Send + Sync {
    /// `GET /token-address`: address of the faucet's voting token, if deployed.
    async fn token_address(&self) -> Result<Option<String>, BackendError>;

    /// `POST /claim-tokens`: ask the backend to send tokens to `address`.
    async fn claim_tokens(&self, address: &str) -> Result<ClaimResponse, BackendError>;

    /// `POST /connect-ballot-contract`: record that the user opened `address`.
    async fn connect_ballot_contract(
        &self,
        address: &str,
    ) -> Result<serde_json::Value, BackendError>;
}

// ---------------------------------------------------------------------------
// reqwest implementation
// ---------------------------------------------------------------------------

pub const TOKEN_ADDRESS_PATH: &str = "/token-address";
pub const CLAIM_TOKENS_PATH: &str = "/claim-tokens";
pub const CONNECT_BALLOT_PATH: &str = "/connect-ballot-contract";

/// JSON-over-HTTP backend client.
pub struct HttpBackend {
    base_url: String,
    client: reqwest::Client,
}

impl HttpBackend {
    /// Create a client for the backend at `base_url` (e.g. `http://localhost:3000`).
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, BackendError> {
        let parsed =
            url::Url::parse(base_url).map_err(|e| BackendError::InvalidUrl(format!("{base_url}: {e}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(BackendError::InvalidUrl(base_url.to_string()));
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| BackendError::Http {
                endpoint: base_url.to_string(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Check the status and decode the JSON body.
    async fn decode<T: DeserializeOwned>(
        endpoint: &str,
        response: reqwest::Response,
    ) -> Result<T, BackendError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(endpoint, status = status.as_u16(), "backend returned an error status");
            return Err(BackendError::Status {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
                body,
            });
        }
        response.json::<T>().await.map_err(|e| BackendError::Decode {
            endpoint: endpoint.to_string(),
            reason: e.to_string(),
        })
    }

    async fn post_address<T: DeserializeOwned>(
        &self,
        path: &str,
        address: &str,
    ) -> Result<T, BackendError> {
        let endpoint = self.endpoint(path);
        debug!(endpoint = %endpoint, address, "POST");
        let response = self
            .client
            .post(&endpoint)
            .json(&AddressRequest {
                address: address.to_string(),
            })
            .send()
            .await
            .map_err(|e| BackendError::Http {
                endpoint: endpoint.clone(),
                reason: e.to_string(),
            })?;
        Self::decode(&endpoint, response).await
    }
}

#[async_trait]
impl BackendApi for HttpBackend {
    async fn token_address(&self) -> Result<Option<String>, BackendError> {
        let endpoint = self.endpoint(TOKEN_ADDRESS_PATH);
        debug!(endpoint = %endpoint, "GET");
        let response = self
            .client
            .get(&endpoint)
            .send()
            .await
            .map_err(|e| BackendError::Http {
                endpoint: endpoint.clone(),
                reason: e.to_string(),
            })?;
        let body: ApiResponse<String> = Self::decode(&endpoint, response).await?;
        Ok(body.result.filter(|a| !a.is_empty()))
    }

    async fn claim_tokens(&self, address: &str) -> Result<ClaimResponse, BackendError> {
        let raw: serde_json::Value = self.post_address(CLAIM_TOKENS_PATH, address).await?;
        Ok(ClaimResponse { raw })
    }

    async fn connect_ballot_contract(
        &self,
        address: &str,
    ) -> Result<serde_json::Value, BackendError> {
        self.post_address(CONNECT_BALLOT_PATH, address).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_trims_trailing_slash() {
        let backend = HttpBackend::new("http://localhost:3000/", Duration::from_secs(1)).unwrap();
        assert_eq!(backend.base_url(), "http://localhost:3000");
        assert_eq!(
            backend.endpoint(CLAIM_TOKENS_PATH),
            "http://localhost:3000/claim-tokens"
        );
    }

    #[test]
    fn new_rejects_non_http() {
        assert!(HttpBackend::new("ftp://localhost", Duration::from_secs(1)).is_err());
        assert!(HttpBackend::new("localhost:3000", Duration::from_secs(1)).is_err());
        assert!(HttpBackend::new("", Duration::from_secs(1)).is_err());
    }

    #[test]
    fn backend_errors_map_to_ballot_categories() {
        use ballot_core::ErrorCategory;

        let status: BallotError = BackendError::Status {
            endpoint: "/claim-tokens".into(),
            status: 500,
            body: "boom".into(),
        }
        .into();
        assert_eq!(status.category(), ErrorCategory::BackendError);
        assert_eq!(status.detail(), "/claim-tokens returned HTTP 500: boom");

        let url: BallotError = BackendError::InvalidUrl("ftp://x".into()).into();
        assert_eq!(url.category(), ErrorCategory::ConfigError);
    }
}
