use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::ChainError;
use crate::network::Network;

/// Configuration for a single RPC endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcConfig {
    pub network: Network,
    pub url: String,
    pub is_custom: bool,
    pub timeout_secs: u64,
    pub poll_interval_ms: u64,
}

const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_POLL_INTERVAL_MS: u64 = 2_000;
const LOCAL_POLL_INTERVAL_MS: u64 = 250;

impl RpcConfig {
    fn default_for(network: Network) -> Self {
        Self {
            network,
            url: network.default_rpc_url().to_string(),
            is_custom: false,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            poll_interval_ms: match network {
                Network::Localhost => LOCAL_POLL_INTERVAL_MS,
                _ => DEFAULT_POLL_INTERVAL_MS,
            },
        }
    }
}

/// Manages per-network RPC endpoint configuration with custom override support.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcConfigStore {
    configs: HashMap<Network, RpcConfig>,
}

impl RpcConfigStore {
    /// Create a store populated with each network's public endpoint.
    pub fn with_defaults() -> Self {
        let configs = Network::ALL
            .into_iter()
            .map(|network| (network, RpcConfig::default_for(network)))
            .collect();

        Self { configs }
    }

    /// Get the RPC configuration for a network.
    pub fn get_rpc(&self, network: Network) -> Option<&RpcConfig> {
        self.configs.get(&network)
    }

    /// Override the RPC URL for a network with a custom endpoint.
    pub fn set_custom_rpc(&mut self, network: Network, url: String) -> Result<(), ChainError> {
        if !validate_url(&url) {
            return Err(ChainError::InvalidRpcUrl(url));
        }

        let entry = self
            .configs
            .entry(network)
            .or_insert_with(|| RpcConfig::default_for(network));
        entry.url = url;
        entry.is_custom = true;
        Ok(())
    }

    /// Set the request timeout for every network.
    pub fn set_timeout_secs(&mut self, timeout_secs: u64) {
        for config in self.configs.values_mut() {
            config.timeout_secs = timeout_secs;
        }
    }

    /// Resolve the endpoint to use for `network`, applying an optional custom URL.
    pub fn resolve(
        mut self,
        network: Network,
        custom_url: Option<&str>,
    ) -> Result<RpcConfig, ChainError> {
        if let Some(url) = custom_url.filter(|u| !u.trim().is_empty()) {
            self.set_custom_rpc(network, url.trim().to_string())?;
        }
        let rpc = self
            .get_rpc(network)
            .cloned()
            .unwrap_or_else(|| RpcConfig::default_for(network));
        Ok(rpc)
    }
}

impl Default for RpcConfigStore {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Validate that a URL is well-formed and uses HTTP or HTTPS.
pub fn validate_url(url: &str) -> bool {
    match url::Url::parse(url) {
        Ok(parsed) => {
            let scheme = parsed.scheme();
            (scheme == "http" || scheme == "https") && parsed.host().is_some()
        }
        Err(_) => false,
    }
}
