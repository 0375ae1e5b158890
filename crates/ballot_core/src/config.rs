use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable overriding [`BallotConfig::network`].
pub const ENV_NETWORK: &str = "BALLOT_NETWORK";
/// Environment variable overriding [`BallotConfig::rpc_url`].
pub const ENV_RPC_URL: &str = "BALLOT_RPC_URL";
/// Environment variable overriding [`BallotConfig::backend_url`].
pub const ENV_BACKEND_URL: &str = "BALLOT_BACKEND_URL";

// ---------------------------------------------------------------------------
// BallotConfig
// ---------------------------------------------------------------------------

/// Application configuration stored at `~/.ballot/config.json`.
///
/// Key material is never part of the configuration; wallets only live in
/// memory for the duration of a session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BallotConfig {
    // Chain
    pub network: String,
    pub rpc_url: Option<String>,

    // Faucet backend
    pub backend_url: String,
    pub request_timeout_secs: u64,

    // Contract artifacts (Hardhat/Truffle JSON with an `abi` field)
    pub token_abi_path: Option<PathBuf>,
    pub ballot_abi_path: Option<PathBuf>,
    pub max_proposals: usize,

    // General
    pub log_level: String,
}

impl Default for BallotConfig {
    fn default() -> Self {
        Self {
            network: "sepolia".into(),
            rpc_url: None,
            backend_url: "http://localhost:3000".into(),
            request_timeout_secs: 30,
            token_abi_path: None,
            ballot_abi_path: None,
            max_proposals: 16,
            log_level: "info".into(),
        }
    }
}

impl BallotConfig {
    /// Returns the base config directory: `~/.ballot/`
    pub fn base_dir() -> Result<PathBuf> {
        let home = dirs::home_dir().context("Could not determine home directory")?;
        Ok(home.join(".ballot"))
    }

    /// Returns the config file path: `~/.ballot/config.json`
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::base_dir()?.join("config.json"))
    }

    /// Returns the logs directory: `~/.ballot/logs/`
    pub fn logs_dir() -> Result<PathBuf> {
        Ok(Self::base_dir()?.join("logs"))
    }

    /// Ensures all required directories exist.
    pub fn ensure_dirs() -> Result<()> {
        for dir in [Self::base_dir()?, Self::logs_dir()?] {
            if !dir.exists() {
                std::fs::create_dir_all(&dir)
                    .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
            }
        }
        Ok(())
    }

    /// Loads config from disk, or creates the default file if missing.
    pub fn load() -> Result<Self> {
        Self::ensure_dirs()?;
        let path = Self::config_path()?;
        Self::load_from_path(&path)
    }

    /// Load config from a specific file path.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config: {}", path.display()))?;
            let config: Self =
                serde_json::from_str(&content).with_context(|| "Failed to parse config.json")?;
            info!("Loaded config from {}", path.display());
            Ok(config)
        } else {
            let config = Self::default();
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create directory: {}", parent.display())
                })?;
            }
            config.save_to_path(path)?;
            info!("Created default config at {}", path.display());
            Ok(config)
        }
    }

    /// Save config to a specific file path.
    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config: {}", path.display()))?;
        Ok(())
    }

    /// Apply `BALLOT_*` environment variable overrides.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|name| std::env::var(name).ok());
    }

    /// Apply overrides from an arbitrary variable lookup. Empty values are ignored.
    pub fn apply_overrides_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(network) = get(ENV_NETWORK) {
            info!(network = %network, "network overridden from environment");
            self.network = network;
        }
        if let Some(rpc_url) = get(ENV_RPC_URL) {
            self.rpc_url = Some(rpc_url);
        }
        if let Some(backend_url) = get(ENV_BACKEND_URL) {
            self.backend_url = backend_url;
        }
    }

    /// Sanity-check values that would otherwise fail deep inside a request.
    pub fn validate(&self) -> Result<()> {
        if self.backend_url.trim().is_empty() {
            anyhow::bail!("config: backend_url must not be empty");
        }
        if self.request_timeout_secs == 0 {
            anyhow::bail!("config: request_timeout_secs must be greater than zero");
        }
        if self.max_proposals == 0 {
            warn!("config: max_proposals is 0, proposal listing is disabled");
        }
        Ok(())
    }
}
