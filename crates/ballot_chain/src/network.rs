use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ChainError;

/// EVM networks the dashboard can connect to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    Mainnet,
    Goerli,
    Sepolia,
    Localhost,
}

impl Network {
    pub const ALL: [Network; 4] = [
        Network::Mainnet,
        Network::Goerli,
        Network::Sepolia,
        Network::Localhost,
    ];

    /// Human-readable label for the network.
    pub fn label(&self) -> &'static str {
        match self {
            Network::Mainnet => "Ethereum Mainnet",
            Network::Goerli => "Goerli Testnet",
            Network::Sepolia => "Sepolia Testnet",
            Network::Localhost => "Local Node",
        }
    }

    /// Short lowercase name, as used in config files.
    pub fn name(&self) -> &'static str {
        match self {
            Network::Mainnet => "mainnet",
            Network::Goerli => "goerli",
            Network::Sepolia => "sepolia",
            Network::Localhost => "localhost",
        }
    }

    /// EIP-155 chain ID used when signing.
    pub fn chain_id(&self) -> u64 {
        match self {
            Network::Mainnet => 1,
            Network::Goerli => 5,
            Network::Sepolia => 11_155_111,
            Network::Localhost => 31_337,
        }
    }

    /// Public JSON-RPC endpoint used when no custom URL is configured.
    pub fn default_rpc_url(&self) -> &'static str {
        match self {
            Network::Mainnet => "https://eth.llamarpc.com",
            Network::Goerli => "https://rpc.ankr.com/eth_goerli",
            Network::Sepolia => "https://rpc.sepolia.org",
            Network::Localhost => "http://127.0.0.1:8545",
        }
    }

    pub fn is_testnet(&self) -> bool {
        !matches!(self, Network::Mainnet)
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Network {
    type Err = ChainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mainnet" | "homestead" | "ethereum" => Ok(Network::Mainnet),
            "goerli" => Ok(Network::Goerli),
            "sepolia" => Ok(Network::Sepolia),
            "localhost" | "local" | "hardhat" | "anvil" => Ok(Network::Localhost),
            other => Err(ChainError::UnknownNetwork(other.to_string())),
        }
    }
}
