//! Wallet and contract glue over `ethers`: key derivation, provider
//! connection, contract bindings and unit formatting.

pub mod abi;
pub mod address;
pub mod client;
pub mod contracts;
pub mod error;
pub mod format;
pub mod network;
pub mod rpc_config;
pub mod wallet;

// Re-export primary types for convenient access.
pub use abi::{ContractArtifact, BALLOT_ARTIFACT, TOKEN_ARTIFACT};
pub use address::{checksum, is_valid_address, parse_address};
pub use client::{ChainClient, EthersChainClient};
pub use contracts::{BallotBinding, Proposal, TokenBinding};
pub use error::ChainError;
pub use network::Network;
pub use rpc_config::{RpcConfig, RpcConfigStore, validate_url};
pub use wallet::{KeyKind, SessionWallet};

pub use ethers::types::{Address, TxHash, U256};
