//! Client for the faucet backend: token address lookup, token claims and
//! ballot-connection bookkeeping.

pub mod client;
pub mod types;

pub use client::{BackendApi, BackendError, HttpBackend};
pub use types::{AddressRequest, ApiResponse, ClaimResponse};
