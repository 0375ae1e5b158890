//! Unit formatting helpers for display fields.

use ethers::types::{H256, U256};
use ethers::utils::{format_ether, parse_bytes32_string};

use crate::error::ChainError;

/// Convert an 18-decimal amount to a float for display.
pub fn ether_to_f64(value: U256) -> f64 {
    format_ether(value).parse::<f64>().unwrap_or(f64::NAN)
}

/// Decode a NUL-padded `bytes32` into a UTF-8 string.
pub fn bytes32_to_string(value: H256) -> Result<String, ChainError> {
    parse_bytes32_string(value.as_fixed_bytes())
        .map(str::to_owned)
        .map_err(|e| ChainError::Abi(format!("bytes32 is not a string: {e}")))
}

/// Parse a user-supplied integer (vote id, amount) into a `U256`. Decimal,
/// or hex with a `0x` prefix.
pub fn parse_uint(input: &str) -> Result<U256, ChainError> {
    let trimmed = input.trim();
    let parsed = match trimmed.strip_prefix("0x").or_else(|| trimmed.strip_prefix("0X")) {
        Some("") => None,
        Some(digits) => U256::from_str_radix(digits, 16).ok(),
        None if trimmed.is_empty() => None,
        None => U256::from_dec_str(trimmed).ok(),
    };
    parsed.ok_or_else(|| ChainError::InvalidNumber(input.to_string()))
}
