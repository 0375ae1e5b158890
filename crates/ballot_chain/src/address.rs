use ethers::types::Address;
use ethers::utils::to_checksum;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::ChainError;

static ADDRESS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^0x[a-fA-F0-9]{40}$").expect("address regex"));

/// `0x` followed by exactly 40 hex digits. Checksum casing is not verified.
pub fn is_valid_address(input: &str) -> bool {
    ADDRESS_RE.is_match(input)
}

/// Validate and parse an address typed by the user.
pub fn parse_address(input: &str) -> Result<Address, ChainError> {
    if !is_valid_address(input) {
        return Err(ChainError::InvalidAddress(input.to_string()));
    }
    input
        .parse::<Address>()
        .map_err(|e| ChainError::InvalidAddress(format!("{input}: {e}")))
}

/// EIP-55 mixed-case form, used wherever an address leaves the process or is
/// shown to the user.
pub fn checksum(address: Address) -> String {
    to_checksum(&address, None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_mixed_case_hex() {
        assert!(is_valid_address("0xABCDEF0123456789ABCDEF0123456789ABCDEF01"));
        assert!(is_valid_address("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266"));
        assert!(is_valid_address("0x0000000000000000000000000000000000000000"));
    }

    #[test]
    fn rejects_wrong_shapes() {
        for bad in [
            "",
            "0x",
            "0x123",
            "ABCDEF0123456789ABCDEF0123456789ABCDEF0123",
            "0XABCDEF0123456789ABCDEF0123456789ABCDEF01",
            "0xABCDEF0123456789ABCDEF0123456789ABCDEF0",
            "0xABCDEF0123456789ABCDEF0123456789ABCDEF012",
            "0xGBCDEF0123456789ABCDEF0123456789ABCDEF01",
            " 0xABCDEF0123456789ABCDEF0123456789ABCDEF01",
            "0xABCDEF0123456789ABCDEF0123456789ABCDEF01\n",
        ] {
            assert!(!is_valid_address(bad), "accepted {bad:?}");
        }
    }

    #[test]
    fn parse_address_round_trips() {
        let addr = parse_address("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266").unwrap();
        assert_eq!(
            format!("{addr:?}"),
            "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266"
        );
    }

    #[test]
    fn checksum_restores_mixed_case() {
        let addr = parse_address("0xe7f1725e7734ce288f8367e1bb143e90bb3f0512").unwrap();
        assert_eq!(checksum(addr), "0xe7f1725E7734CE288F8367e1Bb143E90bb3F0512");
    }

    #[test]
    fn parse_address_rejects_short_input() {
        let err = parse_address("0x123").unwrap_err();
        assert!(matches!(err, ChainError::InvalidAddress(_)));
    }
}
