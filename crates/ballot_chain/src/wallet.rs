use std::fmt;
use std::str::FromStr;

use ethers::signers::coins_bip39::English;
use ethers::signers::{LocalWallet, MnemonicBuilder, Signer};
use ethers::types::Address;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ChainError;
use crate::network::Network;

/// Which kind of key material the user pasted into the import form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyKind {
    Mnemonic,
    Private,
}

impl KeyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            KeyKind::Mnemonic => "mnemonic",
            KeyKind::Private => "private",
        }
    }
}

impl fmt::Display for KeyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for KeyKind {
    type Err = ChainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mnemonic" | "phrase" | "seed" => Ok(KeyKind::Mnemonic),
            "private" | "private-key" | "key" => Ok(KeyKind::Private),
            other => Err(ChainError::Wallet(format!("unknown key type: {other}"))),
        }
    }
}

/// A signing wallet held in memory for the current session only.
///
/// Replaced wholesale on every import or creation; never written to disk.
#[derive(Debug, Clone)]
pub struct SessionWallet {
    inner: LocalWallet,
    network: Option<Network>,
}

impl SessionWallet {
    /// Derive the first account (`m/44'/60'/0'/0/0`) of a BIP-39 phrase.
    pub fn from_mnemonic(phrase: &str) -> Result<Self, ChainError> {
        let phrase = phrase.split_whitespace().collect::<Vec<_>>().join(" ");
        let inner = MnemonicBuilder::<English>::default()
            .phrase(phrase.as_str())
            .build()
            .map_err(|e| ChainError::Wallet(e.to_string()))?;
        debug!(address = ?inner.address(), "wallet derived from mnemonic");
        Ok(Self::wrap(inner))
    }

    /// Load a raw secp256k1 private key, hex encoded with or without `0x`.
    pub fn from_private_key(key: &str) -> Result<Self, ChainError> {
        let inner = key
            .trim()
            .parse::<LocalWallet>()
            .map_err(|e| ChainError::Wallet(e.to_string()))?;
        debug!(address = ?inner.address(), "wallet loaded from private key");
        Ok(Self::wrap(inner))
    }

    /// Import key material of the given kind.
    pub fn import(kind: KeyKind, material: &str) -> Result<Self, ChainError> {
        match kind {
            KeyKind::Mnemonic => Self::from_mnemonic(material),
            KeyKind::Private => Self::from_private_key(material),
        }
    }

    /// Generate a fresh random wallet.
    pub fn random() -> Self {
        let inner = LocalWallet::new(&mut ethers::core::rand::thread_rng());
        debug!(address = ?inner.address(), "random wallet generated");
        Self::wrap(inner)
    }

    fn wrap(inner: LocalWallet) -> Self {
        Self {
            inner,
            network: None,
        }
    }

    /// Bind the wallet to a network so signatures carry its chain ID.
    pub fn connect(mut self, network: Network) -> Self {
        self.inner = self.inner.with_chain_id(network.chain_id());
        self.network = Some(network);
        self
    }

    pub fn address(&self) -> Address {
        self.inner.address()
    }

    pub fn network(&self) -> Option<Network> {
        self.network
    }

    pub fn chain_id(&self) -> u64 {
        self.inner.chain_id()
    }

    pub fn signer(&self) -> &LocalWallet {
        &self.inner
    }

    /// Hex-encoded private key, `0x` prefixed. Only shown once after creation.
    pub fn private_key_hex(&self) -> String {
        format!("0x{}", hex::encode(self.inner.signer().to_bytes()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Well-known development account #0 (Hardhat / Anvil).
    const DEV_MNEMONIC: &str = "test test test test test test test test test test test junk";
    const DEV_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
    const DEV_ADDRESS: &str = "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266";

    #[test]
    fn mnemonic_derives_first_account() {
        let wallet = SessionWallet::from_mnemonic(DEV_MNEMONIC).unwrap();
        assert_eq!(format!("{:?}", wallet.address()), DEV_ADDRESS);
    }

    #[test]
    fn mnemonic_tolerates_extra_whitespace() {
        let messy = "  test test test test test test\ttest test test test test   junk\n";
        let wallet = SessionWallet::from_mnemonic(messy).unwrap();
        assert_eq!(format!("{:?}", wallet.address()), DEV_ADDRESS);
    }

    #[test]
    fn private_key_with_and_without_prefix() {
        let a = SessionWallet::from_private_key(DEV_KEY).unwrap();
        let b = SessionWallet::from_private_key(DEV_KEY.trim_start_matches("0x")).unwrap();
        assert_eq!(a.address(), b.address());
        assert_eq!(format!("{:?}", a.address()), DEV_ADDRESS);
    }

    #[test]
    fn private_key_hex_round_trips() {
        let wallet = SessionWallet::from_private_key(DEV_KEY).unwrap();
        assert_eq!(wallet.private_key_hex(), DEV_KEY);
    }

    #[test]
    fn bad_key_material_is_an_error() {
        assert!(SessionWallet::from_private_key("0x1234").is_err());
        assert!(SessionWallet::from_private_key("not hex at all").is_err());
        assert!(SessionWallet::from_mnemonic("hello world").is_err());
    }

    #[test]
    fn import_dispatches_on_kind() {
        let from_phrase = SessionWallet::import(KeyKind::Mnemonic, DEV_MNEMONIC).unwrap();
        let from_key = SessionWallet::import(KeyKind::Private, DEV_KEY).unwrap();
        assert_eq!(from_phrase.address(), from_key.address());
    }

    #[test]
    fn random_wallets_differ() {
        let a = SessionWallet::random();
        let b = SessionWallet::random();
        assert_ne!(a.address(), b.address());
        assert!(a.network().is_none());
    }

    #[test]
    fn connect_sets_chain_id() {
        let wallet = SessionWallet::random().connect(Network::Sepolia);
        assert_eq!(wallet.chain_id(), 11_155_111);
        assert_eq!(wallet.network(), Some(Network::Sepolia));
    }

    #[test]
    fn key_kind_parsing() {
        assert_eq!("mnemonic".parse::<KeyKind>().unwrap(), KeyKind::Mnemonic);
        assert_eq!("PRIVATE".parse::<KeyKind>().unwrap(), KeyKind::Private);
        assert!("keystore".parse::<KeyKind>().is_err());
        assert_eq!(KeyKind::Private.to_string(), "private");
    }
}
