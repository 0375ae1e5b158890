use ballot_core::BallotError;

/// Errors raised by the wallet/contract layer.
///
/// `Wallet` and `Contract` carry the library's own message so the UI can show
/// it verbatim.
#[derive(Debug, thiserror::Error)]
pub enum ChainError {
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("{0}")]
    Wallet(String),

    #[error("ABI error: {0}")]
    Abi(String),

    #[error("provider error: {0}")]
    Provider(String),

    #[error("contract call `{method}` failed: {reason}")]
    Contract { method: String, reason: String },

    #[error("no signer: connect a wallet before calling `{0}`")]
    NoSigner(String),

    #[error("invalid RPC URL: {0}")]
    InvalidRpcUrl(String),

    #[error("unknown network: {0}")]
    UnknownNetwork(String),

    #[error("invalid number: {0:?}")]
    InvalidNumber(String),
}

impl ChainError {
    pub(crate) fn contract(method: &str, reason: impl std::fmt::Display) -> Self {
        Self::Contract {
            method: method.to_string(),
            reason: reason.to_string(),
        }
    }
}

impl From<ChainError> for BallotError {
    fn from(err: ChainError) -> Self {
        let msg = err.to_string();
        match err {
            ChainError::InvalidAddress(_) | ChainError::InvalidNumber(_) => Self::Validation(msg),
            ChainError::Wallet(_) | ChainError::NoSigner(_) => Self::Wallet(msg),
            ChainError::Abi(_) | ChainError::Contract { .. } => Self::Contract(msg),
            ChainError::Provider(_) => Self::Network(msg),
            ChainError::InvalidRpcUrl(_) | ChainError::UnknownNetwork(_) => Self::Config(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ballot_core::ErrorCategory;

    #[test]
    fn converts_into_ballot_error_with_message_intact() {
        let err: BallotError = ChainError::Abi("ballot ABI missing `vote`".into()).into();
        assert_eq!(err.category(), ErrorCategory::ChainError);
        assert_eq!(err.detail(), "ABI error: ballot ABI missing `vote`");
    }

    #[test]
    fn categories_follow_the_failing_layer() {
        let cases = [
            (ChainError::InvalidAddress("0x1".into()), ErrorCategory::UserError),
            (ChainError::NoSigner("vote".into()), ErrorCategory::UserError),
            (ChainError::contract("vote", "execution reverted"), ErrorCategory::ChainError),
            (ChainError::Provider("timed out".into()), ErrorCategory::NetworkError),
            (ChainError::InvalidRpcUrl("ftp://x".into()), ErrorCategory::ConfigError),
        ];
        for (err, category) in cases {
            assert_eq!(BallotError::from(err).category(), category);
        }
    }
}
