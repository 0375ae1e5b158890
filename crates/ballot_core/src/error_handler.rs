use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Top-level application error type.
#[derive(Error, Debug)]
pub enum BallotError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Wallet error: {0}")]
    Wallet(String),

    #[error("Contract error: {0}")]
    Contract(String),

    #[error("Backend error: {0}")]
    Backend(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Classification of errors for logging and user display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCategory {
    /// Error caused by user input (bad address, empty key).
    UserError,
    /// Error raised by the chain library or a contract call.
    ChainError,
    /// Error returned by the faucet backend.
    BackendError,
    /// Network connectivity or timeout issue.
    NetworkError,
    /// Internal system error.
    SystemError,
    /// Invalid or missing configuration.
    ConfigError,
}

impl BallotError {
    /// Returns the broad error category for routing and display purposes.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Config(_) => ErrorCategory::ConfigError,
            Self::Validation(_) => ErrorCategory::UserError,
            Self::Wallet(_) => ErrorCategory::UserError,
            Self::Contract(_) => ErrorCategory::ChainError,
            Self::Backend(_) => ErrorCategory::BackendError,
            Self::Network(_) => ErrorCategory::NetworkError,
            Self::Internal(_) => ErrorCategory::SystemError,
        }
    }

    /// The wrapped message without the category prefix.
    pub fn detail(&self) -> &str {
        match self {
            Self::Config(msg)
            | Self::Validation(msg)
            | Self::Wallet(msg)
            | Self::Contract(msg)
            | Self::Backend(msg)
            | Self::Network(msg)
            | Self::Internal(msg) => msg,
        }
    }

    /// Returns a user-friendly message (hides internal details).
    pub fn user_message(&self) -> String {
        match self {
            Self::Config(msg) => format!("Configuration issue: {msg}"),
            Self::Validation(msg) => msg.clone(),
            Self::Wallet(msg) => format!("Wallet: {msg}"),
            Self::Contract(msg) => format!("Contract call failed: {msg}"),
            Self::Backend(_) => "Faucet backend error. Is the backend running?".into(),
            Self::Network(_) => "Network error. Check your connection.".into(),
            Self::Internal(_) => "An unexpected error occurred.".into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Error classification for anyhow::Error (message-pattern based)
// ---------------------------------------------------------------------------

/// Error severity levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorSeverity {
    /// Transient, retrying later is enough.
    Low,
    /// Show to user, fix input or environment.
    Medium,
    /// The chain rejected the operation.
    High,
}

/// Fine-grained error category derived from message patterns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClassifiedCategory {
    Network,
    RateLimit,
    InsufficientFunds,
    Reverted,
    KeyMaterial,
    Configuration,
    Internal,
}

/// Classified error with context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifiedError {
    pub severity: ErrorSeverity,
    pub category: ClassifiedCategory,
    pub message: String,
    pub user_message: String,
}

/// Classify an `anyhow::Error` into severity, category, and a user-friendly message
/// by inspecting the error message for known patterns.
pub fn classify_error(error: &anyhow::Error) -> ClassifiedError {
    let msg = error.to_string().to_lowercase();

    let (category, severity, user_msg) = if msg.contains("rate limit") || msg.contains("429") {
        (
            ClassifiedCategory::RateLimit,
            ErrorSeverity::Low,
            "The RPC provider is rate limiting requests. Try again shortly.",
        )
    } else if msg.contains("insufficient funds") {
        (
            ClassifiedCategory::InsufficientFunds,
            ErrorSeverity::High,
            "Not enough ether to pay for gas.",
        )
    } else if msg.contains("revert") {
        (
            ClassifiedCategory::Reverted,
            ErrorSeverity::High,
            "The contract rejected the call.",
        )
    } else if msg.contains("mnemonic") || msg.contains("private key") || msg.contains("hex") {
        (
            ClassifiedCategory::KeyMaterial,
            ErrorSeverity::Medium,
            "The mnemonic or private key could not be used.",
        )
    } else if msg.contains("timeout")
        || msg.contains("timed out")
        || msg.contains("connection")
        || msg.contains("dns")
    {
        (
            ClassifiedCategory::Network,
            ErrorSeverity::Medium,
            "Network error. Check your connection.",
        )
    } else if msg.contains("config") {
        (
            ClassifiedCategory::Configuration,
            ErrorSeverity::Medium,
            "Configuration error. Check settings.",
        )
    } else {
        (
            ClassifiedCategory::Internal,
            ErrorSeverity::Medium,
            "An unexpected error occurred.",
        )
    };

    ClassifiedError {
        severity,
        category,
        message: error.to_string(),
        user_message: user_msg.to_string(),
    }
}
