pub mod config;
pub mod error_handler;
pub mod logging;
pub mod notifications;

pub use config::BallotConfig;
pub use error_handler::{
    classify_error, BallotError, ClassifiedCategory, ClassifiedError, ErrorCategory, ErrorSeverity,
};
pub use notifications::{AppNotification, NotificationStore, NotificationType};
