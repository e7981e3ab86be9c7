//! Error types for countmark-core

use thiserror::Error;

/// Result type alias for market operations
pub type Result<T> = std::result::Result<T, MarketError>;

/// Error types for market operations
///
/// Every failure is a synchronous rejection of the triggering call; no
/// partial mutation survives a failed precondition check.
#[derive(Error, Debug)]
pub enum MarketError {
    /// Malformed creation or bet parameters
    #[error("Invalid parameters: {0}")]
    Validation(String),

    /// Unknown market or bet ID
    #[error("Not found: {0}")]
    NotFound(String),

    /// Operation invalid for the current phase
    #[error("Invalid state: {0}")]
    State(String),

    /// Deadline not yet reached, or already passed
    #[error("Bad timing: {0}")]
    Timing(String),

    /// Caller lacks the required role
    #[error("Unauthorized: {0}")]
    Authorization(String),

    /// Bundled transfer does not match the declared bet
    #[error("Payment mismatch: {0}")]
    PaymentMismatch(String),

    /// Bet has already been settled
    #[error("Bet {0} already settled")]
    AlreadySettled(u64),

    /// No accumulated fees to withdraw
    #[error("Nothing to withdraw for market {0}")]
    NothingToWithdraw(u64),

    /// Snapshot (de)serialization errors
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// Outbound transfer failures reported by the host
    #[error("Transfer error: {0}")]
    Transfer(String),
}

impl From<&str> for MarketError {
    fn from(msg: &str) -> Self {
        Self::Validation(msg.to_string())
    }
}
