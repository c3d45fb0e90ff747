use thiserror::Error;

use super::money::Money;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Insufficient tender: total is {total}, tendered {tendered}")]
    InsufficientTender { total: Money, tendered: Money },
    #[error("Cart is empty")]
    EmptyCart,
    #[error("A submission is already in flight")]
    SubmissionInFlight,
    #[error(transparent)]
    Submission(#[from] SubmissionError),
}

/// Failure reported by the transaction submission service, normalized so
/// that no transport detail reaches the cart logic.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmissionError {
    #[error("Transaction rejected ({status}): {message}")]
    Rejected { status: u16, message: String },
    #[error("Transaction service unreachable: {0}")]
    Transport(String),
}
