use thiserror::Error;

/// Unified error type for the swap quote library.
#[derive(Debug, Error)]
pub enum Error {
    #[error("amount error: {0}")]
    Amount(#[from] AmountError),

    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("submit error: {0}")]
    Submit(#[from] SubmitError),

    #[error("config error: {0}")]
    Config(String),
}

/// Errors while parsing a decimal amount or price.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmountError {
    #[error("amount is empty")]
    Empty,

    #[error("invalid decimal: {0:?}")]
    Invalid(String),

    #[error("price must be finite and non-negative, got {0}")]
    InvalidPrice(String),
}

/// Pre-submission checks layered on top of the quote calculator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Amount is required")]
    AmountRequired,

    #[error("Amount must be greater than 0")]
    NotPositive,

    #[error("Minimum amount is {minimum} {symbol}")]
    BelowMinimum { minimum: String, symbol: String },

    #[error("Insufficient balance")]
    InsufficientBalance { symbol: String },

    #[error("No quote available for this pair")]
    QuoteUnavailable,

    #[error("Cannot swap {token_in} for {token_out}: tokens are on different chains")]
    ChainMismatch { token_in: String, token_out: String },

    #[error("Cannot swap a token for itself")]
    SameToken,

    #[error("Slippage cannot be negative")]
    NegativeSlippage,

    #[error("Maximum slippage is {max}%")]
    SlippageTooHigh { max: String },

    #[error("invalid slippage: {0:?}")]
    InvalidSlippage(String),
}

/// Failure reported by a transaction submitter. The message is shown to the
/// user verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct SubmitError(pub String);

impl SubmitError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}
