//! Static quote loading errors.

/// Errors that can occur while reading quote files
#[derive(Debug, thiserror::Error)]
pub enum QuoteError {
    #[error("Invalid quote on line {line}: {reason}")]
    InvalidQuote { line: u64, reason: String },

    #[error("Quote file contains no rates")]
    EmptyQuoteBook,
}
