//! Error handling for the currency path converter.
//!
//! Conversion itself reports almost nothing as an error: an unreachable pair or an
//! unavailable rate leg both yield a `0.0` result. What remains are precondition
//! violations (identifiers outside the table), configuration mistakes and failures
//! while reading quote files.
//!
//! # Error Hierarchy
//!
//! - **`GraphError`**: Invalid identifiers and capacities, registry overflow
//! - **`ConfigError`**: Invalid or unknown configuration values
//! - **`QuoteError`**: Malformed static quote files
//!
//! `ConverterError` wraps all of them together with the external errors raised by
//! I/O, CSV parsing and JSON handling, so callers can use a single `Result<T>` and
//! propagate with `?`.

pub mod config;
pub mod graph;
pub mod quote;

// Re-export all error types for convenience
pub use config::ConfigError;
pub use graph::GraphError;
pub use quote::QuoteError;

/// Main result type for the library
pub type Result<T> = std::result::Result<T, ConverterError>;

/// Top-level error enum that encompasses all possible errors in the library.
#[derive(Debug, thiserror::Error)]
pub enum ConverterError {
    /// Error in path table construction or lookup.
    ///
    /// Raised for currency identifiers outside the configured capacity and for
    /// structural limits of the rate registry.
    #[error("Graph operation failed: {0}")]
    Graph(#[from] GraphError),

    /// Error while loading or validating configuration.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Error in the content of a static quote file.
    #[error("Quote error: {0}")]
    Quote(#[from] QuoteError),

    /// Filesystem error while reading quote files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV parsing error while reading quote files.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization or deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Generic error for cases not covered by specific error types.
    #[error("Generic error: {0}")]
    Other(#[from] anyhow::Error),
}

impl ConverterError {
    /// Whether this error reports a currency identifier outside the table.
    pub fn is_invalid_currency(&self) -> bool {
        matches!(self, ConverterError::Graph(GraphError::InvalidCurrencyId { .. }))
    }
}
