//! Configuration errors.

/// Errors that can occur while loading or validating configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error("Unknown converter kind '{value}': expected one of dense, sparse")]
    UnknownConverterKind { value: String },
}
