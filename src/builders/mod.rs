//! Builder patterns for converter construction.
//!
//! A converter is only useful once its paths are precomputed. The builder collects
//! engine kind, capacity and rate edges step by step and hands back a converter that
//! has already been initialized.
//!
//! # Error Handling
//!
//! Configuration and edges are validated in `build`, which returns `Result<T>` so
//! an out-of-range currency or an unusable capacity is reported instead of
//! producing a half-built converter.

pub mod converter;

// Re-export builders for convenience
pub use converter::ConverterBuilder;
