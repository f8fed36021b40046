//! Currency Path Converter Library
//!
//! Converts amounts between currencies that have no direct quote by chaining the
//! quotes that do exist. The full set of directly quoted rates is supplied once; the
//! library precomputes a fewest-hop path between every pair of currencies and then
//! answers conversions by walking that path and multiplying (or dividing by) the
//! live rate of every leg.
//!
//! # Architecture Overview
//!
//! The library is organized into several key modules:
//!
//! - **`graph`**: Currency ids, rate edges, rate sources and the rate registry
//! - **`path`**: The two path engines, the shared path evaluator and the factory
//!   that selects between them
//! - **`builders`**: Fluent construction of initialized converters
//! - **`config`**: Engine selection and capacity from environment or JSON
//! - **`quotes`**: Loading static quote files into live rate edges
//! - **`errors`**: Error types and the crate-wide `Result`
//!
//! # Core Concepts
//!
//! - **Rate edge**: `1 from = rate() to`. Every edge is usable in both directions;
//!   against the quote the rate is divided instead of multiplied
//! - **Unavailable rate**: a source returning `0.0`. Any unavailable leg makes the
//!   whole conversion return `0.0`, the same as an unreachable pair
//! - **Next-hop table**: per (source, destination) the first currency to move to;
//!   following it repeatedly reaches the destination in the fewest possible hops
//!
//! # Thread Safety
//!
//! Converters are `Send + Sync`. `init` takes `&mut self`, so it can never run
//! concurrently with `convert`; concurrent `convert` calls only read the tables and
//! invoke rate sources, which must themselves be safe to call from several threads.

pub mod builders;
pub mod config;
pub mod errors;
pub mod graph;
pub mod path;
pub mod quotes;

// Re-export the main Result type and error enum for convenience
pub use errors::{ConverterError, Result};

// Re-export the main entry points for convenience
pub use builders::ConverterBuilder;
pub use config::ConverterConfig;
pub use graph::{fixed_rate, rate_fn, ConvertRate, CurrencyId, LiveRate, RateFn, MAX_NODES};
pub use path::{ConversionPath, Converter, ConverterFactory, ConverterKind};
pub use quotes::{load_quotes, load_quotes_from_path, QuoteBook};

// Module-specific result types for better ergonomics
pub type GraphResult<T> = std::result::Result<T, errors::GraphError>;
pub type ConfigResult<T> = std::result::Result<T, errors::ConfigError>;
