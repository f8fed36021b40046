//! Rate graph data model.
//!
//! Nodes are currencies identified by a bounded integer, edges are directly quoted
//! rates backed by live rate sources. Both path engines share these types: the
//! registry that hands out rate ids, the direction-tagged hop rates, and the cells
//! of a next-hop table.

pub mod registry;
pub mod types;

// Re-export all public types for convenience
pub use registry::{fixed_rate, rate_fn, LiveRate, RateFn, RateRegistry, RateSource};
pub use types::{
    validate_currency, ConvertRate, CurrencyId, HopRate, PathCell, RateId, MAX_CAPACITY, MAX_NODES,
};
