//! Core types and data structures for the rate graph.
//!
//! This module contains the fundamental types shared by both path engines:
//! - Currency identifiers and the default table capacity
//! - Rate edges as supplied by the caller
//! - Direction-tagged rate references
//! - Next-hop table cells

use super::registry::RateFn;
use crate::errors::GraphError;
use serde::Serialize;
use std::fmt;

/// Type alias for currency identifiers within the graph
pub type CurrencyId = usize;

/// Default number of currency slots in a path table.
pub const MAX_NODES: usize = 2000;

/// Largest capacity a path table accepts; next hops are stored as `u32`.
pub const MAX_CAPACITY: usize = (u32::MAX - 1) as usize;

/// A directly quoted rate: 1 unit of `from` is worth `source.rate()` units of `to`.
#[derive(Clone)]
pub struct ConvertRate {
    /// Currency the quote is denominated from
    pub from: CurrencyId,
    /// Currency the quote converts into
    pub to: CurrencyId,
    /// Live rate feed for this quote
    pub source: RateFn,
}

impl ConvertRate {
    /// Create a new edge from any rate source
    pub fn new(from: CurrencyId, to: CurrencyId, source: RateFn) -> Self {
        Self { from, to, source }
    }

    /// Check that both endpoints fit in a table of the given capacity.
    pub fn validate(&self, capacity: usize) -> Result<(), GraphError> {
        validate_currency(self.from, capacity)?;
        validate_currency(self.to, capacity)
    }
}

impl fmt::Debug for ConvertRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConvertRate")
            .field("from", &self.from)
            .field("to", &self.to)
            .finish_non_exhaustive()
    }
}

/// Check that a currency id addresses a slot of a table with the given capacity.
pub fn validate_currency(id: CurrencyId, capacity: usize) -> Result<(), GraphError> {
    if id >= capacity {
        return Err(GraphError::InvalidCurrencyId { id, capacity });
    }
    Ok(())
}

/// Index of a rate source in the registry. Index 0 is reserved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct RateId(pub(crate) u32);

impl RateId {
    /// The registry slot this id refers to
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for RateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The rate to apply for a single hop, tagged with its direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum HopRate {
    /// Multiply by the quoted rate (hop follows the quote from -> to)
    Forward(RateId),
    /// Divide by the quoted rate (hop runs against the quote)
    Inverse(RateId),
}

impl HopRate {
    /// The registered rate this hop reads
    pub fn rate_id(self) -> RateId {
        match self {
            HopRate::Forward(id) | HopRate::Inverse(id) => id,
        }
    }

    /// Whether the quoted rate is applied as-is
    pub fn is_forward(self) -> bool {
        matches!(self, HopRate::Forward(_))
    }
}

impl fmt::Display for HopRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HopRate::Forward(id) => write!(f, "*{}", id),
            HopRate::Inverse(id) => write!(f, "/{}", id),
        }
    }
}

const NO_HOP: u32 = u32::MAX;

/// One (source, destination) entry of a next-hop table.
///
/// `rate` is only set for direct edges. For indirect entries the rate of the
/// first hop lives in the cell `(source, next_hop)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathCell {
    rate: Option<HopRate>,
    next_hop: u32,
}

impl PathCell {
    /// A cell with no rate and no known path
    pub const EMPTY: PathCell = PathCell { rate: None, next_hop: NO_HOP };

    /// Cell for a direct edge towards `neighbor`
    pub fn direct(neighbor: CurrencyId, rate: HopRate) -> Self {
        Self { rate: Some(rate), next_hop: neighbor as u32 }
    }

    /// Cell for an indirect path whose first hop is `next_hop`
    pub fn via(next_hop: CurrencyId) -> Self {
        Self { rate: None, next_hop: next_hop as u32 }
    }

    /// First node after the source on the stored path
    pub fn next_hop(&self) -> Option<CurrencyId> {
        (self.next_hop != NO_HOP).then_some(self.next_hop as CurrencyId)
    }

    /// Rate of the direct edge, if this cell describes one
    pub fn rate(&self) -> Option<HopRate> {
        self.rate
    }

    pub(crate) fn set_next_hop(&mut self, next_hop: CurrencyId) {
        self.next_hop = next_hop as u32;
    }

    pub(crate) fn set_rate(&mut self, rate: HopRate) {
        self.rate = Some(rate);
    }
}

impl Default for PathCell {
    fn default() -> Self {
        Self::EMPTY
    }
}
