//! Fewest-hop conversion paths and the engines that precompute them.
//!
//! Two interchangeable engines implement [`Converter`]:
//!
//! - **`DenseConverter`**: an N x N next-hop table maintained by an incremental
//!   all-pairs relaxation, one inserted edge at a time
//! - **`SparseConverter`**: per-currency maps filled by one breadth-first search
//!   per source, holding entries only for reachable destinations
//!
//! Both expose their table through [`NextHopTable`], and all conversions run through
//! the same [`PathEvaluator`], which walks the stored next hops and applies the live
//! rate of each leg.

pub mod dense;
pub mod evaluator;
pub mod factory;
pub mod sparse;

// Re-export types for convenience
pub use dense::DenseConverter;
pub use evaluator::{NextHopTable, PathEvaluator};
pub use factory::{ConverterFactory, ConverterKind};
pub use sparse::SparseConverter;

use crate::errors::Result;
use crate::graph::{ConvertRate, CurrencyId, HopRate, RateRegistry};
use serde::Serialize;
use std::{fmt, ops::Deref};

/// Shared capability of both path engines.
///
/// `init` takes `&mut self`, so it can never race with `convert` or with another
/// `init` on the same instance. Concurrent `convert` calls are as safe as the rate
/// sources they read.
pub trait Converter: Send + Sync {
    /// Precompute fewest-hop paths for the full edge set, replacing any prior state.
    ///
    /// # Errors
    ///
    /// Returns an error if any edge references a currency outside the table. The
    /// converter is left untouched in that case.
    fn init(&mut self, rates: &[ConvertRate]) -> Result<()>;

    /// Which engine backs this converter
    fn kind(&self) -> ConverterKind;

    /// Read access to the precomputed table
    fn next_hops(&self) -> &dyn NextHopTable;

    /// Convert `amount` of `from` into `to` using current rates.
    ///
    /// Returns `0.0` when no path exists or when any leg of the path is currently
    /// unavailable.
    ///
    /// # Errors
    ///
    /// Returns an error if either currency id is outside the table
    fn convert(&self, amount: f64, from: CurrencyId, to: CurrencyId) -> Result<f64> {
        PathEvaluator::new(self.next_hops()).convert(amount, from, to)
    }

    /// Current composite rate from `from` to `to`, `0.0` if unusable.
    fn composite_rate(&self, from: CurrencyId, to: CurrencyId) -> Result<f64> {
        PathEvaluator::new(self.next_hops()).composite_rate(from, to)
    }

    /// The hop chain a conversion walks; `None` if `to` is unreachable from `from`.
    fn path(&self, from: CurrencyId, to: CurrencyId) -> Result<Option<ConversionPath>> {
        PathEvaluator::new(self.next_hops()).path(from, to)
    }

    /// Number of hops on the stored path
    fn hop_count(&self, from: CurrencyId, to: CurrencyId) -> Result<Option<usize>> {
        Ok(self.path(from, to)?.map(|path| path.len()))
    }

    /// Number of currency slots in the table
    fn capacity(&self) -> usize {
        self.next_hops().table_capacity()
    }

    /// Number of registered rates
    fn rate_count(&self) -> usize {
        self.next_hops().registry().len()
    }

    /// Whether `init` has completed at least once
    fn is_initialized(&self) -> bool {
        self.next_hops().is_built()
    }
}

/// A single application of one registered rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Hop {
    pub from: CurrencyId,
    pub to: CurrencyId,
    /// `None` only if the table lost the rate of a direct edge
    pub rate: Option<HopRate>,
}

/// The chain of hops between two currencies.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConversionPath {
    source: CurrencyId,
    target: CurrencyId,
    hops: Vec<Hop>,
}

impl Deref for ConversionPath {
    type Target = Vec<Hop>;
    fn deref(&self) -> &Self::Target {
        &self.hops
    }
}

impl ConversionPath {
    pub(crate) fn new(source: CurrencyId, target: CurrencyId, hops: Vec<Hop>) -> Self {
        Self { source, target, hops }
    }

    /// Starting currency
    pub fn source(&self) -> CurrencyId {
        self.source
    }

    /// Destination currency
    pub fn target(&self) -> CurrencyId {
        self.target
    }

    /// Number of hops; zero for an identity conversion
    pub fn len(&self) -> usize {
        self.hops.len()
    }

    /// Whether this is an identity conversion
    pub fn is_empty(&self) -> bool {
        self.hops.is_empty()
    }

    /// Every currency visited, source and target included.
    pub fn currencies(&self) -> Vec<CurrencyId> {
        std::iter::once(self.source)
            .chain(self.hops.iter().map(|hop| hop.to))
            .collect()
    }

    /// Composite rate of this chain under the registry's current quotes.
    pub fn evaluate(&self, registry: &RateRegistry) -> f64 {
        self.hops.iter().fold(1.0, |composite, hop| match hop.rate {
            Some(rate) => registry.apply(rate, composite),
            None => 0.0,
        })
    }
}

impl fmt::Display for ConversionPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.source)?;
        for hop in &self.hops {
            match hop.rate {
                Some(rate) => write!(f, " -[{}]-> {}", rate, hop.to)?,
                None => write!(f, " -[?]-> {}", hop.to)?,
            }
        }
        Ok(())
    }
}
