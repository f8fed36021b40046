//! Rate sources and the append-only rate registry.

use super::types::{HopRate, RateId};
use crate::errors::GraphError;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// A live exchange rate feed.
///
/// Implementations return a snapshot of the current rate. `0.0` means the rate is
/// currently unavailable; a genuinely zero quote cannot be told apart from that.
pub trait RateSource: Send + Sync {
    fn rate(&self) -> f64;
}

impl<F> RateSource for F
where
    F: Fn() -> f64 + Send + Sync,
{
    fn rate(&self) -> f64 {
        self()
    }
}

/// Shared handle to a rate source. The registry never owns the quote feed behind it.
pub type RateFn = Arc<dyn RateSource>;

/// Wrap a closure into a shareable rate source.
pub fn rate_fn<F>(f: F) -> RateFn
where
    F: Fn() -> f64 + Send + Sync + 'static,
{
    Arc::new(f)
}

/// A constant rate source.
pub fn fixed_rate(rate: f64) -> RateFn {
    Arc::new(move || rate)
}

/// A rate cell that can be updated while converters read it.
///
/// Clones share the same underlying value, so a caller can hand one clone to a
/// converter and keep another to push new quotes.
#[derive(Clone, Default)]
pub struct LiveRate {
    bits: Arc<AtomicU64>,
}

impl LiveRate {
    /// Create a live rate holding `rate`
    pub fn new(rate: f64) -> Self {
        Self { bits: Arc::new(AtomicU64::new(rate.to_bits())) }
    }

    /// Publish a new quote
    pub fn set(&self, rate: f64) {
        self.bits.store(rate.to_bits(), Ordering::Release);
    }

    /// Mark the quote unavailable; readers see `0.0`
    pub fn mark_unavailable(&self) {
        self.set(0.0);
    }

    /// Current quote
    pub fn get(&self) -> f64 {
        f64::from_bits(self.bits.load(Ordering::Acquire))
    }

    /// Whether the quote is currently usable
    pub fn is_available(&self) -> bool {
        self.get() != 0.0
    }

    /// A registry-ready handle sharing this cell
    pub fn source(&self) -> RateFn {
        Arc::new(self.clone())
    }
}

impl RateSource for LiveRate {
    fn rate(&self) -> f64 {
        self.get()
    }
}

impl fmt::Debug for LiveRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("LiveRate").field(&self.get()).finish()
    }
}

/// Append-only list of rate sources.
///
/// Slot 0 holds a dummy source that always reports `0.0`, so every id handed out
/// by [`RateRegistry::register`] is strictly positive.
pub struct RateRegistry {
    sources: Vec<RateFn>,
}

impl RateRegistry {
    /// Create a registry holding only the reserved slot
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Create a registry with room for `capacity` rates besides the reserved slot
    pub fn with_capacity(capacity: usize) -> Self {
        let mut sources: Vec<RateFn> = Vec::with_capacity(capacity + 1);
        sources.push(fixed_rate(0.0));
        Self { sources }
    }

    /// Register a source and return its fresh id.
    ///
    /// # Errors
    ///
    /// Returns an error once the id space of `u32` is exhausted
    pub fn register(&mut self, source: RateFn) -> Result<RateId, GraphError> {
        let id = u32::try_from(self.sources.len())
            .map_err(|_| GraphError::RegistryFull { max: u32::MAX as usize })?;
        self.sources.push(source);
        Ok(RateId(id))
    }

    /// Look up a registered source
    pub fn get(&self, id: RateId) -> Option<&RateFn> {
        self.sources.get(id.index())
    }

    /// Current value of a registered rate; unknown ids read as unavailable
    pub fn rate(&self, id: RateId) -> f64 {
        self.get(id).map_or(0.0, |source| source.rate())
    }

    /// Apply one hop to a running composite rate.
    ///
    /// A zero divisor forces the composite to `0.0`, and a zero composite stays zero
    /// for the rest of the walk. The source is read either way.
    pub fn apply(&self, hop: HopRate, composite: f64) -> f64 {
        let rate = self.rate(hop.rate_id());
        if composite == 0.0 {
            return 0.0;
        }
        match hop {
            HopRate::Forward(_) => composite * rate,
            HopRate::Inverse(_) if rate == 0.0 => 0.0,
            HopRate::Inverse(_) => composite / rate,
        }
    }

    /// Number of registered rates, excluding the reserved slot
    pub fn len(&self) -> usize {
        self.sources.len() - 1
    }

    /// Whether no rate has been registered
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for RateRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for RateRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RateRegistry")
            .field("rate_count", &self.len())
            .finish()
    }
}
