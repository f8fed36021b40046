//! Runtime evaluation of precomputed next-hop tables.
//!
//! A conversion never searches: it follows `next_hop(prev, to)` from the source until
//! it lands on the destination, reading the live rate of every leg on the way. The
//! walk is O(path length) and never mutates the table.

use super::{ConversionPath, Hop};
use crate::errors::{GraphError, Result};
use crate::graph::{validate_currency, CurrencyId, HopRate, RateRegistry};

/// Read access to a next-hop table, implemented by both path engines.
pub trait NextHopTable {
    /// Number of currency slots
    fn table_capacity(&self) -> usize;

    /// First node after `from` on the stored path towards `to`
    fn next_hop(&self, from: CurrencyId, to: CurrencyId) -> Option<CurrencyId>;

    /// Rate of the direct edge `from -> next`
    fn hop_rate(&self, from: CurrencyId, next: CurrencyId) -> Option<HopRate>;

    /// Registry the hop rates point into
    fn registry(&self) -> &RateRegistry;

    /// Whether the table has been built
    fn is_built(&self) -> bool;
}

/// Walks a [`NextHopTable`] to evaluate conversions.
pub struct PathEvaluator<'a> {
    table: &'a dyn NextHopTable,
}

impl<'a> PathEvaluator<'a> {
    pub fn new(table: &'a dyn NextHopTable) -> Self {
        Self { table }
    }

    /// Convert `amount` of `from` into `to`.
    ///
    /// `0.0` signals either an unreachable pair or a leg that is currently
    /// unavailable. Identity conversions return `amount` untouched.
    ///
    /// # Errors
    ///
    /// Returns an error if either currency id is outside the table
    pub fn convert(&self, amount: f64, from: CurrencyId, to: CurrencyId) -> Result<f64> {
        self.check_currencies(from, to)?;
        if from == to {
            return Ok(amount);
        }

        let composite = self.composite_rate(from, to)?;
        let value = amount * composite;

        tracing::trace!(
            from = from,
            to = to,
            amount = amount,
            composite_rate = composite,
            value = value,
            "Conversion evaluated"
        );

        Ok(value)
    }

    /// Product of all hop rates between `from` and `to` under current quotes.
    pub fn composite_rate(&self, from: CurrencyId, to: CurrencyId) -> Result<f64> {
        self.check_currencies(from, to)?;

        let registry = self.table.registry();
        let mut composite = 1.0;
        let reached = self.walk(from, to, |hop| {
            composite = match hop.rate {
                Some(rate) => {
                    let next = registry.apply(rate, composite);
                    if next == 0.0 && composite != 0.0 {
                        tracing::warn!(
                            from = hop.from,
                            to = hop.to,
                            rate = %rate,
                            "Rate leg unavailable, conversion yields zero"
                        );
                    }
                    next
                }
                None => {
                    tracing::warn!(
                        from = hop.from,
                        to = hop.to,
                        "Hop has no registered rate, treating leg as unavailable"
                    );
                    0.0
                }
            };
        })?;

        Ok(if reached { composite } else { 0.0 })
    }

    /// Collect the hop chain between `from` and `to`.
    ///
    /// Returns `None` when `to` is unreachable from `from`.
    pub fn path(&self, from: CurrencyId, to: CurrencyId) -> Result<Option<ConversionPath>> {
        self.check_currencies(from, to)?;

        let mut hops = Vec::new();
        let reached = self.walk(from, to, |hop| hops.push(hop))?;

        Ok(reached.then(|| ConversionPath::new(from, to, hops)))
    }

    /// Follow next hops from `from` to `to`, handing every hop to `visit`.
    ///
    /// Returns `false` if no path is stored. A chain that breaks or loops midway
    /// means the table is corrupt; the former reads as unreachable, the latter is
    /// reported as an error.
    fn walk<F>(&self, from: CurrencyId, to: CurrencyId, mut visit: F) -> Result<bool>
    where
        F: FnMut(Hop),
    {
        let limit = self.table.table_capacity();
        let mut prev = from;
        let mut hops = 0usize;

        while prev != to {
            let Some(next) = self.table.next_hop(prev, to) else {
                if hops > 0 {
                    tracing::error!(
                        from = from,
                        to = to,
                        stuck_at = prev,
                        "Next-hop chain broke before reaching destination"
                    );
                }
                return Ok(false);
            };

            hops += 1;
            if hops > limit {
                tracing::error!(from = from, to = to, limit = limit, "Next-hop chain does not terminate");
                return Err(GraphError::PathTooLong { from, to, limit }.into());
            }

            visit(Hop {
                from: prev,
                to: next,
                rate: self.table.hop_rate(prev, next),
            });
            prev = next;
        }

        Ok(true)
    }

    fn check_currencies(&self, from: CurrencyId, to: CurrencyId) -> Result<()> {
        let capacity = self.table.table_capacity();
        validate_currency(from, capacity)?;
        validate_currency(to, capacity)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{fixed_rate, LiveRate, PathCell};
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tracing::{Event, Level, Subscriber};
    use tracing_subscriber::layer::{Context, SubscriberExt};
    use tracing_subscriber::Layer;

    /// Counts warn-level events emitted while installed.
    struct WarnCounter(Arc<AtomicUsize>);

    impl<S: Subscriber> Layer<S> for WarnCounter {
        fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
            if *event.metadata().level() == Level::WARN {
                self.0.fetch_add(1, Ordering::SeqCst);
            }
        }
    }

    fn count_warnings<F: FnOnce()>(f: F) -> usize {
        let warnings = Arc::new(AtomicUsize::new(0));
        let subscriber = tracing_subscriber::registry().with(WarnCounter(warnings.clone()));
        tracing::subscriber::with_default(subscriber, f);
        warnings.load(Ordering::SeqCst)
    }

    /// Hand-written table for exercising the walk on its own.
    struct TableStub {
        capacity: usize,
        cells: HashMap<(CurrencyId, CurrencyId), PathCell>,
        registry: RateRegistry,
    }

    impl TableStub {
        fn new(capacity: usize) -> Self {
            Self { capacity, cells: HashMap::new(), registry: RateRegistry::new() }
        }

        fn edge(&mut self, from: CurrencyId, to: CurrencyId, rate: f64) {
            let id = self.registry.register(fixed_rate(rate)).unwrap();
            self.cells.insert((from, to), PathCell::direct(to, HopRate::Forward(id)));
            self.cells.insert((to, from), PathCell::direct(from, HopRate::Inverse(id)));
        }

        fn route(&mut self, from: CurrencyId, to: CurrencyId, next: CurrencyId) {
            self.cells.insert((from, to), PathCell::via(next));
        }
    }

    impl NextHopTable for TableStub {
        fn table_capacity(&self) -> usize {
            self.capacity
        }

        fn next_hop(&self, from: CurrencyId, to: CurrencyId) -> Option<CurrencyId> {
            self.cells.get(&(from, to)).and_then(PathCell::next_hop)
        }

        fn hop_rate(&self, from: CurrencyId, next: CurrencyId) -> Option<HopRate> {
            self.cells.get(&(from, next)).and_then(PathCell::rate)
        }

        fn registry(&self) -> &RateRegistry {
            &self.registry
        }

        fn is_built(&self) -> bool {
            true
        }
    }

    #[test]
    fn test_walk_multiplies_and_divides() {
        let mut table = TableStub::new(4);
        table.edge(0, 1, 2.0);
        table.edge(2, 1, 8.0);
        table.route(0, 2, 1);
        table.route(2, 0, 1);

        let evaluator = PathEvaluator::new(&table);
        assert_eq!(evaluator.convert(16.0, 0, 2).unwrap(), 4.0);
        assert_eq!(evaluator.convert(4.0, 2, 0).unwrap(), 16.0);
        assert_eq!(evaluator.path(0, 2).unwrap().unwrap().currencies(), vec![0, 1, 2]);
    }

    #[test]
    fn test_broken_chain_reads_unreachable() {
        let mut table = TableStub::new(4);
        table.edge(0, 1, 2.0);
        table.route(0, 3, 1);

        let evaluator = PathEvaluator::new(&table);
        assert_eq!(evaluator.convert(1.0, 0, 3).unwrap(), 0.0);
        assert!(evaluator.path(0, 3).unwrap().is_none());
    }

    #[test]
    fn test_looping_chain_is_an_error() {
        let mut table = TableStub::new(4);
        table.edge(0, 1, 2.0);
        table.route(0, 3, 1);
        table.route(1, 3, 0);

        let evaluator = PathEvaluator::new(&table);
        let err = evaluator.convert(1.0, 0, 3).unwrap_err();
        assert!(err.to_string().contains("exceeded 4 hops"));
    }

    #[test]
    fn test_missing_hop_rate_is_unavailable() {
        let mut table = TableStub::new(4);
        table.route(0, 1, 1);

        let evaluator = PathEvaluator::new(&table);
        assert_eq!(evaluator.convert(10.0, 0, 1).unwrap(), 0.0);

        let path = evaluator.path(0, 1).unwrap().unwrap();
        assert_eq!(path.len(), 1);
        assert!(path[0].rate.is_none());
    }

    #[test]
    fn test_unavailable_leg_is_reported() {
        let mut table = TableStub::new(4);
        table.edge(0, 1, 2.0);
        let live = LiveRate::new(3.0);
        let id = table.registry.register(live.source()).unwrap();
        table.cells.insert((1, 2), PathCell::direct(2, HopRate::Forward(id)));
        table.edge(2, 3, 4.0);
        table.route(0, 2, 1);
        table.route(0, 3, 1);
        table.route(1, 3, 2);

        let evaluator = PathEvaluator::new(&table);
        let warnings = count_warnings(|| {
            assert_eq!(evaluator.convert(1.0, 0, 3).unwrap(), 24.0);
        });
        assert_eq!(warnings, 0);

        live.mark_unavailable();
        let warnings = count_warnings(|| {
            assert_eq!(evaluator.convert(1.0, 0, 3).unwrap(), 0.0);
            assert_eq!(evaluator.convert(1.0, 0, 2).unwrap(), 0.0);
        });
        assert_eq!(warnings, 2);
    }

    #[test]
    fn test_zero_amount_stays_exact() {
        let mut table = TableStub::new(2);
        table.edge(0, 1, 3.0);

        let evaluator = PathEvaluator::new(&table);
        let value = evaluator.convert(0.0, 0, 1).unwrap();
        assert_eq!(value, 0.0);
        assert!(value.is_sign_positive());
    }
}
