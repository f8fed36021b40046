//! Sparse path engine: one breadth-first search per source currency.
//!
//! Each currency owns a map keyed by destination. Direct edges are entered first,
//! carrying their rate in both directions. A BFS from every source then adds an
//! entry for each newly reached currency that records only the first hop out of the
//! source; the rate of that hop is read from the source's direct entry while walking.
//!
//! A destination is reachable exactly when its entry exists, so no sentinel scan is
//! needed. Only currencies that appear in a quote get a map, so memory is O(R) for
//! the direct entries plus one entry per reachable pair, independent of capacity;
//! the build is O(N * (N + R)) over the quoted currencies.

use super::evaluator::NextHopTable;
use super::{Converter, ConverterKind};
use crate::errors::{GraphError, Result};
use crate::graph::{
    ConvertRate, CurrencyId, HopRate, PathCell, RateRegistry, MAX_CAPACITY, MAX_NODES,
};
use crate::GraphResult;
use std::collections::{HashMap, VecDeque};
use std::time::Instant;

/// Per-currency path maps filled by breadth-first search.
pub struct SparseConverter {
    capacity: usize,
    paths: HashMap<CurrencyId, HashMap<CurrencyId, PathCell>>,
    registry: RateRegistry,
    initialized: bool,
}

impl SparseConverter {
    /// Create an engine with the default capacity of [`MAX_NODES`] currencies
    pub fn new() -> Self {
        Self {
            capacity: MAX_NODES,
            paths: HashMap::new(),
            registry: RateRegistry::new(),
            initialized: false,
        }
    }

    /// Create an engine addressing currencies `0..capacity`.
    ///
    /// # Errors
    ///
    /// Returns an error if the capacity is zero or too large for the table encoding
    pub fn with_capacity(capacity: usize) -> GraphResult<Self> {
        if capacity == 0 || capacity > MAX_CAPACITY {
            return Err(GraphError::InvalidCapacity { capacity, max: MAX_CAPACITY });
        }
        Ok(Self {
            capacity,
            ..Self::new()
        })
    }

    /// Number of destinations reachable from `from`, itself excluded.
    pub fn reachable_count(&self, from: CurrencyId) -> usize {
        self.paths
            .get(&from)
            .map_or(0, |map| map.keys().filter(|&&to| to != from).count())
    }

    fn cell(&self, from: CurrencyId, to: CurrencyId) -> Option<&PathCell> {
        self.paths.get(&from).and_then(|map| map.get(&to))
    }
}

impl Default for SparseConverter {
    fn default() -> Self {
        Self::new()
    }
}

impl Converter for SparseConverter {
    fn init(&mut self, rates: &[ConvertRate]) -> Result<()> {
        for rate in rates {
            rate.validate(self.capacity)?;
        }

        let started = Instant::now();
        let n = self.capacity;

        tracing::debug!(
            capacity = n,
            edge_count = rates.len(),
            "Building sparse path maps"
        );

        let mut registry = RateRegistry::with_capacity(rates.len());
        let mut paths: HashMap<CurrencyId, HashMap<CurrencyId, PathCell>> = HashMap::new();
        // Direct neighbours in order of their first quote, so searches are deterministic.
        let mut neighbors: HashMap<CurrencyId, Vec<CurrencyId>> = HashMap::new();
        let mut sources: Vec<CurrencyId> = Vec::new();

        for rate in rates {
            let (from, to) = (rate.from, rate.to);
            let id = registry.register(rate.source.clone())?;

            for (node, neighbor, hop) in [
                (from, to, HopRate::Forward(id)),
                (to, from, HopRate::Inverse(id)),
            ] {
                let row = paths.entry(node).or_default();
                if row.insert(neighbor, PathCell::direct(neighbor, hop)).is_none() {
                    let adjacent = neighbors.entry(node).or_default();
                    if adjacent.is_empty() {
                        sources.push(node);
                    }
                    adjacent.push(neighbor);
                }
            }
        }

        tracing::debug!(
            rate_count = registry.len(),
            "Direct entries registered, searching from every currency"
        );

        // Marks which source's search last reached a currency.
        let mut visited: HashMap<CurrencyId, CurrencyId> = HashMap::with_capacity(sources.len());
        let mut frontier: VecDeque<(CurrencyId, CurrencyId)> = VecDeque::new();
        let mut indirect_entries = 0usize;
        let no_neighbors: Vec<CurrencyId> = Vec::new();

        for &source in &sources {
            let adjacent = neighbors.get(&source).unwrap_or(&no_neighbors);
            let row = paths.entry(source).or_default();
            visited.insert(source, source);
            frontier.clear();

            // (currency to expand, first hop out of source that reached it)
            for &next in adjacent {
                visited.insert(next, source);
                frontier.push_back((next, next));
            }

            while let Some((current, first_hop)) = frontier.pop_front() {
                for &next in neighbors.get(&current).unwrap_or(&no_neighbors) {
                    if visited.insert(next, source) == Some(source) {
                        continue;
                    }
                    row.insert(next, PathCell::via(first_hop));
                    frontier.push_back((next, first_hop));
                    indirect_entries += 1;
                }
            }
        }

        self.paths = paths;
        self.registry = registry;
        self.initialized = true;

        tracing::info!(
            kind = %ConverterKind::Sparse,
            capacity = n,
            rate_count = self.registry.len(),
            indirect_entries = indirect_entries,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Sparse path maps built"
        );

        Ok(())
    }

    fn kind(&self) -> ConverterKind {
        ConverterKind::Sparse
    }

    fn next_hops(&self) -> &dyn NextHopTable {
        self
    }
}

impl NextHopTable for SparseConverter {
    fn table_capacity(&self) -> usize {
        self.capacity
    }

    fn next_hop(&self, from: CurrencyId, to: CurrencyId) -> Option<CurrencyId> {
        self.cell(from, to).and_then(PathCell::next_hop)
    }

    fn hop_rate(&self, from: CurrencyId, next: CurrencyId) -> Option<HopRate> {
        self.cell(from, next).and_then(PathCell::rate)
    }

    fn registry(&self) -> &RateRegistry {
        &self.registry
    }

    fn is_built(&self) -> bool {
        self.initialized
    }
}
