//! Dense path engine: a full next-hop matrix kept shortest by incremental relaxation.
//!
//! Edges are inserted one at a time in input order. Each insertion runs a single
//! relaxation pass seeded by the new edge: every pair `(i, j)` with `i` reachable
//! from `from` and `j` reachable from `to` is tested for the route
//! `i -> .. -> from -> to -> .. -> j`. Because the table is consistent before the
//! insertion, one pass is enough to make it consistent again.
//!
//! Memory is O(N^2) in the capacity regardless of edge count; the relaxation is
//! O(N^2) per inserted edge in the worst case, and lookups are O(1).

use super::evaluator::NextHopTable;
use super::{Converter, ConverterKind};
use crate::errors::{GraphError, Result};
use crate::graph::{
    ConvertRate, CurrencyId, HopRate, PathCell, RateRegistry, MAX_CAPACITY, MAX_NODES,
};
use crate::GraphResult;
use std::time::Instant;

type Distance = u32;

const UNREACHABLE: Distance = Distance::MAX;

/// Next-hop matrix engine backed by incremental all-pairs relaxation.
pub struct DenseConverter {
    capacity: usize,
    /// Row-major `capacity x capacity` cells; empty until `init`
    table: Vec<PathCell>,
    registry: RateRegistry,
}

impl DenseConverter {
    /// Create an engine with the default capacity of [`MAX_NODES`] currencies
    pub fn new() -> Self {
        Self {
            capacity: MAX_NODES,
            table: Vec::new(),
            registry: RateRegistry::new(),
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

    fn cell(&self, from: CurrencyId, to: CurrencyId) -> Option<&PathCell> {
        self.table.get(from * self.capacity + to)
    }
}

impl Default for DenseConverter {
    fn default() -> Self {
        Self::new()
    }
}

impl Converter for DenseConverter {
    fn init(&mut self, rates: &[ConvertRate]) -> Result<()> {
        for rate in rates {
            rate.validate(self.capacity)?;
        }

        let started = Instant::now();
        let n = self.capacity;

        tracing::debug!(
            capacity = n,
            edge_count = rates.len(),
            "Building dense next-hop table"
        );

        let cells = n.checked_mul(n).ok_or(GraphError::TableTooLarge { capacity: n })?;
        let mut table = allocate(cells, PathCell::EMPTY, n)?;
        let mut distance = allocate(cells, UNREACHABLE, n)?;
        let mut registry = RateRegistry::with_capacity(rates.len());
        for i in 0..n {
            distance[i * n + i] = 0;
        }

        let mut improved_pairs = 0usize;
        for rate in rates {
            let (from, to) = (rate.from, rate.to);
            let id = registry.register(rate.source.clone())?;
            table[from * n + to].set_rate(HopRate::Forward(id));
            table[to * n + from].set_rate(HopRate::Inverse(id));

            improved_pairs += relax_through_edge(&mut table, &mut distance, n, from, to);
        }

        self.table = table;
        self.registry = registry;

        tracing::info!(
            kind = %ConverterKind::Dense,
            capacity = n,
            rate_count = self.registry.len(),
            improved_pairs = improved_pairs,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Dense next-hop table built"
        );

        Ok(())
    }

    fn kind(&self) -> ConverterKind {
        ConverterKind::Dense
    }

    fn next_hops(&self) -> &dyn NextHopTable {
        self
    }
}

impl NextHopTable for DenseConverter {
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
        !self.table.is_empty()
    }
}

/// A vector of `len` copies of `value`, or an error if it cannot be reserved.
fn allocate<T: Clone>(len: usize, value: T, capacity: usize) -> GraphResult<Vec<T>> {
    let mut cells = Vec::new();
    cells.try_reserve_exact(len).map_err(|e| {
        tracing::error!(capacity = capacity, cells = len, error = %e, "Failed to reserve dense table");
        GraphError::TableTooLarge { capacity }
    })?;
    cells.resize(len, value);
    Ok(cells)
}

/// Relax every pair whose shortest route may now run through `from -> to`.
///
/// Distances are read from snapshots taken before the pass, so the new edge is
/// never counted twice. Only strictly shorter routes replace a stored one; among
/// equal-length paths the first one discovered stays. Returns the number of
/// improved pairs.
fn relax_through_edge(
    table: &mut [PathCell],
    distance: &mut [Distance],
    n: usize,
    from: CurrencyId,
    to: CurrencyId,
) -> usize {
    let near_from = reachable(distance, n, from);
    let near_to = reachable(distance, n, to);
    let mut improved = 0usize;

    for &(i, from_to_i) in &near_from {
        for &(j, to_to_j) in &near_to {
            let candidate = from_to_i + to_to_j + 1;
            if candidate >= distance[i * n + j] {
                continue;
            }

            // i -> .. -> from -> to -> .. -> j, and the same route reversed.
            let forward = if i == from { Some(to) } else { table[i * n + from].next_hop() };
            let backward = if j == to { Some(from) } else { table[j * n + to].next_hop() };
            let (Some(forward), Some(backward)) = (forward, backward) else {
                tracing::error!(i = i, j = j, from = from, to = to, "Reachable pair has no next hop");
                continue;
            };

            distance[i * n + j] = candidate;
            distance[j * n + i] = candidate;
            table[i * n + j].set_next_hop(forward);
            table[j * n + i].set_next_hop(backward);
            improved += 1;
        }
    }

    improved
}

/// Every node with a known distance from `node`, paired with that distance.
fn reachable(distance: &[Distance], n: usize, node: CurrencyId) -> Vec<(CurrencyId, Distance)> {
    distance[node * n..(node + 1) * n]
        .iter()
        .enumerate()
        .filter_map(|(other, &d)| (d != UNREACHABLE).then_some((other, d)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ConverterError;
    use crate::graph::fixed_rate;

    fn edge(from: CurrencyId, to: CurrencyId, rate: f64) -> ConvertRate {
        ConvertRate::new(from, to, fixed_rate(rate))
    }

    #[test]
    fn test_capacity_validation() {
        assert!(DenseConverter::with_capacity(0).is_err());
        assert!(DenseConverter::with_capacity(MAX_CAPACITY + 1).is_err());
        assert_eq!(DenseConverter::with_capacity(3).unwrap().capacity(), 3);
        assert_eq!(DenseConverter::new().capacity(), MAX_NODES);
    }

    #[test]
    fn test_direct_edge_cells() {
        let mut cvt = DenseConverter::with_capacity(4).unwrap();
        cvt.init(&[edge(1, 3, 2.0)]).unwrap();

        let forward = cvt.cell(1, 3).unwrap();
        let backward = cvt.cell(3, 1).unwrap();
        assert!(forward.rate().unwrap().is_forward());
        assert!(!backward.rate().unwrap().is_forward());
        assert_eq!(forward.next_hop(), Some(3));
        assert_eq!(backward.next_hop(), Some(1));
        assert_eq!(cvt.cell(1, 1).unwrap().next_hop(), None);
        assert_eq!(cvt.cell(0, 1).unwrap(), &PathCell::EMPTY);
    }

    #[test]
    fn test_next_hop_chains_through_existing_path() {
        let mut cvt = DenseConverter::with_capacity(5).unwrap();
        cvt.init(&[edge(0, 1, 1.0), edge(1, 2, 1.0), edge(2, 3, 1.0)]).unwrap();

        assert_eq!(cvt.next_hop(0, 3), Some(1));
        assert_eq!(cvt.next_hop(1, 3), Some(2));
        assert_eq!(cvt.next_hop(3, 0), Some(2));
        assert_eq!(cvt.next_hop(2, 0), Some(1));
        assert_eq!(cvt.hop_rate(0, 3), None);
        assert_eq!(cvt.next_hop(0, 4), None);
    }

    #[test]
    fn test_shortcut_replaces_longer_route() {
        let mut cvt = DenseConverter::with_capacity(5).unwrap();
        cvt.init(&[edge(0, 1, 1.0), edge(1, 2, 1.0), edge(2, 3, 1.0), edge(0, 3, 1.0)]).unwrap();

        assert_eq!(cvt.next_hop(0, 3), Some(3));
        assert_eq!(cvt.next_hop(3, 0), Some(0));
        assert_eq!(cvt.next_hop(1, 3), Some(2));
    }

    #[test]
    fn test_equal_length_keeps_first_discovered() {
        // Square 0-1-3 and 0-2-3: the route through 1 is complete first.
        let mut cvt = DenseConverter::with_capacity(4).unwrap();
        cvt.init(&[edge(0, 1, 1.0), edge(1, 3, 1.0), edge(0, 2, 1.0), edge(2, 3, 1.0)]).unwrap();

        assert_eq!(cvt.next_hop(0, 3), Some(1));
        assert_eq!(cvt.next_hop(3, 0), Some(1));
        assert_eq!(cvt.next_hop(1, 2), Some(0));
    }

    #[test]
    fn test_oversized_table_is_an_error() {
        let mut cvt = DenseConverter::with_capacity(1_000_000_000).unwrap();
        let err = cvt.init(&[edge(0, 1, 2.0)]).unwrap_err();

        assert!(matches!(
            err,
            ConverterError::Graph(GraphError::TableTooLarge { capacity: 1_000_000_000 })
        ));
        assert!(!cvt.is_initialized());
        assert_eq!(cvt.convert(1.0, 0, 1).unwrap(), 0.0);
        assert!(allocate(usize::MAX, 0u32, 4).is_err());
    }

    #[test]
    fn test_reachable_reads_row() {
        let n = 3;
        let mut distance = vec![UNREACHABLE; n * n];
        distance[n + 1] = 0;
        distance[n + 2] = 4;

        assert_eq!(reachable(&distance, n, 1), vec![(1, 0), (2, 4)]);
        assert!(reachable(&distance, n, 0).is_empty());
    }
}
