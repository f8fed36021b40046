//! Builder pattern for initialized converters

use crate::config::ConverterConfig;
use crate::errors::Result;
use crate::graph::{fixed_rate, ConvertRate, CurrencyId, RateFn, MAX_NODES};
use crate::path::{Converter, ConverterFactory, ConverterKind};

/// Builder for creating ready-to-use converters with a fluent API
pub struct ConverterBuilder {
    kind: ConverterKind,
    max_nodes: usize,
    rates: Vec<ConvertRate>,
}

impl ConverterBuilder {
    /// Create a new ConverterBuilder
    pub fn new() -> Self {
        Self {
            kind: ConverterKind::default(),
            max_nodes: MAX_NODES,
            rates: Vec::new(),
        }
    }

    /// Select the path engine
    pub fn kind(mut self, kind: ConverterKind) -> Self {
        self.kind = kind;
        self
    }

    /// Set the number of currency slots
    pub fn max_nodes(mut self, max_nodes: usize) -> Self {
        self.max_nodes = max_nodes;
        self
    }

    /// Take engine kind and capacity from a configuration
    pub fn config(self, config: &ConverterConfig) -> Self {
        self.kind(config.kind).max_nodes(config.max_nodes)
    }

    /// Add a live rate edge
    ///
    /// # Arguments
    ///
    /// * `from` - Currency the quote is denominated from
    /// * `to` - Currency the quote converts into
    /// * `source` - Feed returning the current rate, `0.0` when unavailable
    pub fn add_rate(mut self, from: CurrencyId, to: CurrencyId, source: RateFn) -> Self {
        self.rates.push(ConvertRate::new(from, to, source));
        self
    }

    /// Add an edge whose rate never changes
    pub fn add_fixed_rate(self, from: CurrencyId, to: CurrencyId, rate: f64) -> Self {
        self.add_rate(from, to, fixed_rate(rate))
    }

    /// Add multiple edges, keeping their order
    pub fn add_rates<I>(mut self, rates: I) -> Self
    where
        I: IntoIterator<Item = ConvertRate>,
    {
        self.rates.extend(rates);
        self
    }

    /// Build the converter and precompute its paths
    ///
    /// # Errors
    ///
    /// Returns an error if the capacity is unusable or any edge references a
    /// currency outside it
    pub fn build(self) -> Result<Box<dyn Converter>> {
        let config = ConverterConfig {
            kind: self.kind,
            max_nodes: self.max_nodes,
        };
        config.validate()?;

        let mut converter = ConverterFactory::new(config.kind)
            .with_capacity(config.max_nodes)
            .create()?;
        converter.init(&self.rates)?;
        Ok(converter)
    }
}

impl Default for ConverterBuilder {
    fn default() -> Self {
        Self::new()
    }
}
