//! Engine selection.

use super::{Converter, DenseConverter, SparseConverter};
use crate::errors::{ConfigError, Result};
use crate::graph::MAX_NODES;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which path engine backs a converter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConverterKind {
    /// Full next-hop matrix, incremental all-pairs relaxation
    #[serde(alias = "incremental")]
    Dense,
    /// Per-currency maps, one breadth-first search per source
    #[default]
    #[serde(alias = "bfs")]
    Sparse,
}

impl ConverterKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ConverterKind::Dense => "dense",
            ConverterKind::Sparse => "sparse",
        }
    }
}

impl fmt::Display for ConverterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConverterKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dense" | "incremental" => Ok(ConverterKind::Dense),
            "sparse" | "bfs" => Ok(ConverterKind::Sparse),
            _ => Err(ConfigError::UnknownConverterKind { value: s.to_string() }),
        }
    }
}

/// Creates uninitialized converters of a chosen kind and capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConverterFactory {
    kind: ConverterKind,
    capacity: usize,
}

impl ConverterFactory {
    pub fn new(kind: ConverterKind) -> Self {
        Self { kind, capacity: MAX_NODES }
    }

    /// Switch the engine kind for converters created from now on
    pub fn set_kind(&mut self, kind: ConverterKind) {
        self.kind = kind;
    }

    /// Use a capacity other than [`MAX_NODES`]
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn kind(&self) -> ConverterKind {
        self.kind
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Create an empty converter; call [`Converter::init`] before converting.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured capacity is not usable
    pub fn create(&self) -> Result<Box<dyn Converter>> {
        tracing::debug!(
            kind = %self.kind,
            capacity = self.capacity,
            "Creating converter"
        );

        let converter: Box<dyn Converter> = match self.kind {
            ConverterKind::Dense => Box::new(DenseConverter::with_capacity(self.capacity)?),
            ConverterKind::Sparse => Box::new(SparseConverter::with_capacity(self.capacity)?),
        };
        Ok(converter)
    }
}

impl Default for ConverterFactory {
    fn default() -> Self {
        Self::new(ConverterKind::default())
    }
}
