//! Rate graph and path table errors.

/// Errors that can occur while building or querying a path table
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    #[error("Invalid currency id {id}: must be below capacity {capacity}")]
    InvalidCurrencyId { id: usize, capacity: usize },

    #[error("Invalid capacity {capacity}: must be between 1 and {max}")]
    InvalidCapacity { capacity: usize, max: usize },

    #[error("Path table for capacity {capacity} cannot be allocated")]
    TableTooLarge { capacity: usize },

    #[error("Rate registry is full: cannot register more than {max} rates")]
    RegistryFull { max: usize },

    #[error("Path walk from {from} to {to} exceeded {limit} hops")]
    PathTooLong { from: usize, to: usize, limit: usize },
}
