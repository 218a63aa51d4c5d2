//! Persistence Adapters
//!
//! In-memory implementations of the repository traits and the catalog port,
//! carrying the same concurrency guarantees a database-backed adapter must
//! provide: an atomic order-number sequence and version-checked saves.

pub mod in_memory;

pub use in_memory::{
    InMemoryBandwidthChangeRepository, InMemoryInstanceRepository, InMemoryOrderRepository,
    InMemoryServiceCatalog,
};
