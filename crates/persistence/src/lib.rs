//! Event log persistence for leadlog
//!
//! Provides:
//! - [`EventStore`]: load-all / append-one contract
//! - [`JsonFileEventStore`]: single pretty-printed JSON array on disk
//! - [`InMemoryEventStore`]: volatile store for tests and dry runs

pub mod error;
pub mod events;

pub use error::PersistenceError;
pub use events::{EventStore, InMemoryEventStore, JsonFileEventStore};
