//! Durable client-side snapshot storage.
//!
//! A conversation controller persists its transcript through the
//! [`SnapshotStore`] trait: a synchronous, best-effort key/value store.
//! Storage failures are logged and read back as absence; they never reach the
//! controller as errors.

pub mod memory;
pub mod sqlite;
pub mod store;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
pub use store::SnapshotStore;
