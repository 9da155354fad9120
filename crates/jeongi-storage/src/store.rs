//! The snapshot storage contract.

/// Best-effort durable key/value storage for transcript snapshots.
///
/// All operations are synchronous and infallible from the caller's point of
/// view: an unavailable or failing backend behaves as if every key were
/// absent. Implementations log their own failures.
pub trait SnapshotStore: Send + Sync {
    /// Read the value stored under `key`, if any.
    fn get(&self, key: &str) -> Option<String>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str);

    /// Remove `key` and its value, if present.
    fn remove(&self, key: &str);
}
