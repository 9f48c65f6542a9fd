//! Document store abstraction.
//!
//! The questionnaire service only needs four path-scoped operations from the
//! store. [`DocumentStore`] captures them so the Realtime Database client can
//! be swapped for a fake in tests.

mod path;
mod realtime;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::StoreError;

pub use path::StorePath;
pub use realtime::RealtimeDatabase;

/// Trait for a remote hierarchical key-value store.
///
/// Every operation addresses a single path. Reading a subtree and reading a
/// leaf are the same operation. Consistency between concurrent writers to one
/// path is whatever the store provides.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Read the value at `path`, or `None` if nothing is stored there.
    async fn read(&self, path: &StorePath) -> Result<Option<Value>, StoreError>;

    /// Replace the value at `path`.
    async fn set(&self, path: &StorePath, value: Value) -> Result<(), StoreError>;

    /// Append `value` under `path` with a store-generated key and return the key.
    async fn push(&self, path: &StorePath, value: Value) -> Result<String, StoreError>;

    /// Delete the value at `path`. Deleting a missing node is not an error.
    async fn remove(&self, path: &StorePath) -> Result<(), StoreError>;
}
