//! Repository boundary trait.
//!
//! This module defines the [`DocumentStore`] trait, the seam between the
//! translation core and an actual storage engine. The engine exchanges
//! generic documents only - every document it accepts was produced by
//! [`crate::DocumentCodec::to_document`], and every document it returns is
//! fed to [`crate::DocumentCodec::from_document`]. The core performs no I/O
//! itself.
//!
//! Concurrency guarantees required of implementations:
//!
//! - writes for a given `(type, id)` are serialized or versioned such that
//!   two concurrent writes never collide on the same version ID;
//! - a read observes a document whose envelope and body were written
//!   atomically - a partially-written document is never visible.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::StoreResult;
use crate::key::ResourceKey;

/// A storage engine that persists enveloped documents.
///
/// Absence is not an error: lookups return `Ok(None)` for records that do
/// not exist, keeping "not found" distinguishable from the corrupt-record
/// failures raised by the translation layer.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Returns a human-readable name for this storage backend.
    fn backend_name(&self) -> &'static str;

    /// Persists one enveloped document as an atomic unit.
    ///
    /// Implementations supersede the previously current version of the same
    /// logical resource, so at most one version per `(type, id)` carries the
    /// `current` lifecycle state.
    ///
    /// # Errors
    ///
    /// * [`crate::StoreError::MalformedEnvelope`] - the document does not
    ///   carry a complete envelope.
    async fn insert(&self, document: Value) -> StoreResult<()>;

    /// Fetches the current version of a logical resource.
    async fn fetch_current(
        &self,
        type_name: &str,
        resource_id: &str,
    ) -> StoreResult<Option<Value>>;

    /// Fetches one specific version (vread).
    ///
    /// Returns `Ok(None)` when the key is not storage-valid or the version
    /// does not exist. A superseded version remains fetchable.
    async fn fetch_version(&self, key: &ResourceKey) -> StoreResult<Option<Value>>;

    /// Returns every stored version of a logical resource, oldest first.
    async fn history(&self, type_name: &str, resource_id: &str) -> StoreResult<Vec<Value>>;
}
