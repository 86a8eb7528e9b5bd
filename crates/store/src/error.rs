//! Error types for the persistence core.
//!
//! All failures detected at the translation boundary are data-integrity
//! problems, not transient faults: none of them are retried, and none are
//! silently defaulted. Each variant carries enough context (the offending
//! key or field) for the caller to log and diagnose the specific record.

// Error enum variant fields are self-documenting via their #[error(...)] messages
#![allow(missing_docs)]

use thiserror::Error;

use crate::key::ResourceKey;

/// The primary error type for translation and storage operations.
#[derive(Error, Debug)]
pub enum StoreError {
    /// A key failing the storage-validity invariant was presented for
    /// writing. Fatal to the write attempt; the caller must not proceed.
    #[error("key is not valid for storage: {key}")]
    InvalidKey { key: ResourceKey },

    /// A stored document is missing a required reserved field, or has a
    /// reserved field of the wrong type. The record is corrupt; retrying
    /// does not fix corrupt data.
    #[error("corrupt stored record: field '{field}': {reason}")]
    MalformedEnvelope { field: &'static str, reason: String },

    /// The non-envelope body of a stored document failed to parse into a
    /// domain resource. Distinct from a corrupt envelope, and carries the
    /// underlying parse cause.
    #[error("stored record has invalid content")]
    MalformedContent {
        #[source]
        source: meridian_fhir::ModelError,
    },
}

impl StoreError {
    /// Builds a [`StoreError::MalformedEnvelope`] for the given reserved field.
    pub(crate) fn malformed_envelope(field: &'static str, reason: impl Into<String>) -> Self {
        StoreError::MalformedEnvelope {
            field,
            reason: reason.into(),
        }
    }
}

/// Result type alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
