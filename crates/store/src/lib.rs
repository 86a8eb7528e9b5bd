//! # Meridian FHIR Store Persistence Core
//!
//! This crate is the versioned, key-addressed persistence core of the
//! Meridian FHIR Store. Every mutation of a clinical resource produces a new
//! immutable version; this crate defines how a resource and its storage
//! metadata travel together across the persistence boundary:
//!
//! - [`ResourceKey`] - the stable logical key of a resource (type name,
//!   resource ID, version ID), independent of its storage representation,
//!   with an explicit storage-validity predicate.
//! - [`Interaction`] - the unit of versioned work: a key, an operation kind
//!   ([`Method`]), a UTC timestamp, and an optional resource payload.
//! - [`envelope`] - the metadata envelope codec that injects and strips the
//!   reserved storage fields of a generic document.
//! - [`codec`] - the resource codec (redaction, interchange-text mapping)
//!   and the combined [`DocumentCodec`] read/write paths.
//! - [`store`] - the repository boundary: storage engines exchange generic
//!   documents only, and perform the actual I/O this core never does.
//! - [`memory`] - an in-memory [`store::DocumentStore`] used to exercise the
//!   translation layer without a database driver.
//!
//! # Data flow
//!
//! ```text
//! write: Resource ──encode──▶ document ──attach──▶ persisted document
//! read:  persisted document ──extract──▶ Interaction ──decode──▶ Resource
//! ```
//!
//! The core is pure and synchronous: aside from one injected-clock read on
//! the write path it performs no side effects, takes no locks, and never
//! blocks or retries. Malformed stored data is surfaced, never defaulted -
//! see [`StoreError`] for the taxonomy.
//!
//! # Quick start
//!
//! ```
//! use std::sync::Arc;
//! use chrono::{TimeZone, Utc};
//! use meridian_fhir::Resource;
//! use meridian_store::clock::FixedClock;
//! use meridian_store::{DocumentCodec, Interaction, Method, ResourceKey};
//!
//! let when = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
//! let codec = DocumentCodec::new(Arc::new(FixedClock(when)));
//!
//! // Inbound: a resource and its addressing key become one document.
//! let key = ResourceKey::new("Patient")
//!     .with_resource_id("42")
//!     .with_version_id("1");
//! let resource = Resource::from_json(
//!     r#"{"resourceType": "Patient", "id": "42", "active": true}"#,
//! ).unwrap();
//! let mut interaction = Interaction::new(key, Method::Create, when).with_resource(resource);
//! let document = codec.to_document(&mut interaction).unwrap();
//! assert_eq!(document["_id"], "Patient/42");
//!
//! // Outbound: the document reconstructs the interaction and its resource.
//! let read_back = codec.from_document(document).unwrap();
//! assert_eq!(read_back.key().relative_path(), "Patient/42");
//! assert!(read_back.resource().is_some());
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod clock;
pub mod codec;
pub mod envelope;
pub mod error;
pub mod interaction;
pub mod key;
pub mod memory;
pub mod store;

// Re-export commonly used types at crate root
pub use clock::{Clock, SystemClock};
pub use codec::DocumentCodec;
pub use envelope::DocumentState;
pub use error::{StoreError, StoreResult};
pub use interaction::{Interaction, Method};
pub use key::ResourceKey;
pub use memory::InMemoryDocumentStore;
pub use store::DocumentStore;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
