//! # Meridian FHIR Resource Model
//!
//! This crate is the resource-model boundary of the Meridian FHIR Store. It
//! defines the opaque [`Resource`] domain object, the [`Meta`] versioning
//! block resources carry about themselves, and the JSON interchange codec
//! used to move resources in and out of text form.
//!
//! The store layers above this crate treat clinical content as opaque: they
//! rely only on the structural contract enforced here (a JSON object naming
//! its `resourceType`) and on the `meta` accessors. Clinical schema
//! validation belongs to profile tooling, not to this crate.
//!
//! ## Examples
//!
//! ```
//! use meridian_fhir::Resource;
//!
//! let patient = Resource::from_json(
//!     r#"{"resourceType": "Patient", "id": "example", "active": true}"#,
//! ).unwrap();
//!
//! assert_eq!(patient.type_name(), "Patient");
//! assert_eq!(patient.id(), Some("example"));
//!
//! let text = patient.to_json().unwrap();
//! assert_eq!(Resource::from_json(&text).unwrap(), patient);
//! ```

#![warn(missing_docs)]

pub mod error;
pub mod json;
pub mod resource;

pub use error::{ModelError, Result};
pub use resource::{Meta, Resource};
