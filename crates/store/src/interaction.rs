//! Interactions: the unit of versioned work.
//!
//! An [`Interaction`] combines an addressing key, an operation kind, and a
//! version timestamp with an optional resource payload. One interaction
//! corresponds to exactly one persisted document; successive interactions on
//! the same logical resource share a type name and resource ID but differ by
//! version ID and timestamp.

use chrono::{DateTime, Utc};
use meridian_fhir::Resource;
use serde::{Deserialize, Serialize};

use crate::key::ResourceKey;

/// Operation kind that produced a resource version.
///
/// The enumeration is closed and carries an explicit wire code; stored
/// documents record the code, and unknown codes are rejected at the envelope
/// boundary rather than deserialized into an invalid value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Method {
    /// A new resource was created.
    Create,
    /// An existing resource was replaced with a new version.
    Update,
    /// The resource was deleted; the version is a contentless marker.
    Delete,
}

impl Method {
    /// Returns the integer code stored in the envelope.
    pub fn code(self) -> i64 {
        match self {
            Method::Create => 0,
            Method::Update => 1,
            Method::Delete => 2,
        }
    }

    /// Maps a wire code back to an operation kind.
    ///
    /// Returns `None` for codes outside the closed enumeration.
    pub fn from_code(code: i64) -> Option<Method> {
        match code {
            0 => Some(Method::Create),
            1 => Some(Method::Update),
            2 => Some(Method::Delete),
            _ => None,
        }
    }

    /// Returns `true` if versions produced by this operation carry no
    /// resource body.
    pub fn is_contentless(self) -> bool {
        matches!(self, Method::Delete)
    }
}

/// One versioned read/write event: a key, an operation kind, a timestamp,
/// and optional resource content.
///
/// Interactions are immutable once constructed, except for the single
/// metadata-stamping step ([`crate::envelope::stamp_version_date`]) that
/// sets the version timestamp and cascades it into the attached resource.
#[derive(Debug, Clone, PartialEq)]
pub struct Interaction {
    key: ResourceKey,
    method: Method,
    when: DateTime<Utc>,
    resource: Option<Resource>,
}

impl Interaction {
    /// Creates an interaction with no resource payload.
    pub fn new(key: ResourceKey, method: Method, when: DateTime<Utc>) -> Self {
        Self {
            key,
            method,
            when,
            resource: None,
        }
    }

    /// Attaches a resource payload.
    pub fn with_resource(mut self, resource: Resource) -> Self {
        self.resource = Some(resource);
        self
    }

    /// Returns the addressing key.
    pub fn key(&self) -> &ResourceKey {
        &self.key
    }

    /// Returns the operation kind.
    pub fn method(&self) -> Method {
        self.method
    }

    /// Returns the UTC timestamp of this version.
    pub fn when(&self) -> DateTime<Utc> {
        self.when
    }

    /// Returns the resource payload, if any.
    pub fn resource(&self) -> Option<&Resource> {
        self.resource.as_ref()
    }

    /// Consumes self and returns the resource payload, if any.
    pub fn into_resource(self) -> Option<Resource> {
        self.resource
    }

    /// Returns `true` iff this interaction denotes present content - i.e.,
    /// a resource body should exist and be parsed for it.
    pub fn is_present(&self) -> bool {
        !self.method.is_contentless()
    }

    pub(crate) fn set_when(&mut self, when: DateTime<Utc>) {
        self.when = when;
    }

    pub(crate) fn resource_mut(&mut self) -> Option<&mut Resource> {
        self.resource.as_mut()
    }

    pub(crate) fn set_resource(&mut self, resource: Resource) {
        self.resource = Some(resource);
    }
}
