//! The metadata envelope: attaching and stripping storage metadata.
//!
//! This module is the single place where versioning and lifecycle metadata
//! is joined to or removed from a generic document. On the write path,
//! [`attach`] injects the reserved fields that make a document addressable
//! (primary key, type name, resource ID, version ID) and auditable (method,
//! timestamp, lifecycle state). On the read path, [`extract`] reconstructs
//! the [`Interaction`] those fields describe and strips them, leaving a
//! metadata-free resource body for the content codec.
//!
//! Both directions are pure: they consume a document and return a new one,
//! so a caller retaining the original reference never observes aliased
//! mutation.
//!
//! # Reserved fields
//!
//! | field | type | meaning |
//! |---|---|---|
//! | `_id` | string | `"{type}/{id}"` canonical lookup token |
//! | `@when` | RFC 3339 string | version creation time (UTC) |
//! | `@state` | string | lifecycle marker (`current` / `superseded`) |
//! | `@versionId` | string | version identifier |
//! | `@typeName` | string | resource type |
//! | `@resourceId` | string | logical resource identifier |
//! | `@method` | integer | operation-kind wire code |
//! | `@transaction` | any | in-flight transaction marker (written elsewhere) |
//!
//! The first seven are written by [`attach`]. `@transaction` is placed by
//! transaction-bundle orchestration outside this core, but it lives in the
//! reserved namespace and is cleared on extraction with the rest, so no
//! reserved name can ever leak into a parsed resource body.

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Map, Value};

use crate::error::{StoreError, StoreResult};
use crate::interaction::{Interaction, Method};
use crate::key::ResourceKey;

/// Reserved field names of the storage envelope.
pub mod field {
    /// Canonical `"{type}/{id}"` lookup token; the document's primary key.
    pub const PRIMARY_KEY: &str = "_id";
    /// Version creation time, RFC 3339.
    pub const WHEN: &str = "@when";
    /// Lifecycle state marker.
    pub const STATE: &str = "@state";
    /// Version identifier.
    pub const VERSION_ID: &str = "@versionId";
    /// Resource type name.
    pub const TYPE_NAME: &str = "@typeName";
    /// Logical resource identifier.
    pub const RESOURCE_ID: &str = "@resourceId";
    /// Operation-kind wire code.
    pub const METHOD: &str = "@method";
    /// In-flight transaction marker.
    pub const TRANSACTION: &str = "@transaction";

    /// The seven fields written by [`super::attach`], and copied by
    /// [`super::transfer`].
    pub const ATTACHED: &[&str] = &[
        PRIMARY_KEY,
        WHEN,
        STATE,
        VERSION_ID,
        TYPE_NAME,
        RESOURCE_ID,
        METHOD,
    ];

    /// The full reserved namespace cleared by extraction.
    pub const RESERVED: &[&str] = &[
        PRIMARY_KEY,
        WHEN,
        STATE,
        VERSION_ID,
        TYPE_NAME,
        RESOURCE_ID,
        METHOD,
        TRANSACTION,
    ];
}

/// Lifecycle state of a stored document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentState {
    /// The latest version of its logical resource.
    Current,
    /// Replaced by a newer version.
    Superseded,
}

impl DocumentState {
    /// Returns the wire value stored in the envelope.
    pub fn as_str(self) -> &'static str {
        match self {
            DocumentState::Current => "current",
            DocumentState::Superseded => "superseded",
        }
    }

    /// Parses a wire value back into a state.
    pub fn parse(value: &str) -> Option<DocumentState> {
        match value {
            "current" => Some(DocumentState::Current),
            "superseded" => Some(DocumentState::Superseded),
            _ => None,
        }
    }
}

/// Attaches storage metadata to a document, returning the enveloped copy.
///
/// Writes the seven reserved fields: the operation code, the primary-key
/// token (`key.relative_path()`), the three key components, the supplied
/// UTC instant, and the `current` lifecycle marker.
///
/// The interaction's key must satisfy the storage-validity invariant. This
/// is a hard precondition, not a best-effort default: a document missing any
/// of type/resource/version identifiers could not be unambiguously retrieved
/// or versioned later.
///
/// # Errors
///
/// * [`StoreError::InvalidKey`] - the key has a base or lacks a component.
/// * [`StoreError::MalformedEnvelope`] - the document is not a JSON object.
pub fn attach(document: Value, interaction: &Interaction, when: DateTime<Utc>) -> StoreResult<Value> {
    let key = interaction.key();
    let Some((type_name, resource_id, version_id)) = key.storage_parts() else {
        return Err(StoreError::InvalidKey { key: key.clone() });
    };

    let mut object = into_object(document)?;
    object.insert(
        field::METHOD.to_string(),
        Value::from(interaction.method().code()),
    );
    object.insert(
        field::PRIMARY_KEY.to_string(),
        Value::String(key.relative_path()),
    );
    object.insert(
        field::TYPE_NAME.to_string(),
        Value::String(type_name.to_string()),
    );
    object.insert(
        field::RESOURCE_ID.to_string(),
        Value::String(resource_id.to_string()),
    );
    object.insert(
        field::VERSION_ID.to_string(),
        Value::String(version_id.to_string()),
    );
    object.insert(field::WHEN.to_string(), Value::String(format_when(when)));
    object.insert(
        field::STATE.to_string(),
        Value::String(DocumentState::Current.as_str().to_string()),
    );
    Ok(Value::Object(object))
}

/// Extracts the interaction a stored document describes, and strips the
/// reserved fields from it.
///
/// Metadata is read out before the document is stripped: the version
/// timestamp (any RFC 3339 offset, normalized to UTC), the addressing key
/// reconstructed from its three components, and the operation kind mapped
/// through its wire code. The returned interaction has no resource attached;
/// whether the remaining body should be parsed is the caller's decision,
/// driven by [`Interaction::is_present`].
///
/// # Errors
///
/// [`StoreError::MalformedEnvelope`] when a required reserved field is
/// missing or wrong-typed, the timestamp does not parse, or the method code
/// is outside the closed enumeration. A corrupt envelope is never patched
/// over with defaults - a resource reconstructed with a wrong type or
/// missing version is unsafe to serve.
pub fn extract(document: Value) -> StoreResult<(Interaction, Value)> {
    let mut object = into_object(document)?;

    let when = parse_when(&require_string(&object, field::WHEN)?)?;
    let type_name = require_string(&object, field::TYPE_NAME)?;
    let resource_id = require_string(&object, field::RESOURCE_ID)?;
    let version_id = require_string(&object, field::VERSION_ID)?;
    let code = require_integer(&object, field::METHOD)?;
    let method = Method::from_code(code).ok_or_else(|| {
        StoreError::malformed_envelope(field::METHOD, format!("unknown operation code {}", code))
    })?;

    for name in field::RESERVED {
        object.remove(*name);
    }

    let key = ResourceKey::new(type_name)
        .with_resource_id(resource_id)
        .with_version_id(version_id);
    Ok((Interaction::new(key, method, when), Value::Object(object)))
}

/// Copies the seven attach-written envelope fields verbatim from one
/// document onto another, leaving resource-body fields untouched.
///
/// Used when duplicating a stored record - producing a copy that reuses
/// identity fields - without re-deriving metadata.
///
/// # Errors
///
/// [`StoreError::MalformedEnvelope`] when the source lacks one of the seven
/// fields, or either document is not a JSON object.
pub fn transfer(from: &Value, to: Value) -> StoreResult<Value> {
    let source = from.as_object().ok_or_else(|| {
        StoreError::malformed_envelope(field::PRIMARY_KEY, "source document is not a JSON object")
    })?;
    let mut target = into_object(to)?;

    for name in field::ATTACHED {
        let value = source
            .get(*name)
            .ok_or_else(|| StoreError::malformed_envelope(name, "missing from source document"))?;
        target.insert((*name).to_string(), value.clone());
    }
    Ok(Value::Object(target))
}

/// Stamps the version timestamp onto an interaction.
///
/// Sets `interaction.when`, and - when a resource is attached - cascades the
/// same instant into the resource's `meta.lastUpdated`, creating the meta
/// block if absent. A resource's self-reported modification time and its
/// storage-version time are the same logical event; they must never diverge.
pub fn stamp_version_date(interaction: &mut Interaction, when: DateTime<Utc>) {
    interaction.set_when(when);
    if let Some(resource) = interaction.resource_mut() {
        resource.set_last_updated(when);
    }
}

/// Serializes an instant in the envelope wire form.
fn format_when(when: DateTime<Utc>) -> String {
    when.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn parse_when(raw: &str) -> StoreResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|err| {
            StoreError::malformed_envelope(field::WHEN, format!("not an RFC 3339 instant: {}", err))
        })
}

fn into_object(document: Value) -> StoreResult<Map<String, Value>> {
    match document {
        Value::Object(object) => Ok(object),
        other => Err(StoreError::malformed_envelope(
            field::PRIMARY_KEY,
            format!("document is not a JSON object (found {})", kind_of(&other)),
        )),
    }
}

fn require_string(object: &Map<String, Value>, name: &'static str) -> StoreResult<String> {
    match object.get(name) {
        Some(Value::String(value)) => Ok(value.clone()),
        Some(other) => Err(StoreError::malformed_envelope(
            name,
            format!("expected a string, found {}", kind_of(other)),
        )),
        None => Err(StoreError::malformed_envelope(name, "missing")),
    }
}

fn require_integer(object: &Map<String, Value>, name: &'static str) -> StoreResult<i64> {
    match object.get(name) {
        Some(Value::Number(value)) => value.as_i64().ok_or_else(|| {
            StoreError::malformed_envelope(name, format!("not an integer: {}", value))
        }),
        Some(other) => Err(StoreError::malformed_envelope(
            name,
            format!("expected an integer, found {}", kind_of(other)),
        )),
        None => Err(StoreError::malformed_envelope(name, "missing")),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
