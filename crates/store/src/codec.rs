//! Resource codec and the combined read/write paths.
//!
//! The resource codec maps a domain [`Resource`] to and from the generic
//! document shape, independent of any storage metadata. It owns one
//! pre-processing rule: before a resource is serialized for storage, a
//! redaction pass removes embedded extension data that is only meaningful on
//! the wire, so the persisted body carries no display-time artifacts.
//!
//! [`DocumentCodec`] composes the resource codec with the metadata envelope
//! into the two paths the storage engine sees: [`DocumentCodec::to_document`]
//! (the only path by which a document is ever written) and
//! [`DocumentCodec::from_document`].

use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::warn;

use meridian_fhir::{ModelError, Resource};

use crate::clock::{Clock, SystemClock};
use crate::envelope;
use crate::error::{StoreError, StoreResult};
use crate::interaction::Interaction;

/// Extension URL prefixes that are redacted before a resource is persisted.
///
/// Rendering extensions carry display-time presentation hints; their values
/// are meaningful on the wire, not in a stored record.
pub const WIRE_ONLY_EXTENSION_PREFIXES: &[&str] =
    &["http://hl7.org/fhir/StructureDefinition/rendering-"];

/// Encodes a resource into the generic document shape.
///
/// Absence is valid: a contentless interaction (e.g., a deletion marker)
/// encodes to an empty document, not an error. A present resource is
/// redacted, serialized to interchange text, and the text parsed into the
/// document shape.
pub fn encode_resource(resource: Option<&Resource>) -> StoreResult<Value> {
    let Some(resource) = resource else {
        return Ok(Value::Object(Map::new()));
    };

    let mut redacted = resource.clone();
    redact(&mut redacted);

    let text = redacted
        .to_json()
        .map_err(|source| StoreError::MalformedContent { source })?;
    let document: Value = meridian_fhir::json::from_json_str(&text)
        .map_err(|source| StoreError::MalformedContent { source })?;
    Ok(document)
}

/// Decodes an envelope-stripped document body into a domain resource.
///
/// The body is serialized back to interchange text and parsed through the
/// resource-model parser. Malformed content is a decode failure wrapped with
/// context - callers can distinguish "stored record has invalid content"
/// from a corrupt envelope, and both from "record not found".
pub fn decode_resource(document: Value) -> StoreResult<Resource> {
    let text = meridian_fhir::json::to_json_string(&document)
        .map_err(|source| StoreError::MalformedContent { source })?;
    Resource::from_json(&text).map_err(|source| StoreError::MalformedContent { source })
}

/// Removes wire-only extension data from a resource, recursively.
///
/// Extension entries (in `extension` and `modifierExtension` arrays at any
/// depth) whose `url` starts with one of the
/// [`WIRE_ONLY_EXTENSION_PREFIXES`] are dropped; an array emptied by the
/// removal is dropped with them. Everything else is left byte-identical.
pub fn redact(resource: &mut Resource) {
    redact_value(resource.as_value_mut());
}

fn redact_value(value: &mut Value) {
    match value {
        Value::Object(object) => {
            for name in ["extension", "modifierExtension"] {
                let emptied = match object.get_mut(name) {
                    Some(Value::Array(entries)) => {
                        let before = entries.len();
                        entries.retain(|entry| !is_wire_only(entry));
                        before > 0 && entries.is_empty()
                    }
                    _ => false,
                };
                if emptied {
                    object.remove(name);
                }
            }
            for (_, child) in object.iter_mut() {
                redact_value(child);
            }
        }
        Value::Array(entries) => {
            for entry in entries {
                redact_value(entry);
            }
        }
        _ => {}
    }
}

fn is_wire_only(extension: &Value) -> bool {
    extension
        .get("url")
        .and_then(Value::as_str)
        .is_some_and(|url| {
            WIRE_ONLY_EXTENSION_PREFIXES
                .iter()
                .any(|prefix| url.starts_with(prefix))
        })
}

/// Translator between interactions and self-contained storage documents.
///
/// Holds the injected [`Clock`] that supplies version timestamps, so
/// timestamp-dependent behavior is deterministic under test.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use chrono::{TimeZone, Utc};
/// use meridian_fhir::Resource;
/// use meridian_store::clock::FixedClock;
/// use meridian_store::{DocumentCodec, Interaction, Method, ResourceKey};
///
/// let when = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
/// let codec = DocumentCodec::new(Arc::new(FixedClock(when)));
///
/// let key = ResourceKey::new("Patient")
///     .with_resource_id("42")
///     .with_version_id("1");
/// let resource = Resource::from_json(r#"{"resourceType": "Patient", "id": "42"}"#).unwrap();
/// let mut interaction = Interaction::new(key, Method::Update, when).with_resource(resource);
///
/// let document = codec.to_document(&mut interaction).unwrap();
/// assert_eq!(document["_id"], "Patient/42");
///
/// let read_back = codec.from_document(document).unwrap();
/// assert_eq!(read_back.key(), interaction.key());
/// assert_eq!(read_back.when(), when);
/// ```
#[derive(Clone)]
pub struct DocumentCodec {
    clock: Arc<dyn Clock>,
}

impl DocumentCodec {
    /// Creates a codec with the given clock.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }

    /// Creates a codec driven by the system wall clock.
    pub fn system() -> Self {
        Self::new(Arc::new(SystemClock))
    }

    /// Translates an interaction into a single self-contained document ready
    /// for the storage engine.
    ///
    /// Reads the clock once, stamps the interaction (and, through the
    /// cascade, the attached resource's `meta.lastUpdated`) with that
    /// instant, encodes the resource body, and attaches the envelope. The
    /// output is written as one atomic unit by the storage layer.
    ///
    /// # Errors
    ///
    /// * [`StoreError::InvalidKey`] - the interaction's key is not
    ///   storage-valid.
    /// * [`StoreError::MalformedContent`] - the resource failed to encode.
    pub fn to_document(&self, interaction: &mut Interaction) -> StoreResult<Value> {
        let when = self.clock.now();
        envelope::stamp_version_date(interaction, when);
        let body = encode_resource(interaction.resource())?;
        envelope::attach(body, interaction, when)
    }

    /// Reconstructs an interaction from a stored document.
    ///
    /// Metadata is extracted first; only when the resulting interaction
    /// denotes present content does the body decode run. Deletion markers
    /// carry no resource body and must not attempt to parse one. An empty
    /// body on an interaction that should have content is corrupt, not
    /// absent.
    ///
    /// # Errors
    ///
    /// * [`StoreError::MalformedEnvelope`] - reserved fields missing or
    ///   wrong-typed.
    /// * [`StoreError::MalformedContent`] - the body is empty or fails to
    ///   parse as a resource.
    pub fn from_document(&self, document: Value) -> StoreResult<Interaction> {
        let (mut interaction, body) = envelope::extract(document).inspect_err(|err| {
            warn!(error = %err, "stored document has a corrupt envelope");
        })?;

        if interaction.is_present() {
            if body.as_object().is_some_and(Map::is_empty) {
                warn!(key = %interaction.key(), "stored document has no resource body");
                return Err(StoreError::MalformedContent {
                    source: ModelError::InvalidResource(
                        "document has no resource body after metadata removal".into(),
                    ),
                });
            }
            let resource = decode_resource(body).inspect_err(|err| {
                warn!(key = %interaction.key(), error = %err, "stored document failed to decode");
            })?;
            interaction.set_resource(resource);
        }

        Ok(interaction)
    }
}

impl Default for DocumentCodec {
    fn default() -> Self {
        Self::system()
    }
}
