//! Opaque FHIR resource domain objects.
//!
//! This module defines the [`Resource`] type, the unit of clinical content
//! that crosses the persistence boundary. The store does not interpret the
//! clinical schema; it only relies on the small structural contract enforced
//! here (a JSON object with a string `resourceType`) and on the [`Meta`]
//! block that carries versioning metadata inside the resource itself.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{ModelError, Result};
use crate::json;

/// A FHIR resource treated as an opaque domain object.
///
/// A `Resource` wraps the parsed JSON body of a clinical record. Construction
/// validates only the structural minimum every FHIR resource shares - the
/// body is an object and names its type - and leaves the clinical schema to
/// the profile tooling upstream.
///
/// # Examples
///
/// ```
/// use meridian_fhir::Resource;
///
/// let patient = Resource::from_json(
///     r#"{"resourceType": "Patient", "id": "42", "active": true}"#,
/// ).unwrap();
///
/// assert_eq!(patient.type_name(), "Patient");
/// assert_eq!(patient.id(), Some("42"));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Resource {
    body: Value,
}

impl Resource {
    /// Wraps an already-parsed JSON value as a resource.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::InvalidResource`] if the value is not an object
    /// or lacks a non-empty string `resourceType`.
    pub fn from_value(body: Value) -> Result<Self> {
        let object = body
            .as_object()
            .ok_or_else(|| ModelError::InvalidResource("content is not a JSON object".into()))?;

        match object.get("resourceType").and_then(Value::as_str) {
            Some(type_name) if !type_name.is_empty() => Ok(Self { body }),
            Some(_) => Err(ModelError::InvalidResource("resourceType is empty".into())),
            None => Err(ModelError::InvalidResource(
                "resourceType is missing or not a string".into(),
            )),
        }
    }

    /// Parses a resource from JSON interchange text.
    pub fn from_json(text: &str) -> Result<Self> {
        Self::from_value(json::from_json_str(text)?)
    }

    /// Serializes the resource to JSON interchange text.
    pub fn to_json(&self) -> Result<String> {
        json::to_json_string(&self.body)
    }

    /// Returns the resource type name (e.g., "Patient").
    pub fn type_name(&self) -> &str {
        // from_value guarantees presence
        self.body
            .get("resourceType")
            .and_then(Value::as_str)
            .unwrap_or_default()
    }

    /// Returns the resource's logical ID, if it has one.
    pub fn id(&self) -> Option<&str> {
        self.body.get("id").and_then(Value::as_str)
    }

    /// Returns the resource body as JSON.
    pub fn as_value(&self) -> &Value {
        &self.body
    }

    /// Returns a mutable reference to the resource body.
    pub fn as_value_mut(&mut self) -> &mut Value {
        &mut self.body
    }

    /// Consumes self and returns the body.
    pub fn into_value(self) -> Value {
        self.body
    }

    /// Returns the resource's `meta` block, if present and well-formed.
    pub fn meta(&self) -> Option<Meta> {
        let meta = self.body.get("meta")?.clone();
        json::from_json_value(meta).ok()
    }

    /// Ensures the resource has a `meta` object, creating an empty one if absent.
    pub fn ensure_meta(&mut self) {
        let object = match self.body.as_object_mut() {
            Some(object) => object,
            None => return,
        };
        if !object.get("meta").is_some_and(Value::is_object) {
            object.insert("meta".to_string(), Value::Object(Map::new()));
        }
    }

    /// Sets `meta.lastUpdated` to the given instant, creating the meta block
    /// if the resource has none.
    ///
    /// The instant is written in the FHIR `instant` wire form (RFC 3339 with
    /// millisecond precision, UTC offset `Z`).
    pub fn set_last_updated(&mut self, when: DateTime<Utc>) {
        self.ensure_meta();
        if let Some(meta) = self.body.get_mut("meta").and_then(Value::as_object_mut) {
            meta.insert(
                "lastUpdated".to_string(),
                Value::String(when.to_rfc3339_opts(SecondsFormat::Millis, true)),
            );
        }
    }

    /// Returns `meta.lastUpdated` as a UTC instant, if present and parseable.
    pub fn last_updated(&self) -> Option<DateTime<Utc>> {
        let raw = self
            .body
            .get("meta")?
            .get("lastUpdated")?
            .as_str()?;
        DateTime::parse_from_rfc3339(raw)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }
}

/// FHIR `Meta` element: the versioning metadata a resource carries about itself.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Meta {
    /// The version ID.
    #[serde(rename = "versionId", skip_serializing_if = "Option::is_none")]
    pub version_id: Option<String>,

    /// The last update timestamp.
    #[serde(rename = "lastUpdated", skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_from_value_requires_object() {
        let err = Resource::from_value(json!(["not", "an", "object"])).unwrap_err();
        assert!(matches!(err, ModelError::InvalidResource(_)));
    }

    #[test]
    fn test_from_value_requires_resource_type() {
        let err = Resource::from_value(json!({"id": "42"})).unwrap_err();
        assert!(err.to_string().contains("resourceType"));

        let err = Resource::from_value(json!({"resourceType": 7})).unwrap_err();
        assert!(matches!(err, ModelError::InvalidResource(_)));

        let err = Resource::from_value(json!({"resourceType": ""})).unwrap_err();
        assert!(matches!(err, ModelError::InvalidResource(_)));
    }

    #[test]
    fn test_accessors() {
        let resource = Resource::from_value(json!({
            "resourceType": "Observation",
            "id": "obs-1",
            "status": "final",
        }))
        .unwrap();

        assert_eq!(resource.type_name(), "Observation");
        assert_eq!(resource.id(), Some("obs-1"));
        assert_eq!(resource.as_value()["status"], "final");
    }

    #[test]
    fn test_json_roundtrip() {
        let text = r#"{"resourceType":"Patient","id":"42","active":true}"#;
        let resource = Resource::from_json(text).unwrap();
        let reparsed = Resource::from_json(&resource.to_json().unwrap()).unwrap();
        assert_eq!(resource, reparsed);
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        assert!(Resource::from_json("{not json").is_err());
    }

    #[test]
    fn test_ensure_meta_is_idempotent() {
        let mut resource =
            Resource::from_value(json!({"resourceType": "Patient", "id": "42"})).unwrap();
        assert!(resource.meta().is_none());

        resource.ensure_meta();
        resource.ensure_meta();
        assert_eq!(resource.as_value()["meta"], json!({}));
    }

    #[test]
    fn test_set_last_updated() {
        let mut resource =
            Resource::from_value(json!({"resourceType": "Patient", "id": "42"})).unwrap();
        let when = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();

        resource.set_last_updated(when);

        assert_eq!(resource.last_updated(), Some(when));
        assert_eq!(
            resource.as_value()["meta"]["lastUpdated"],
            "2024-01-01T00:00:00.000Z"
        );
    }

    #[test]
    fn test_set_last_updated_preserves_existing_meta_fields() {
        let mut resource = Resource::from_value(json!({
            "resourceType": "Patient",
            "id": "42",
            "meta": {"versionId": "3"},
        }))
        .unwrap();
        let when = Utc.with_ymd_and_hms(2024, 6, 1, 12, 30, 0).unwrap();

        resource.set_last_updated(when);

        let meta = resource.meta().unwrap();
        assert_eq!(meta.version_id.as_deref(), Some("3"));
        assert_eq!(meta.last_updated, Some(when));
    }

    #[test]
    fn test_last_updated_normalizes_offset_to_utc() {
        let resource = Resource::from_value(json!({
            "resourceType": "Patient",
            "meta": {"lastUpdated": "2024-01-01T02:00:00+02:00"},
        }))
        .unwrap();

        let when = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(resource.last_updated(), Some(when));
    }
}
