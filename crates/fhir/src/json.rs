//! JSON interchange wrapper functions for FHIR content.
//!
//! This module provides thin wrappers around `serde_json` functions so that
//! callers go through a single interchange-text seam with a uniform error
//! type, rather than depending on `serde_json` directly.
use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Deserialize FHIR content from a JSON string.
///
/// # Examples
///
/// ```
/// use meridian_fhir::json::from_json_str;
/// use serde_json::Value;
///
/// let json = r#"{"resourceType": "Patient", "id": "example"}"#;
/// let value: Value = from_json_str(json).unwrap();
/// assert_eq!(value["resourceType"], "Patient");
/// ```
pub fn from_json_str<'a, T>(s: &'a str) -> Result<T>
where
    T: Deserialize<'a>,
{
    Ok(serde_json::from_str(s)?)
}

/// Serialize FHIR content to a JSON string.
///
/// # Examples
///
/// ```
/// use meridian_fhir::json::to_json_string;
/// use serde_json::json;
///
/// let json = to_json_string(&json!({"resourceType": "Patient"})).unwrap();
/// assert!(json.contains("Patient"));
/// ```
pub fn to_json_string<T>(value: &T) -> Result<String>
where
    T: Serialize + ?Sized,
{
    Ok(serde_json::to_string(value)?)
}

/// Serialize FHIR content to a `serde_json::Value`.
pub fn to_json_value<T>(value: &T) -> Result<serde_json::Value>
where
    T: Serialize + ?Sized,
{
    Ok(serde_json::to_value(value)?)
}

/// Deserialize FHIR content from a `serde_json::Value`.
pub fn from_json_value<T>(value: serde_json::Value) -> Result<T>
where
    T: serde::de::DeserializeOwned,
{
    Ok(serde_json::from_value(value)?)
}
