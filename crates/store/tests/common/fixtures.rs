//! Test fixtures for the persistence core.
//!
//! Provides a small builder for patient records plus helpers for the
//! interactions the tests write through the codec.

#![allow(dead_code)]

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use serde_json::{Value, json};

use meridian_fhir::Resource;
use meridian_store::clock::FixedClock;
use meridian_store::{DocumentCodec, Interaction, Method, ResourceKey};

/// A patient fixture for testing.
#[derive(Debug, Clone)]
pub struct PatientFixture {
    /// Patient ID.
    pub id: String,
    /// Patient family name.
    pub family: String,
    /// Patient given names.
    pub given: Vec<String>,
    /// Birth date (YYYY-MM-DD format).
    pub birth_date: Option<String>,
    /// Whether the patient is active.
    pub active: bool,
}

impl PatientFixture {
    /// Creates a new patient fixture with minimal required fields.
    pub fn new(id: impl Into<String>, family: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            family: family.into(),
            given: vec![],
            birth_date: None,
            active: true,
        }
    }

    /// Sets given names.
    pub fn with_given(mut self, given: Vec<&str>) -> Self {
        self.given = given.into_iter().map(String::from).collect();
        self
    }

    /// Sets birth date.
    pub fn with_birth_date(mut self, date: impl Into<String>) -> Self {
        self.birth_date = Some(date.into());
        self
    }

    /// Sets active status.
    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    /// Converts to FHIR JSON.
    pub fn to_json(&self) -> Value {
        let mut patient = json!({
            "resourceType": "Patient",
            "id": self.id,
            "active": self.active,
            "name": [{
                "family": self.family,
                "given": self.given,
            }],
        });

        if let Some(birth_date) = &self.birth_date {
            patient["birthDate"] = json!(birth_date);
        }

        patient
    }

    /// Converts to a domain resource.
    pub fn to_resource(&self) -> Resource {
        Resource::from_value(self.to_json()).expect("fixture is a valid resource")
    }

    /// Builds the storage key for a specific version of this patient.
    pub fn key(&self, version_id: &str) -> ResourceKey {
        ResourceKey::new("Patient")
            .with_resource_id(&self.id)
            .with_version_id(version_id)
    }

    /// Builds a write interaction for a specific version of this patient.
    pub fn interaction(&self, method: Method, version_id: &str) -> Interaction {
        Interaction::new(self.key(version_id), method, default_when()).with_resource(self.to_resource())
    }
}

/// The fixed instant used by deterministic tests.
pub fn default_when() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
}

/// A codec frozen at [`default_when`].
pub fn fixed_codec() -> DocumentCodec {
    fixed_codec_at(default_when())
}

/// A codec frozen at the given instant.
pub fn fixed_codec_at(when: DateTime<Utc>) -> DocumentCodec {
    DocumentCodec::new(Arc::new(FixedClock(when)))
}
