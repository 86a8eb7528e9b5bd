//! Resource addressing keys.
//!
//! A [`ResourceKey`] identifies a resource by type name, logical ID, and
//! version ID, independent of how the resource is stored. Keys are built
//! transiently per operation and are never persisted as objects - only their
//! identifying string components are embedded in the storage envelope.

use std::fmt;

use uuid::Uuid;

/// The tuple identifying a specific resource version for storage and retrieval.
///
/// Construction never fails; validity for storage is checked explicitly by
/// callers before persistence via [`ResourceKey::is_valid_for_storage`]. A
/// key is storage-valid only when it carries no origin marker (`base`) and
/// all three identifying components are present - a document missing any of
/// them could not be unambiguously retrieved or versioned later.
///
/// # Examples
///
/// ```
/// use meridian_store::ResourceKey;
///
/// let key = ResourceKey::new("Patient")
///     .with_resource_id("42")
///     .with_version_id("1");
///
/// assert!(key.is_valid_for_storage());
/// assert_eq!(key.relative_path(), "Patient/42");
/// assert_eq!(key.versioned_path(), "Patient/42/_history/1");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ResourceKey {
    base: Option<String>,
    type_name: Option<String>,
    resource_id: Option<String>,
    version_id: Option<String>,
}

impl ResourceKey {
    /// Creates a key for the given resource type, with no ID or version yet.
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            base: None,
            type_name: Some(type_name.into()),
            resource_id: None,
            version_id: None,
        }
    }

    /// Sets the origin/server marker. A key with a base is foreign to this
    /// server and is never valid for storage.
    pub fn with_base(mut self, base: impl Into<String>) -> Self {
        self.base = Some(base.into());
        self
    }

    /// Sets the logical resource ID.
    pub fn with_resource_id(mut self, resource_id: impl Into<String>) -> Self {
        self.resource_id = Some(resource_id.into());
        self
    }

    /// Assigns a freshly generated (UUID v4) logical resource ID.
    ///
    /// Used on create paths where the client did not supply an ID.
    pub fn with_generated_id(mut self) -> Self {
        self.resource_id = Some(Uuid::new_v4().to_string());
        self
    }

    /// Sets the version ID.
    pub fn with_version_id(mut self, version_id: impl Into<String>) -> Self {
        self.version_id = Some(version_id.into());
        self
    }

    /// Returns the origin/server marker, if any.
    pub fn base(&self) -> Option<&str> {
        self.base.as_deref()
    }

    /// Returns the resource type name, if set.
    pub fn type_name(&self) -> Option<&str> {
        self.type_name.as_deref()
    }

    /// Returns the logical resource ID, if set.
    pub fn resource_id(&self) -> Option<&str> {
        self.resource_id.as_deref()
    }

    /// Returns the version ID, if set.
    pub fn version_id(&self) -> Option<&str> {
        self.version_id.as_deref()
    }

    /// Returns the three identifying components iff this key is valid for
    /// storage: no base, and type name, resource ID, and version ID all set.
    pub fn storage_parts(&self) -> Option<(&str, &str, &str)> {
        if self.base.is_some() {
            return None;
        }
        Some((
            self.type_name.as_deref()?,
            self.resource_id.as_deref()?,
            self.version_id.as_deref()?,
        ))
    }

    /// Returns `true` iff this key may be embedded in a storage envelope.
    pub fn is_valid_for_storage(&self) -> bool {
        self.storage_parts().is_some()
    }

    /// Returns the canonical `"{type}/{id}"` lookup token.
    ///
    /// Deterministic given the same identifying components, and independent
    /// of `base`. This is the primary-key value in the storage envelope.
    pub fn relative_path(&self) -> String {
        format!(
            "{}/{}",
            self.type_name.as_deref().unwrap_or_default(),
            self.resource_id.as_deref().unwrap_or_default()
        )
    }

    /// Returns the version-qualified path (e.g., `"Patient/42/_history/1"`).
    pub fn versioned_path(&self) -> String {
        format!(
            "{}/_history/{}",
            self.relative_path(),
            self.version_id.as_deref().unwrap_or_default()
        )
    }
}

impl fmt::Display for ResourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(base) = &self.base {
            write!(f, "{}/", base)?;
        }
        match &self.version_id {
            Some(_) => write!(f, "{}", self.versioned_path()),
            None => write!(f, "{}", self.relative_path()),
        }
    }
}
