/// Error types for FHIR resource serialization and deserialization.
#[derive(Debug)]
pub enum ModelError {
    /// JSON serialization or deserialization error
    Json(serde_json::Error),

    /// The content parsed as JSON but is not a structurally valid resource
    /// (e.g., not an object, or missing a string `resourceType`).
    InvalidResource(String),

    /// Custom error message
    Custom(String),
}

impl std::fmt::Display for ModelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModelError::Json(e) => write!(f, "JSON error: {}", e),
            ModelError::InvalidResource(msg) => write!(f, "invalid resource: {}", msg),
            ModelError::Custom(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for ModelError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ModelError::Json(e) => Some(e),
            ModelError::InvalidResource(_) => None,
            ModelError::Custom(_) => None,
        }
    }
}

impl From<serde_json::Error> for ModelError {
    fn from(err: serde_json::Error) -> Self {
        ModelError::Json(err)
    }
}

impl From<String> for ModelError {
    fn from(msg: String) -> Self {
        ModelError::Custom(msg)
    }
}

impl From<&str> for ModelError {
    fn from(msg: &str) -> Self {
        ModelError::Custom(msg.to_string())
    }
}

/// Result type alias for resource model operations
pub type Result<T> = std::result::Result<T, ModelError>;
