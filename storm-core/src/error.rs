//! Error types for the Storm API client

use thiserror::Error;

/// Core error type for Storm API operations
#[derive(Error, Debug)]
pub enum StormError {
    /// Invalid input or arguments
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The API reported a fault inside an otherwise successful response
    #[error("API fault ({class}): {message}")]
    Api { class: String, message: String },

    /// Method group not present in the documentation catalog
    #[error("Unknown method group: {0}")]
    GroupNotFound(String),

    /// Method not present in the documentation catalog
    #[error("Unknown method: {0}")]
    MethodNotFound(String),

    /// Method exists but takes no parameters
    #[error("Method takes no parameters: {0}")]
    NoParams(String),

    /// Response body was not the expected shape
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for Storm API operations
pub type Result<T> = std::result::Result<T, StormError>;

impl From<serde_json::Error> for StormError {
    fn from(err: serde_json::Error) -> Self {
        StormError::Serialization(err.to_string())
    }
}
