use crate::ErrorLocation;

use thiserror::Error as ThisError;

/// Raised when the API token is pushed through a serializer.
#[derive(Debug, ThisError)]
pub enum RedactError {
    #[error("Token Serialization Error: {message} {location}")]
    TokenSerialization {
        message: String,
        location: ErrorLocation,
    },
}
