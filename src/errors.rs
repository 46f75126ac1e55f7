use thiserror::Error;

use crate::wire::ContentType;

/// Rejected before anything reaches the generation client.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("topic must not be empty")]
    EmptyTopic,
    #[error("{0} does not produce generation requests")]
    NotGenerative(ContentType),
}

/// Anything that goes wrong between sending an instruction and holding a
/// fully decoded response.
#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("missing credentials: {0} is not set")]
    MissingCredentials(&'static str),
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("service error (status {status}): {message}")]
    Service { status: u16, message: String },
    #[error("service returned empty content")]
    EmptyContent,
    #[error("malformed response: {0}")]
    Malformed(String),
    #[error("unknown response type `{0}`")]
    UnknownResponseType(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("a display name is required")]
    MissingName,
    #[error("invalid email address: {0}")]
    InvalidEmail(String),
}
