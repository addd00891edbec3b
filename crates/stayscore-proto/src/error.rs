use thiserror::Error;

/// Errors raised while interpreting platform payloads.
#[derive(Debug, Error)]
pub enum ProtoError {
    /// The session attribute map does not fit the typed session state.
    #[error("invalid session attributes: {0}")]
    SessionAttributes(String),

    /// The envelope could not be decoded.
    #[error("invalid request envelope: {0}")]
    Envelope(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ProtoError>;
