//! Error taxonomy for the request pipeline and its collaborators.

use stayscore_proto::ProtoError;
use thiserror::Error;

/// Failure of a call to an external service.
#[derive(Debug, Error)]
pub enum CollaboratorError {
    /// The service answered with a non-success status.
    #[error("{service} responded with status {status}: {body}")]
    Status {
        service: &'static str,
        status: u16,
        body: String,
    },

    /// The request never produced a response (connect, timeout, TLS).
    #[error("{service} request failed: {source}")]
    Request {
        service: &'static str,
        #[source]
        source: reqwest::Error,
    },

    /// The response or stored payload did not have the expected shape.
    #[error("{service} returned an unexpected payload: {detail}")]
    Payload {
        service: &'static str,
        detail: String,
    },

    /// A required setting for the service is missing.
    #[error("{service} is not configured: {detail}")]
    NotConfigured {
        service: &'static str,
        detail: String,
    },
}

/// Errors raised while handling a request.
#[derive(Debug, Error)]
pub enum SkillError {
    /// No route accepts the request.
    #[error("no handler for request type {request_type}")]
    Unhandled { request_type: String },

    /// A value the handler needs is missing from the request.
    #[error("request is missing {0}")]
    MissingSlot(&'static str),

    /// The envelope or session attributes could not be interpreted.
    #[error(transparent)]
    Proto(#[from] ProtoError),

    /// An external service failed and the failure was not isolated.
    #[error(transparent)]
    Collaborator(#[from] CollaboratorError),

    /// A handler or interceptor failed for another reason.
    #[error("{0}")]
    Internal(String),
}

impl SkillError {
    /// Stable name of the error class, used by error handlers and in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            SkillError::Unhandled { .. } => "UnhandledRequest",
            SkillError::MissingSlot(_) => "MissingSlot",
            SkillError::Proto(_) => "InvalidEnvelope",
            SkillError::Collaborator(_) => "CollaboratorFailure",
            SkillError::Internal(_) => "InternalError",
        }
    }
}

pub type Result<T> = std::result::Result<T, SkillError>;
