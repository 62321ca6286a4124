use thiserror::Error;

use crate::qasm::{ArgumentShapeError, ParseError, SyntaxError};
use crate::qbus::TransportError;

/// Client-level error types.
///
/// Transport and parse failures end the session (see
/// [`breaks_session`](ClientError::breaks_session)); after any other error
/// the session stays usable unless the server has invalidated the token.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Connection, framing or timeout failure.
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// Response text is not a valid QASM message.
    #[error("Malformed response: {0}")]
    Parse(#[from] ParseError),

    /// Outgoing message lacks a required parameter.
    #[error("Invalid request message: {0}")]
    Syntax(#[from] SyntaxError),

    /// Server answered `result=Not-Ok`.
    #[error("Server error: {message}")]
    Protocol {
        /// The server's `error` parameter.
        message: String,
    },

    /// Function arguments do not fit the function's layout.
    #[error("Argument shape error: {0}")]
    ArgumentShape(#[from] ArgumentShapeError),

    /// Operation not valid in the current session state.
    #[error("Session error: {0}")]
    SessionState(&'static str),

    /// Caller supplied an unusable request.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// `Ok` response with a missing or undecodable result parameter.
    #[error("Invalid '{tag}' in response: {reason}")]
    InvalidResponse { tag: &'static str, reason: String },
}

impl ClientError {
    /// Server-side rejection, as opposed to a local or transport failure.
    pub fn is_protocol(&self) -> bool {
        matches!(self, ClientError::Protocol { .. })
    }

    /// The stream can no longer be trusted to pair requests with responses.
    pub fn breaks_session(&self) -> bool {
        matches!(self, ClientError::Transport(_) | ClientError::Parse(_))
    }
}
