//! Error types for the resource layer.

use drupal_rest_protocol::ProtocolError;
use drupal_rest_transport::TransportError;

/// Errors that can occur during resource operations.
///
/// Unlike the session flows, resource calls report their failures; the
/// caller decides whether to show them.
#[derive(Debug, thiserror::Error)]
pub enum ResourceError {
    /// Network failure or non-2xx status (403 without a valid
    /// anti-forgery token, 404 for a missing id, ...).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The request could not be encoded or the response did not have the
    /// expected shape.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
}

impl ResourceError {
    /// The HTTP status, when the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ResourceError::Transport(TransportError::Status { status, .. }) => {
                Some(*status)
            }
            _ => None,
        }
    }
}
