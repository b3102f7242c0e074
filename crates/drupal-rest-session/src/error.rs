//! Error types for the session layer.

use drupal_rest_protocol::ProtocolError;
use drupal_rest_transport::TransportError;

/// Why a session request failed.
///
/// These never leave [`AccountManager`](crate::AccountManager): its
/// operations swallow them after logging, so a caller only ever observes
/// an unchanged session.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Network failure or non-2xx status.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The request body could not be encoded.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
}
