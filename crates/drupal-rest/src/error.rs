//! Unified error type for the drupal-rest client.

use drupal_rest_resource::ResourceError;
use drupal_rest_transport::TransportError;

/// Top-level error that wraps all crate-specific errors.
///
/// The `#[from]` attribute on each wrapping variant generates the `From`
/// impl, so `?` converts sub-crate errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum DrupalError {
    /// A transport-level error (bad URL, request failed, HTTP status).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A resource call failed. Decode errors on resource bodies land here
    /// too. Session failures never surface; they only leave the session
    /// unchanged.
    #[error(transparent)]
    Resource(#[from] ResourceError),

    /// The action needs a user in the session and none is held.
    #[error("not logged in")]
    NotLoggedIn,

    /// The client configuration is unusable.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl DrupalError {
    /// The HTTP status, when the server answered with an error.
    pub fn status(&self) -> Option<u16> {
        match self {
            DrupalError::Transport(TransportError::Status { status, .. }) => {
                Some(*status)
            }
            DrupalError::Resource(err) => err.status(),
            _ => None,
        }
    }
}
