//! Error types for the protocol layer.
//!
//! Each crate in the workspace defines its own error enum. When you see a
//! `ProtocolError`, the problem is in the shape of a message, not in
//! networking or session handling.

/// Errors that can occur in the protocol layer.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serialization failed (turning a record into bytes).
    #[error("encode failed: {0}")]
    Encode(#[source] serde_json::Error),

    /// Deserialization failed (turning a response body into a record).
    ///
    /// Common causes: an HTML error page where JSON was expected, missing
    /// required fields, or ids that are neither numbers nor numeric
    /// strings.
    #[error("decode failed: {0}")]
    Decode(#[source] serde_json::Error),
}
