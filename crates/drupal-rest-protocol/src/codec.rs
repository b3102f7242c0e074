//! Codec trait and the JSON implementation.
//!
//! A "codec" (coder/decoder) converts between records and raw bytes. The
//! session and resource layers only depend on the [`Codec`] trait, so tests
//! and alternative formats can swap the implementation without touching
//! them.

use serde::{Serialize, de::DeserializeOwned};

use crate::ProtocolError;

/// A codec that can encode records to bytes and decode bytes back.
///
/// `Send + Sync + 'static` because a codec lives inside long-lived client
/// handles that are shared across tokio tasks.
pub trait Codec: Send + Sync + 'static {
    /// Serializes a value into bytes.
    ///
    /// # Errors
    /// Returns `ProtocolError::Encode` if serialization fails.
    fn encode<T: Serialize>(
        &self,
        value: &T,
    ) -> Result<Vec<u8>, ProtocolError>;

    /// Deserializes bytes back into a value.
    ///
    /// # Errors
    /// Returns `ProtocolError::Decode` if the bytes are malformed or don't
    /// match the expected type.
    fn decode<T: DeserializeOwned>(
        &self,
        data: &[u8],
    ) -> Result<T, ProtocolError>;
}

// ---------------------------------------------------------------------------
// JsonCodec
// ---------------------------------------------------------------------------

/// A [`Codec`] that uses JSON (via `serde_json`), the only format the
/// services module is configured to speak here.
///
/// ## Example
///
/// ```rust
/// use drupal_rest_protocol::{Codec, JsonCodec, SessionPayload};
///
/// let codec = JsonCodec;
/// let payload: SessionPayload = codec
///     .decode(br#"{"token":"T1","user":{"uid":"5"}}"#)
///     .unwrap();
///
/// assert_eq!(payload.token.as_deref(), Some("T1"));
/// assert_eq!(payload.user.unwrap().uid.unwrap().0, 5);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl Codec for JsonCodec {
    fn encode<T: Serialize>(
        &self,
        value: &T,
    ) -> Result<Vec<u8>, ProtocolError> {
        serde_json::to_vec(value).map_err(ProtocolError::Encode)
    }

    fn decode<T: DeserializeOwned>(
        &self,
        data: &[u8],
    ) -> Result<T, ProtocolError> {
        serde_json::from_slice(data).map_err(ProtocolError::Decode)
    }
}
