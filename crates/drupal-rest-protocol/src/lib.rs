//! Wire protocol for the Drupal services REST API.
//!
//! This crate defines what travels between the client and a Drupal 7
//! "services" endpoint:
//!
//! - **Types** ([`SessionPayload`], [`User`], [`Node`], [`NodeDraft`], etc.):
//!   the JSON records the server sends and accepts.
//! - **Endpoints** ([`endpoints`]): the resource paths, relative to the
//!   configured API base.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]): how those records are
//!   converted to/from bytes.
//! - **Errors** ([`ProtocolError`]): what can go wrong during
//!   encoding/decoding.
//!
//! # Architecture
//!
//! The protocol layer sits between transport (raw HTTP bodies) and the
//! session and resource layers. It doesn't know about cookies or URLs;
//! it only knows the shape of the messages.
//!
//! ```text
//! Transport (bytes) → Protocol (records) → Session / Resources
//! ```

mod codec;
mod de;
pub mod endpoints;
mod error;
mod types;

pub use codec::{Codec, JsonCodec};
pub use error::ProtocolError;
pub use types::{
    Credentials, EmptyBody, Node, NodeCreated, NodeDraft, NodeId, NodeQuery,
    SessionPayload, User, UserId,
};
