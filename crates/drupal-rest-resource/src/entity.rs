//! The `Entity` trait: what a resource collection holds.

use std::fmt::Display;

use drupal_rest_protocol::{Node, NodeId, User, UserId, endpoints};
use serde::de::DeserializeOwned;

/// A record type served by one resource collection.
///
/// The associated `Id` is what appears in item paths
/// (`<COLLECTION>/<id>`), so it must print as a bare path segment.
pub trait Entity: DeserializeOwned + Send + 'static {
    /// Collection path under the API base, e.g. `node`.
    const COLLECTION: &'static str;

    /// Identifier type used in item paths.
    type Id: Display + Copy + Send + Sync + 'static;
}

impl Entity for Node {
    const COLLECTION: &'static str = endpoints::NODE;
    type Id = NodeId;
}

impl Entity for User {
    const COLLECTION: &'static str = endpoints::USER;
    type Id = UserId;
}
