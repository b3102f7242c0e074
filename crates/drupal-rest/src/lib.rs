//! # drupal-rest
//!
//! Client for the REST endpoints a Drupal 7 site exposes through the
//! services module.
//!
//! The client keeps the site's view of "who is logged in" in a local
//! session: on start it asks the site for an anti-forgery token, then for
//! the current user, and it updates that session on login and logout. The
//! node and user resources share the session's cookies, so state-changing
//! requests carry the token the site expects.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use drupal_rest::prelude::*;
//!
//! # async fn run() -> Result<(), DrupalError> {
//! let client = DrupalClient::builder()
//!     .config(ClientConfig::from_env()?)
//!     .start()
//!     .await?;
//!
//! if !client.is_authenticated() {
//!     client.login("admin", "secret").await;
//! }
//! if let Page::NodeList { nodes, .. } = client.open(Route::HOME).await? {
//!     for node in nodes {
//!         println!("{} {}", node.nid, node.title);
//!     }
//! }
//! # Ok(())
//! # }
//! ```

mod actions;
mod client;
mod config;
mod error;
mod routes;

pub use actions::Page;
pub use client::{DrupalClient, DrupalClientBuilder};
pub use config::{
    ClientConfig, DEFAULT_ENDPOINT, DEFAULT_IMAGE_ROOT, ENV_ENDPOINT,
    ENV_IMAGE_ROOT, ENV_PAGE_SIZE,
};
pub use error::DrupalError;
pub use routes::Route;

pub use drupal_rest_protocol as protocol;
pub use drupal_rest_resource as resource;
pub use drupal_rest_session as session;
pub use drupal_rest_transport as transport;

pub mod prelude {
    pub use crate::{
        ClientConfig, DrupalClient, DrupalClientBuilder, DrupalError, Page,
        Route,
    };
    pub use drupal_rest_protocol::{Node, NodeId, User, UserId};
    pub use drupal_rest_session::{
        AccountManager, AuthPredicate, Session, SessionConfig, SessionHandle,
    };
    pub use drupal_rest_transport::{HttpTransport, Transport};
}
