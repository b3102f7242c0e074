//! Account session management for drupal-rest.
//!
//! This crate owns the client's view of "who is logged in":
//!
//! 1. **State**: the [`Session`] record (anti-forgery token, user,
//!    session id, session cookie name) and its merge rule.
//! 2. **Sharing**: [`SessionHandle`], a cloneable read-only view that
//!    every other consumer holds.
//! 3. **Transitions**: [`AccountManager`], the only writer: startup
//!    reconciliation (token check, then connect), login, and logout.
//!
//! # How it fits in the stack
//!
//! ```text
//! Client facade (above)  ← reads the session to gate page actions
//!     ↕
//! Session layer (this crate)  ← reconciles server responses into Session
//!     ↕
//! Protocol + Transport (below)  ← SessionPayload records, cookie jar
//! ```
//!
//! Every session flow degrades silently: a failed request leaves the
//! session exactly as it was and is only reported through `tracing`.

mod error;
mod manager;
mod session;
mod store;

pub use error::SessionError;
pub use manager::AccountManager;
pub use session::{AuthPredicate, Session, SessionConfig};
pub use store::SessionHandle;
