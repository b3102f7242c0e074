//! Resource paths exposed by the services endpoint.
//!
//! All paths are relative to the configured API base
//! (e.g. `http://localhost/drupal7/api/v1`) and carry no leading slash; the
//! transport appends them as path segments.

/// Reports the anti-forgery token for the current server session.
pub const USER_TOKEN: &str = "user/token";

/// Returns the session identity (`user`, `sessid`, `session_name`).
pub const SYSTEM_CONNECT: &str = "system/connect";

/// Exchanges credentials for an authenticated session.
pub const USER_LOGIN: &str = "user/login";

/// Ends the current server session.
pub const USER_LOGOUT: &str = "user/logout";

/// Node collection (`node`) and items (`node/<nid>`).
pub const NODE: &str = "node";

/// User collection (`user`) and items (`user/<uid>`).
pub const USER: &str = "user";

/// Builds the path of a single item in a collection: `item("node", 7)` is
/// `node/7`.
pub fn item(collection: &str, id: impl std::fmt::Display) -> String {
    format!("{collection}/{id}")
}
