//! View routes: the client-side paths the pages live under.

use std::fmt;

use drupal_rest_protocol::{NodeId, UserId};

/// A page of the client.
///
/// Parsing never fails: anything that does not match a known pattern is
/// the main listing at page 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// `/login`
    Login,
    /// `/node/list/:page`
    NodeList { page: u32 },
    /// `/node/add`
    NodeAdd,
    /// `/node/:nid`
    Node(NodeId),
    /// `/user/:uid`
    User(UserId),
}

impl Route {
    /// The main listing.
    pub const HOME: Route = Route::NodeList { page: 0 };

    /// Parses a view path. A query string, a fragment and empty segments
    /// are ignored.
    pub fn parse(path: &str) -> Route {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let segments: Vec<&str> =
            path.split('/').filter(|s| !s.is_empty()).collect();

        let route = match segments.as_slice() {
            ["login"] => Some(Route::Login),
            ["node", "add"] => Some(Route::NodeAdd),
            ["node", "list", page] => {
                page.parse().ok().map(|page| Route::NodeList { page })
            }
            ["node", nid] => nid.parse().ok().map(Route::Node),
            ["user", uid] => uid.parse().ok().map(Route::User),
            _ => None,
        };
        route.unwrap_or(Route::HOME)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Route::Login => f.write_str("/login"),
            Route::NodeList { page } => write!(f, "/node/list/{page}"),
            Route::NodeAdd => f.write_str("/node/add"),
            Route::Node(nid) => write!(f, "/node/{nid}"),
            Route::User(uid) => write!(f, "/user/{uid}"),
        }
    }
}
