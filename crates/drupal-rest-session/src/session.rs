//! Session types: the client-held record of the current identity.
//!
//! A "session" here is the client's copy of what the server told it about
//! the current visitor:
//! - the anti-forgery TOKEN required on state-changing requests
//! - WHO the visitor is (`user`, anonymous when `uid <= 0`)
//! - WHICH server session backs it (`sessid` + `session_name`)

use drupal_rest_protocol::{SessionPayload, User, UserId};

// ---------------------------------------------------------------------------
// SessionConfig
// ---------------------------------------------------------------------------

/// Which rule decides that a session is active.
///
/// Two rules exist in the wild and they disagree: a token is issued to
/// anonymous visitors too, so `TokenPresent` reports "logged in" for
/// anyone who has completed the token check. Pick one explicitly; they are
/// never combined.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AuthPredicate {
    /// Active iff a user is held and its `uid > 0`.
    #[default]
    AuthenticatedUser,

    /// Active iff an anti-forgery token is held.
    TokenPresent,
}

/// Configuration for session behavior.
#[derive(Debug, Clone, Default)]
pub struct SessionConfig {
    /// Rule used by `is_authenticated`. Default: [`AuthPredicate::AuthenticatedUser`].
    pub auth_predicate: AuthPredicate,
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// The client-held identity and server session handle.
///
/// Starts empty (every field `None`). Changes only through
/// [`reconcile`](Self::reconcile) and [`clear`](Self::clear), which the
/// [`AccountManager`](crate::AccountManager) calls; everybody else gets
/// copies.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    /// Anti-forgery token, mirrored into the `XSRF-TOKEN` cookie.
    pub token: Option<String>,

    /// The account this session belongs to.
    pub user: Option<User>,

    /// Server session identifier.
    pub sessid: Option<String>,

    /// Name of the server's session cookie.
    pub session_name: Option<String>,
}

impl Session {
    /// Merges a server response into this session.
    ///
    /// Field-by-field overwrite-on-presence: a field the response carries
    /// replaces the held value, a field it omits keeps the held value. In
    /// particular a response without `token` never drops the token.
    pub fn reconcile(&mut self, payload: SessionPayload) {
        let SessionPayload {
            token,
            user,
            sessid,
            session_name,
        } = payload;

        if user.is_some() {
            self.user = user;
        }
        if sessid.is_some() {
            self.sessid = sessid;
        }
        if session_name.is_some() {
            self.session_name = session_name;
        }
        if token.is_some() {
            self.token = token;
        }
    }

    /// Resets every field to absent.
    pub fn clear(&mut self) {
        *self = Session::default();
    }

    /// Applies the given rule to the current state.
    pub fn is_authenticated(&self, predicate: AuthPredicate) -> bool {
        match predicate {
            AuthPredicate::AuthenticatedUser => {
                self.user.as_ref().is_some_and(User::is_authenticated)
            }
            AuthPredicate::TokenPresent => self.token.is_some(),
        }
    }

    /// The held user's id, anonymous or not.
    pub fn uid(&self) -> Option<UserId> {
        self.user.as_ref().and_then(|user| user.uid)
    }

    /// Returns `true` if no field is set.
    pub fn is_empty(&self) -> bool {
        self == &Session::default()
    }
}

// =========================================================================
// Tests
// =========================================================================
