//! The shared session store.
//!
//! One [`Session`] per client, shared by reference with every consumer. The
//! write side is crate-private, so only the
//! [`AccountManager`](crate::AccountManager) can change it; everyone else
//! holds a [`SessionHandle`] and reads snapshots.

use std::sync::{Arc, PoisonError, RwLock};

use drupal_rest_protocol::{User, UserId};

use crate::{AuthPredicate, Session};

/// A cloneable, read-only view of the client's session.
///
/// Clones share the same underlying state: a login performed through the
/// manager is visible through every handle immediately.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    inner: Arc<RwLock<Session>>,
    predicate: AuthPredicate,
}

impl SessionHandle {
    pub(crate) fn new(predicate: AuthPredicate) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Session::default())),
            predicate,
        }
    }

    /// A copy of the current session.
    pub fn snapshot(&self) -> Session {
        self.read(Session::clone)
    }

    /// Whether the session is active under the configured
    /// [`AuthPredicate`].
    pub fn is_authenticated(&self) -> bool {
        let predicate = self.predicate;
        self.read(|session| session.is_authenticated(predicate))
    }

    /// The rule `is_authenticated` applies.
    pub fn predicate(&self) -> AuthPredicate {
        self.predicate
    }

    pub fn token(&self) -> Option<String> {
        self.read(|session| session.token.clone())
    }

    pub fn user(&self) -> Option<User> {
        self.read(|session| session.user.clone())
    }

    pub fn uid(&self) -> Option<UserId> {
        self.read(Session::uid)
    }

    fn read<R>(&self, f: impl FnOnce(&Session) -> R) -> R {
        // Writers replace whole fields, so a poisoned lock still holds a
        // valid session.
        let guard = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        f(&*guard)
    }

    pub(crate) fn update<R>(&self, f: impl FnOnce(&mut Session) -> R) -> R {
        let mut guard =
            self.inner.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut *guard)
    }
}
