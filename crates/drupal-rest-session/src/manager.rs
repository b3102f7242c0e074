//! The account manager: the only writer of the client's session.
//!
//! It is responsible for:
//! - Recovering login state at startup (token check, then connect)
//! - Logging in and out
//! - Mirroring the anti-forgery token into the transport's cookie jar
//!
//! # Failure policy
//!
//! None of the operations return errors. A failed request (network error
//! or non-2xx status) leaves the session exactly as it was, emits a `warn`
//! event, and is not retried. A 2xx whose body is not a session payload is
//! logged and reconciled as an empty payload. Callers observe the outcome
//! by reading the session afterwards.

use drupal_rest_protocol::{
    Codec, Credentials, EmptyBody, JsonCodec, SessionPayload, endpoints,
};
use drupal_rest_transport::{Request, Response, Transport};
use serde::Serialize;

use crate::{Session, SessionConfig, SessionError, SessionHandle};

/// Owns the session state and performs every transition on it.
///
/// ## Lifecycle
///
/// ```text
///            initialize()                login()              logout()
/// [empty] ──────────────→ [reconciled] ─────────→ [reconciled] ───────→ [empty]
///           token check                 user/login             user/logout
///           then connect
/// ```
pub struct AccountManager<T, C = JsonCodec> {
    transport: T,
    codec: C,
    session: SessionHandle,
}

impl<T: Transport> AccountManager<T> {
    /// Creates a manager with an empty session, speaking JSON.
    pub fn new(transport: T, config: SessionConfig) -> Self {
        Self::with_codec(transport, JsonCodec, config)
    }
}

impl<T: Transport, C: Codec> AccountManager<T, C> {
    /// Creates a manager with an empty session and a custom codec.
    pub fn with_codec(transport: T, codec: C, config: SessionConfig) -> Self {
        Self {
            transport,
            codec,
            session: SessionHandle::new(config.auth_predicate),
        }
    }

    /// A read-only handle for other consumers of the session.
    pub fn handle(&self) -> SessionHandle {
        self.session.clone()
    }

    /// A copy of the current session.
    pub fn session(&self) -> Session {
        self.session.snapshot()
    }

    /// Whether the session is active under the configured predicate.
    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    /// Recovers login state left over from a previous visit.
    ///
    /// Two strictly sequential calls:
    /// 1. `user/token`: reconciled into the session.
    /// 2. `system/connect`: only issued after step 1 has succeeded, and
    ///    reconciled the same way.
    ///
    /// If step 1 fails (network error or non-2xx), step 2 is never sent. A
    /// 2xx whose body is not a session payload still counts as success.
    pub async fn initialize(&self) {
        tracing::debug!("checking login state");
        match self.exchange(endpoints::USER_TOKEN, &EmptyBody {}).await {
            Ok(payload) => {
                tracing::debug!(has_token = payload.token.is_some(), "state is verified");
                self.apply(payload);
            }
            Err(e) => {
                tracing::warn!(error = %e, "token check failed, skipping connect");
                return;
            }
        }

        tracing::debug!("loading session details");
        match self.exchange(endpoints::SYSTEM_CONNECT, &EmptyBody {}).await {
            Ok(payload) => self.apply(payload),
            Err(e) => tracing::warn!(error = %e, "connect failed"),
        }
    }

    /// Logs in with the given credentials.
    ///
    /// On success the `user/login` response is reconciled into the
    /// session; on failure the session is left unchanged.
    pub async fn login(
        &self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) {
        let credentials = Credentials::new(username, password);
        tracing::debug!(username = %credentials.username, "login attempt");

        match self.exchange(endpoints::USER_LOGIN, &credentials).await {
            Ok(payload) => self.apply(payload),
            Err(e) => tracing::warn!(
                username = %credentials.username,
                error = %e,
                "login failed"
            ),
        }
    }

    /// Logs out.
    ///
    /// On success every session field is reset to absent. On failure the
    /// session stays as it was until the next attempt. The response body is
    /// ignored.
    pub async fn logout(&self) {
        tracing::debug!("logout attempt");
        match self.post(endpoints::USER_LOGOUT, &EmptyBody {}).await {
            Ok(_) => {
                self.session.update(Session::clear);
                tracing::info!("logged out");
            }
            Err(e) => tracing::warn!(error = %e, "logout failed"),
        }
    }

    /// POSTs `body` and decodes the response as a session payload.
    ///
    /// Only the request itself can fail. An undecodable 2xx body is logged
    /// and yields an empty payload, which reconciles to no change.
    async fn exchange<B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<SessionPayload, SessionError> {
        let response = self.post(path, body).await?;
        match self.codec.decode(&response.body) {
            Ok(payload) => Ok(payload),
            Err(e) => {
                tracing::warn!(%path, error = %e, "unreadable session payload");
                Ok(SessionPayload::default())
            }
        }
    }

    async fn post<B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Response, SessionError> {
        let body = self.codec.encode(body)?;
        Ok(self.transport.send(Request::post(path, body)).await?)
    }

    /// Reconciles a payload and refreshes the anti-forgery cookie.
    fn apply(&self, payload: SessionPayload) {
        // Cookie and session token change under the same write lock.
        let uid = self.session.update(|session| {
            session.reconcile(payload);
            if let Some(token) = &session.token {
                self.transport.set_xsrf_token(token);
            }
            session.uid()
        });

        match uid {
            Some(uid) if uid.is_authenticated() => {
                tracing::info!(%uid, "session reconciled")
            }
            _ => tracing::info!("session reconciled (anonymous)"),
        }
    }
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    //! Unit tests for `AccountManager`.
    //!
    //! Naming: `test_{function}_{scenario}_{expected}`.
    //!
    //! A scripted transport stands in for the server: each path is mapped
    //! to a canned reply (a JSON body or a failure), and every request is
    //! recorded so tests can check what was sent, in which order.

    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    use drupal_rest_protocol::UserId;
    use drupal_rest_transport::{Method, TransportError};

    use super::*;
    use crate::AuthPredicate;

    // -- Helpers ----------------------------------------------------------

    #[derive(Clone)]
    enum Reply {
        Json(&'static str),
        Fail,
    }

    #[derive(Default)]
    struct ScriptedTransport {
        replies: Mutex<HashMap<&'static str, Reply>>,
        sent: Mutex<Vec<Request>>,
        xsrf: Mutex<Option<String>>,
    }

    impl ScriptedTransport {
        fn reply(self, path: &'static str, reply: Reply) -> Self {
            self.replies.lock().unwrap().insert(path, reply);
            self
        }

        fn paths(&self) -> Vec<String> {
            self.sent
                .lock()
                .unwrap()
                .iter()
                .map(|r| r.path.clone())
                .collect()
        }
    }

    impl Transport for ScriptedTransport {
        async fn send(
            &self,
            request: Request,
        ) -> Result<Response, TransportError> {
            let reply = self
                .replies
                .lock()
                .unwrap()
                .get(request.path.as_str())
                .cloned()
                .unwrap_or(Reply::Fail);
            self.sent.lock().unwrap().push(request);
            match reply {
                Reply::Json(body) => Ok(Response {
                    status: 200,
                    body: body.as_bytes().to_vec(),
                }),
                Reply::Fail => {
                    Err(TransportError::Unavailable("connection refused".into()))
                }
            }
        }

        fn set_xsrf_token(&self, token: &str) {
            *self.xsrf.lock().unwrap() = Some(token.to_string());
        }

        fn xsrf_token(&self) -> Option<String> {
            self.xsrf.lock().unwrap().clone()
        }
    }

    /// Answers `user/login` with the username as the token, after yielding
    /// so concurrent logins interleave.
    #[derive(Default)]
    struct TokenPerUserTransport {
        xsrf: Mutex<Option<String>>,
    }

    impl Transport for TokenPerUserTransport {
        async fn send(
            &self,
            request: Request,
        ) -> Result<Response, TransportError> {
            let body: serde_json::Value =
                serde_json::from_slice(request.body.as_deref().unwrap_or_default())
                    .unwrap_or_default();
            tokio::task::yield_now().await;
            let reply = serde_json::json!({
                "token": body["username"],
                "user": {"uid": 1},
            });
            Ok(Response {
                status: 200,
                body: reply.to_string().into_bytes(),
            })
        }

        fn set_xsrf_token(&self, token: &str) {
            std::thread::yield_now();
            *self.xsrf.lock().unwrap() = Some(token.to_string());
        }

        fn xsrf_token(&self) -> Option<String> {
            self.xsrf.lock().unwrap().clone()
        }
    }

    fn manager(transport: ScriptedTransport) -> AccountManager<ScriptedTransport> {
        AccountManager::new(transport, SessionConfig::default())
    }

    /// A manager whose session already holds T0 / uid 3 / S0 / N0.
    async fn logged_in_manager(
        extra: &[(&'static str, Reply)],
    ) -> AccountManager<ScriptedTransport> {
        let mut transport = ScriptedTransport::default().reply(
            endpoints::USER_LOGIN,
            Reply::Json(
                r#"{"token":"T0","user":{"uid":3},"sessid":"S0","session_name":"N0"}"#,
            ),
        );
        for (path, reply) in extra {
            transport = transport.reply(*path, reply.clone());
        }
        let mgr = manager(transport);
        mgr.login("admin", "secret").await;
        assert!(mgr.is_authenticated(), "precondition: logged in");
        mgr
    }

    // =====================================================================
    // initialize()
    // =====================================================================

    #[tokio::test]
    async fn test_initialize_verify_then_connect_merges_both() {
        let transport = ScriptedTransport::default()
            .reply(endpoints::USER_TOKEN, Reply::Json(r#"{"token":"T1"}"#))
            .reply(
                endpoints::SYSTEM_CONNECT,
                Reply::Json(
                    r#"{"user":{"uid":5},"sessid":"S1","session_name":"N1"}"#,
                ),
            );
        let mgr = manager(transport);

        mgr.initialize().await;

        let session = mgr.session();
        assert_eq!(session.token.as_deref(), Some("T1"));
        assert_eq!(session.uid(), Some(UserId(5)));
        assert_eq!(session.sessid.as_deref(), Some("S1"));
        assert_eq!(session.session_name.as_deref(), Some("N1"));
        assert!(mgr.is_authenticated());
    }

    #[tokio::test]
    async fn test_initialize_sends_verify_before_connect() {
        let transport = ScriptedTransport::default()
            .reply(endpoints::USER_TOKEN, Reply::Json("{}"))
            .reply(endpoints::SYSTEM_CONNECT, Reply::Json("{}"));
        let mgr = manager(transport);

        mgr.initialize().await;

        assert_eq!(
            mgr.transport.paths(),
            vec![endpoints::USER_TOKEN, endpoints::SYSTEM_CONNECT]
        );
        for request in mgr.transport.sent.lock().unwrap().iter() {
            assert_eq!(request.method, Method::Post);
            assert_eq!(request.body.as_deref(), Some(&b"{}"[..]));
        }
    }

    #[tokio::test]
    async fn test_initialize_verify_failure_skips_connect() {
        let transport = ScriptedTransport::default()
            .reply(endpoints::USER_TOKEN, Reply::Fail)
            .reply(endpoints::SYSTEM_CONNECT, Reply::Json(r#"{"user":{"uid":5}}"#));
        let mgr = manager(transport);

        mgr.initialize().await;

        assert_eq!(mgr.transport.paths(), vec![endpoints::USER_TOKEN]);
        assert!(mgr.session().is_empty());
    }

    #[tokio::test]
    async fn test_initialize_undecodable_verify_still_connects() {
        let transport = ScriptedTransport::default()
            .reply(endpoints::USER_TOKEN, Reply::Json("null"))
            .reply(
                endpoints::SYSTEM_CONNECT,
                Reply::Json(r#"{"user":{"uid":5},"sessid":"S1","session_name":"N1"}"#),
            );
        let mgr = manager(transport);

        mgr.initialize().await;

        assert_eq!(
            mgr.transport.paths(),
            vec![endpoints::USER_TOKEN, endpoints::SYSTEM_CONNECT]
        );
        let session = mgr.session();
        assert_eq!(session.token, None);
        assert_eq!(session.uid(), Some(UserId(5)));
        assert_eq!(session.sessid.as_deref(), Some("S1"));
    }

    #[tokio::test]
    async fn test_initialize_notice_before_json_still_connects() {
        let transport = ScriptedTransport::default()
            .reply(
                endpoints::USER_TOKEN,
                Reply::Json("<b>Notice</b>: Undefined index\n{\"token\":\"T1\"}"),
            )
            .reply(endpoints::SYSTEM_CONNECT, Reply::Json("{}"));
        let mgr = manager(transport);

        mgr.initialize().await;

        assert_eq!(mgr.transport.paths().len(), 2);
        assert!(mgr.session().is_empty());
    }

    #[tokio::test]
    async fn test_initialize_odd_user_status_keeps_connect_identity() {
        let transport = ScriptedTransport::default()
            .reply(endpoints::USER_TOKEN, Reply::Json(r#"{"token":"T1"}"#))
            .reply(
                endpoints::SYSTEM_CONNECT,
                Reply::Json(
                    r#"{"sessid":"S1","session_name":"N1","user":{"uid":"5","status":true}}"#,
                ),
            );
        let mgr = manager(transport);

        mgr.initialize().await;

        let session = mgr.session();
        assert_eq!(session.token.as_deref(), Some("T1"));
        assert_eq!(session.uid(), Some(UserId(5)));
        assert_eq!(session.sessid.as_deref(), Some("S1"));
        assert_eq!(session.session_name.as_deref(), Some("N1"));
        assert!(mgr.is_authenticated());
    }

    #[tokio::test]
    async fn test_initialize_connect_failure_keeps_verify_result() {
        let transport = ScriptedTransport::default()
            .reply(endpoints::USER_TOKEN, Reply::Json(r#"{"token":"T1"}"#))
            .reply(endpoints::SYSTEM_CONNECT, Reply::Fail);
        let mgr = manager(transport);

        mgr.initialize().await;

        assert_eq!(mgr.session().token.as_deref(), Some("T1"));
        assert!(mgr.session().user.is_none());
        assert_eq!(mgr.transport.xsrf_token().as_deref(), Some("T1"));
    }

    #[tokio::test]
    async fn test_initialize_anonymous_visitor_not_authenticated() {
        let transport = ScriptedTransport::default()
            .reply(endpoints::USER_TOKEN, Reply::Json(r#"{"token":"T1"}"#))
            .reply(
                endpoints::SYSTEM_CONNECT,
                Reply::Json(r#"{"user":{"uid":0,"roles":{"1":"anonymous user"}},"sessid":"","session_name":"SESSx"}"#),
            );
        let mgr = manager(transport);

        mgr.initialize().await;

        assert_eq!(mgr.session().uid(), Some(UserId(0)));
        assert!(mgr.session().sessid.is_none());
        assert!(!mgr.is_authenticated());
    }

    #[tokio::test]
    async fn test_initialize_without_token_leaves_cookie_unset() {
        let transport = ScriptedTransport::default()
            .reply(endpoints::USER_TOKEN, Reply::Json("{}"))
            .reply(endpoints::SYSTEM_CONNECT, Reply::Json(r#"{"user":{"uid":5}}"#));
        let mgr = manager(transport);

        mgr.initialize().await;

        assert_eq!(mgr.transport.xsrf_token(), None);
    }

    // =====================================================================
    // login()
    // =====================================================================

    #[tokio::test]
    async fn test_login_success_sets_token_user_and_cookie() {
        let transport = ScriptedTransport::default().reply(
            endpoints::USER_LOGIN,
            Reply::Json(r#"{"token":"T2","user":{"uid":7}}"#),
        );
        let mgr = manager(transport);

        mgr.login("editor", "pw").await;

        let session = mgr.session();
        assert_eq!(session.token.as_deref(), Some("T2"));
        assert_eq!(session.uid(), Some(UserId(7)));
        assert_eq!(mgr.transport.xsrf_token().as_deref(), Some("T2"));
        assert!(mgr.is_authenticated());
    }

    #[tokio::test]
    async fn test_login_sends_credentials() {
        let transport = ScriptedTransport::default()
            .reply(endpoints::USER_LOGIN, Reply::Json("{}"));
        let mgr = manager(transport);

        mgr.login("editor", "pw").await;

        let sent = mgr.transport.sent.lock().unwrap();
        let body: serde_json::Value =
            serde_json::from_slice(sent[0].body.as_deref().unwrap()).unwrap();
        assert_eq!(sent[0].path, endpoints::USER_LOGIN);
        assert_eq!(
            body,
            serde_json::json!({"username": "editor", "password": "pw"})
        );
    }

    #[tokio::test]
    async fn test_login_failure_leaves_session_unchanged() {
        let mgr = logged_in_manager(&[]).await;
        let before = mgr.session();
        // Re-script login to fail.
        mgr.transport
            .replies
            .lock()
            .unwrap()
            .insert(endpoints::USER_LOGIN, Reply::Fail);

        mgr.login("editor", "wrong").await;

        assert_eq!(mgr.session(), before);
    }

    #[tokio::test]
    async fn test_login_without_token_keeps_previous_token() {
        let mgr = logged_in_manager(&[]).await;
        mgr.transport.replies.lock().unwrap().insert(
            endpoints::USER_LOGIN,
            Reply::Json(r#"{"user":{"uid":8}}"#),
        );

        mgr.login("other", "pw").await;

        assert_eq!(mgr.session().token.as_deref(), Some("T0"));
        assert_eq!(mgr.session().uid(), Some(UserId(8)));
    }

    #[tokio::test]
    async fn test_login_undecodable_body_leaves_session_unchanged() {
        let mgr = logged_in_manager(&[]).await;
        let before = mgr.session();
        mgr.transport
            .replies
            .lock()
            .unwrap()
            .insert(endpoints::USER_LOGIN, Reply::Json("<html>maintenance</html>"));

        mgr.login("editor", "pw").await;

        assert_eq!(mgr.session(), before);
        assert_eq!(mgr.transport.xsrf_token().as_deref(), Some("T0"));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_logins_keep_cookie_in_step_with_session() {
        let mgr = Arc::new(AccountManager::new(
            TokenPerUserTransport::default(),
            SessionConfig::default(),
        ));

        let tasks: Vec<_> = (0..64)
            .map(|i| {
                let mgr = Arc::clone(&mgr);
                tokio::spawn(async move { mgr.login(format!("T{i}"), "pw").await })
            })
            .collect();
        for task in tasks {
            task.await.unwrap();
        }

        let token = mgr.session().token;
        assert!(token.is_some());
        assert_eq!(mgr.transport.xsrf_token(), token);
    }

    // =====================================================================
    // logout()
    // =====================================================================

    #[tokio::test]
    async fn test_logout_success_clears_every_field() {
        let mgr =
            logged_in_manager(&[(endpoints::USER_LOGOUT, Reply::Json("[true]"))])
                .await;

        mgr.logout().await;

        assert!(mgr.session().is_empty());
        assert!(!mgr.is_authenticated());
    }

    #[tokio::test]
    async fn test_logout_ignores_response_body() {
        let mgr = logged_in_manager(&[(
            endpoints::USER_LOGOUT,
            Reply::Json("not json at all"),
        )])
        .await;

        mgr.logout().await;

        assert!(mgr.session().is_empty());
    }

    #[tokio::test]
    async fn test_logout_failure_leaves_session_unchanged() {
        let mgr =
            logged_in_manager(&[(endpoints::USER_LOGOUT, Reply::Fail)]).await;
        let before = mgr.session();

        mgr.logout().await;

        assert_eq!(mgr.session(), before);
        assert!(mgr.is_authenticated());
    }

    // =====================================================================
    // handles and predicates
    // =====================================================================

    #[tokio::test]
    async fn test_handle_observes_later_transitions() {
        let transport = ScriptedTransport::default()
            .reply(endpoints::USER_LOGIN, Reply::Json(r#"{"user":{"uid":7}}"#));
        let mgr = manager(transport);
        let handle = mgr.handle();
        assert!(!handle.is_authenticated());

        mgr.login("editor", "pw").await;

        assert!(handle.is_authenticated());
    }

    #[test]
    fn test_fresh_manager_not_authenticated() {
        let mgr = manager(ScriptedTransport::default());
        assert!(!mgr.is_authenticated());
        assert!(mgr.session().is_empty());
    }

    #[tokio::test]
    async fn test_token_predicate_counts_anonymous_token() {
        let transport = ScriptedTransport::default()
            .reply(endpoints::USER_TOKEN, Reply::Json(r#"{"token":"T1"}"#))
            .reply(endpoints::SYSTEM_CONNECT, Reply::Json(r#"{"user":{"uid":0}}"#));
        let mgr = AccountManager::new(
            transport,
            SessionConfig {
                auth_predicate: AuthPredicate::TokenPresent,
            },
        );

        mgr.initialize().await;

        assert!(mgr.is_authenticated());
    }
}
