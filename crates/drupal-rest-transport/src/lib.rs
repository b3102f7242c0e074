//! Transport abstraction layer for drupal-rest.
//!
//! Provides the [`Transport`] trait that the session and resource layers
//! send their requests through, plus the request/response types that cross
//! it. A transport also owns the client-visible cookie jar: the session
//! layer hands it the anti-forgery token via
//! [`Transport::set_xsrf_token`], and the transport echoes that cookie back
//! as the [`XSRF_HEADER`] on state-changing requests.
//!
//! # Feature Flags
//!
//! - `http` (default): HTTP transport via `reqwest`

mod error;
#[cfg(feature = "http")]
mod http;

pub use error::TransportError;
#[cfg(feature = "http")]
pub use http::HttpTransport;

use std::fmt;
use std::future::Future;
use std::sync::Arc;

/// Name of the cookie that mirrors the anti-forgery token.
pub const XSRF_COOKIE: &str = "XSRF-TOKEN";

/// Header Drupal's services module checks on state-changing requests.
pub const XSRF_HEADER: &str = "X-CSRF-TOKEN";

/// HTTP method of a [`Request`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    /// Whether the server expects the anti-forgery header on this method.
    pub fn is_state_changing(self) -> bool {
        !matches!(self, Method::Get)
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        })
    }
}

/// A request relative to the transport's API base.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub method: Method,
    /// Path under the API base, e.g. `user/token` or `node/7`.
    pub path: String,
    /// Query-string pairs, in order.
    pub query: Vec<(String, String)>,
    /// Encoded JSON body.
    pub body: Option<Vec<u8>>,
}

impl Request {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    pub fn post(path: impl Into<String>, body: Vec<u8>) -> Self {
        Self::new(Method::Post, path).with_body(body)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::Delete, path)
    }

    pub fn with_body(mut self, body: Vec<u8>) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_query(mut self, pairs: Vec<(String, String)>) -> Self {
        self.query = pairs;
        self
    }
}

/// A successful (2xx) response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub body: Vec<u8>,
}

/// Sends requests to the API and holds the client-side cookie state.
///
/// Implementations must report any network failure or non-2xx status as an
/// error; callers never inspect `Response::status` to detect failure.
pub trait Transport: Send + Sync + 'static {
    /// Sends one request and waits for the full response body.
    fn send(
        &self,
        request: Request,
    ) -> impl Future<Output = Result<Response, TransportError>> + Send;

    /// Writes the anti-forgery token into the [`XSRF_COOKIE`] cookie.
    fn set_xsrf_token(&self, token: &str);

    /// Reads the current [`XSRF_COOKIE`] value, if one has been set.
    fn xsrf_token(&self) -> Option<String>;
}

/// Shared transports: the facade hands one `Arc` to the account manager
/// and every resource.
impl<T: Transport> Transport for Arc<T> {
    fn send(
        &self,
        request: Request,
    ) -> impl Future<Output = Result<Response, TransportError>> + Send {
        (**self).send(request)
    }

    fn set_xsrf_token(&self, token: &str) {
        (**self).set_xsrf_token(token)
    }

    fn xsrf_token(&self) -> Option<String> {
        (**self).xsrf_token()
    }
}
