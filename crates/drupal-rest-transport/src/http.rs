//! HTTP transport implementation using `reqwest`.

use std::sync::Arc;

use reqwest::Url;
use reqwest::cookie::{CookieStore, Jar};
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderValue};

use crate::{
    Method, Request, Response, Transport, TransportError, XSRF_COOKIE,
    XSRF_HEADER,
};

const JSON: &str = "application/json";

/// A [`Transport`] that talks to a services endpoint over HTTP.
///
/// One cookie jar is shared by every request, so the server's session
/// cookie (`SESS…`) set by `user/login` is replayed automatically, the same
/// way a browser would.
pub struct HttpTransport {
    client: reqwest::Client,
    base: Url,
    jar: Arc<Jar>,
}

impl HttpTransport {
    /// Creates a transport rooted at the given API base, e.g.
    /// `http://localhost/drupal7/api/v1`.
    pub fn new(base: &str) -> Result<Self, TransportError> {
        let base = Url::parse(base).map_err(|e| TransportError::InvalidUrl {
            url: base.to_string(),
            reason: e.to_string(),
        })?;
        if base.cannot_be_a_base() {
            return Err(TransportError::InvalidUrl {
                url: base.to_string(),
                reason: "not a hierarchical URL".into(),
            });
        }

        let jar = Arc::new(Jar::default());
        let client = reqwest::Client::builder()
            .cookie_provider(Arc::clone(&jar))
            .build()
            .map_err(TransportError::Client)?;

        tracing::debug!(%base, "HTTP transport ready");
        Ok(Self { client, base, jar })
    }

    /// The API base every request path is appended to.
    pub fn base(&self) -> &Url {
        &self.base
    }

    /// Appends `path` to the API base as path segments.
    ///
    /// `Url::join` would replace the last segment of the base
    /// (`…/api/v1` + `user/token` → `…/api/user/token`), so segments are
    /// pushed instead.
    pub fn url_for(&self, path: &str) -> Result<Url, TransportError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|()| TransportError::InvalidUrl {
                url: self.base.to_string(),
                reason: "not a hierarchical URL".into(),
            })?
            .pop_if_empty()
            .extend(path.split('/').filter(|s| !s.is_empty()));
        Ok(url)
    }
}

impl Transport for HttpTransport {
    async fn send(&self, request: Request) -> Result<Response, TransportError> {
        let Request {
            method,
            path,
            query,
            body,
        } = request;
        let url = self.url_for(&path)?;

        let mut builder = self
            .client
            .request(method.into(), url)
            .header(ACCEPT, JSON);
        if !query.is_empty() {
            builder = builder.query(&query);
        }
        if method.is_state_changing() {
            if let Some(token) = self.xsrf_token() {
                builder = builder.header(XSRF_HEADER, token);
            }
        }
        if let Some(body) = body {
            builder = builder.header(CONTENT_TYPE, JSON).body(body);
        }

        tracing::debug!(%method, %path, "sending request");
        let response = builder.send().await.map_err(TransportError::Request)?;
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(TransportError::Request)?
            .to_vec();

        if !status.is_success() {
            tracing::debug!(%method, %path, status = status.as_u16(), "request rejected");
            return Err(TransportError::Status {
                status: status.as_u16(),
                path,
            });
        }

        Ok(Response {
            status: status.as_u16(),
            body,
        })
    }

    fn set_xsrf_token(&self, token: &str) {
        self.jar
            .add_cookie_str(&format!("{XSRF_COOKIE}={token}; Path=/"), &self.base);
    }

    fn xsrf_token(&self) -> Option<String> {
        let header = self.jar.cookies(&self.base)?;
        cookie_value(&header, XSRF_COOKIE)
    }
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

/// Picks one cookie out of a `Cookie:` header value (`a=1; b=2`).
fn cookie_value(header: &HeaderValue, name: &str) -> Option<String> {
    header
        .to_str()
        .ok()?
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.to_string())
}
