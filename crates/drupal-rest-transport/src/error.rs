/// Errors that can occur in the transport layer.
///
/// The session layer treats every variant the same way ("request failed");
/// the distinction only matters for logs and for resource callers.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The API base or a request path did not form a usable URL.
    #[error("invalid url {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    /// The HTTP client could not be constructed.
    #[cfg(feature = "http")]
    #[error("http client setup failed: {0}")]
    Client(#[source] reqwest::Error),

    /// The request never produced a response (DNS, connect, reset, body read).
    #[cfg(feature = "http")]
    #[error("request failed: {0}")]
    Request(#[source] reqwest::Error),

    /// The server answered with a non-2xx status.
    #[error("{path} returned HTTP {status}")]
    Status { status: u16, path: String },

    /// A test or in-memory transport refused the request.
    #[error("request failed: {0}")]
    Unavailable(String),
}
