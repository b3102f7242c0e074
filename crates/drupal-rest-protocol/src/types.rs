//! Records exchanged with the services endpoint.
//!
//! Every response record keeps the fields this client reads as typed
//! fields and collects everything else into an `extra` map, so a profile or
//! node can still be displayed in full even when the site adds fields.

use std::collections::BTreeMap;
use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::de;

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// A Drupal user id.
///
/// Uid `0` is the anonymous user; any uid `<= 0` is treated as anonymous.
/// Deserializes from a number or a numeric string; serializes as a number.
/// `Display` prints the bare number so it can be used as a path segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct UserId(pub i64);

impl UserId {
    /// Returns `true` for uids that identify a real account (`> 0`).
    pub fn is_authenticated(self) -> bool {
        self.0 > 0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for UserId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(UserId)
    }
}

impl<'de> Deserialize<'de> for UserId {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        de::number::<_, i64>(d).map(UserId)
    }
}

/// A Drupal node id. Same wire leniency as [`UserId`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct NodeId(pub u64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for NodeId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(NodeId)
    }
}

impl<'de> Deserialize<'de> for NodeId {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        de::number::<_, u64>(d).map(NodeId)
    }
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// The body returned by `user/token`, `system/connect`, and `user/login`.
///
/// Every field is optional: `user/token` usually carries only `token`,
/// `system/connect` carries the identity without a token. Empty strings are
/// read as absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionPayload {
    #[serde(
        default,
        deserialize_with = "de::non_empty_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub token: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,

    #[serde(
        default,
        deserialize_with = "de::non_empty_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub sessid: Option<String>,

    #[serde(
        default,
        deserialize_with = "de::non_empty_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub session_name: Option<String>,
}

/// Login request body.
///
/// `Debug` is written by hand so the password never reaches a log line.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// The `{}` body sent to `user/token`, `system/connect`, and `user/logout`.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct EmptyBody {}

// ---------------------------------------------------------------------------
// User
// ---------------------------------------------------------------------------

/// A user account as returned by `user/<uid>` and inside session payloads.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Missing or `<= 0` means anonymous.
    #[serde(
        default,
        deserialize_with = "de::optional_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub uid: Option<UserId>,

    #[serde(
        default,
        deserialize_with = "de::lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub name: Option<String>,

    #[serde(
        default,
        deserialize_with = "de::lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub mail: Option<String>,

    /// Role id → role name.
    #[serde(default, deserialize_with = "de::roles")]
    pub roles: BTreeMap<String, String>,

    /// Account creation, Unix seconds.
    #[serde(
        default,
        deserialize_with = "de::lenient_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub created: Option<i64>,

    /// Last access, Unix seconds.
    #[serde(
        default,
        deserialize_with = "de::lenient_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub access: Option<i64>,

    /// Last login, Unix seconds.
    #[serde(
        default,
        deserialize_with = "de::lenient_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub login: Option<i64>,

    /// `1` active, `0` blocked.
    #[serde(
        default,
        deserialize_with = "de::lenient_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub status: Option<u8>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl User {
    /// A user with only a uid set.
    pub fn with_uid(uid: i64) -> Self {
        Self {
            uid: Some(UserId(uid)),
            ..Self::default()
        }
    }

    /// Returns `true` if this record names a real (non-anonymous) account.
    pub fn is_authenticated(&self) -> bool {
        self.uid.is_some_and(UserId::is_authenticated)
    }
}

// ---------------------------------------------------------------------------
// Node
// ---------------------------------------------------------------------------

/// A content node as returned by `node/<nid>` and the `node` listing.
///
/// Listing items carry only a subset of the fields (no body or images).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub nid: NodeId,

    #[serde(default)]
    pub title: String,

    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub node_type: Option<String>,

    #[serde(
        default,
        deserialize_with = "de::optional_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub uid: Option<UserId>,

    #[serde(
        default,
        deserialize_with = "de::lenient_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub status: Option<u8>,

    #[serde(
        default,
        deserialize_with = "de::lenient_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub created: Option<i64>,

    #[serde(
        default,
        deserialize_with = "de::lenient_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub changed: Option<i64>,

    /// Field API structure: `{"und": [{"value": ..., "summary": ..., "format": ...}]}`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,

    /// Field API structure: `{"und": [{"filename": ..., "uri": ...}]}`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_image: Option<Value>,

    /// Canonical resource URL of the node, present on listing items.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Node {
    /// The body text of the first value in the default language.
    pub fn body_value(&self) -> Option<&str> {
        first_field_item(self.body.as_ref()?)?.get("value")?.as_str()
    }

    /// File name of the first attached image, if any.
    pub fn image_filename(&self) -> Option<&str> {
        first_field_item(self.field_image.as_ref()?)?
            .get("filename")?
            .as_str()
    }
}

/// Field API values are keyed by language, `und` being "undefined". An
/// empty field encodes as `[]`.
fn first_field_item(field: &Value) -> Option<&Value> {
    let by_language = field.as_object()?;
    by_language
        .get("und")
        .or_else(|| by_language.values().next())?
        .as_array()?
        .first()
}

/// Body of a node create request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeDraft {
    pub title: String,
    #[serde(rename = "type")]
    pub node_type: String,
    pub body: String,
    pub uid: UserId,
}

impl NodeDraft {
    /// Content type used for every node this client creates.
    pub const ARTICLE: &'static str = "article";

    pub fn article(
        title: impl Into<String>,
        body: impl Into<String>,
        uid: UserId,
    ) -> Self {
        Self {
            title: title.into(),
            node_type: Self::ARTICLE.to_string(),
            body: body.into(),
            uid,
        }
    }
}

/// Response to a node create request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeCreated {
    pub nid: NodeId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
}

/// Paging parameters for the `node` listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeQuery {
    pub pagesize: u32,
    pub page: u32,
}

impl NodeQuery {
    /// Query-string pairs in the order the services module documents them.
    pub fn to_pairs(self) -> Vec<(String, String)> {
        vec![
            ("pagesize".to_string(), self.pagesize.to_string()),
            ("page".to_string(), self.page.to_string()),
        ]
    }
}

// =========================================================================
// Tests
// =========================================================================
