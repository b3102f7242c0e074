//! Lenient deserializers for Drupal's loosely typed JSON.
//!
//! Drupal 7 builds its responses from PHP arrays, so the same field can
//! arrive in different shapes depending on the code path that produced it:
//!
//! - ids and timestamps come as numbers from some resources and as numeric
//!   strings (`"5"`) from others;
//! - an empty PHP array encodes as `[]` even where a non-empty one encodes
//!   as an object (`"roles": {"2": "authenticated user"}`);
//! - modules may rewrite display fields (`"status": true`).
//!
//! Display-only fields use the `lenient_*` variants: a value of the wrong
//! shape reads as absent instead of failing the enclosing record.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString<T> {
    Number(T),
    Text(String),
}

impl<T> NumberOrString<T>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    fn resolve<E: serde::de::Error>(self) -> Result<T, E> {
        match self {
            NumberOrString::Number(n) => Ok(n),
            NumberOrString::Text(s) => s.trim().parse().map_err(E::custom),
        }
    }
}

/// Accepts `5` or `"5"`.
pub(crate) fn number<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + FromStr,
    T::Err: fmt::Display,
{
    NumberOrString::<T>::deserialize(deserializer)?.resolve()
}

/// Accepts `5`, `"5"`, `null`, or a missing field (with `#[serde(default)]`).
pub(crate) fn optional_number<'de, D, T>(
    deserializer: D,
) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + FromStr,
    T::Err: fmt::Display,
{
    Option::<NumberOrString<T>>::deserialize(deserializer)?
        .map(NumberOrString::resolve)
        .transpose()
}

/// Like [`optional_number`], but any other shape reads as `None`.
pub(crate) fn lenient_number<'de, D, T>(
    deserializer: D,
) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + FromStr,
    T::Err: fmt::Display,
{
    let value = Value::deserialize(deserializer)?;
    Ok(Option::<NumberOrString<T>>::deserialize(value)
        .ok()
        .flatten()
        .and_then(|n| n.resolve::<serde_json::Error>().ok()))
}

/// A string, or `None` for any other shape.
pub(crate) fn lenient_string<'de, D>(
    deserializer: D,
) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(Some(s)),
        _ => Ok(None),
    }
}

/// Treats `""` the same as a missing value.
pub(crate) fn non_empty_string<'de, D>(
    deserializer: D,
) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.filter(|s| !s.is_empty()))
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RolesRepr {
    Map(BTreeMap<String, String>),
    List(Vec<String>),
}

/// Role maps: `{"2": "authenticated user"}`, `[]`, or `null`.
///
/// A non-empty list is keyed by position. Any other shape is an empty map.
pub(crate) fn roles<'de, D>(
    deserializer: D,
) -> Result<BTreeMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<RolesRepr>::deserialize(deserializer) {
        Ok(Some(RolesRepr::Map(map))) => Ok(map),
        Ok(Some(RolesRepr::List(list))) => Ok(list
            .into_iter()
            .enumerate()
            .map(|(i, name)| (i.to_string(), name))
            .collect()),
        Ok(None) => Ok(BTreeMap::new()),
        Err(_) => Ok(BTreeMap::new()),
    }
}
