// ABOUTME: Phantom-typed identifiers handed out by the release host.
// ABOUTME: Prevents a release id from being passed where an asset id is expected.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

/// Marker types for phantom type parameters.
pub enum ReleaseMarker {}
pub enum AssetMarker {}

/// An opaque identifier issued by the remote host.
///
/// The host decides the format; the pipeline only stores and echoes it back.
/// GitHub returns numeric ids, so deserialization accepts numbers as well as
/// strings and keeps the decimal text.
#[must_use = "IDs reference remote records and should not be ignored"]
pub struct Id<T> {
    value: String,
    _marker: PhantomData<T>,
}

impl<T> Id<T> {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            _marker: PhantomData,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }

    pub fn into_inner(self) -> String {
        self.value
    }
}

// Manual impls so T needs no bounds.

impl<T> std::fmt::Debug for Id<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Id").field(&self.value).finish()
    }
}

impl<T> Clone for Id<T> {
    fn clone(&self) -> Self {
        Self::new(self.value.clone())
    }
}

impl<T> PartialEq for Id<T> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<T> Eq for Id<T> {}

impl<T> Hash for Id<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

impl<T> std::fmt::Display for Id<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl<T> Serialize for Id<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.value.serialize(serializer)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Number(u64),
    Text(String),
}

impl<'de, T> Deserialize<'de> for Id<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match RawId::deserialize(deserializer)? {
            RawId::Number(n) => Ok(Self::new(n.to_string())),
            RawId::Text(s) if s.trim().is_empty() => {
                Err(serde::de::Error::custom("id cannot be empty"))
            }
            RawId::Text(s) => Ok(Self::new(s)),
        }
    }
}

pub type ReleaseId = Id<ReleaseMarker>;
pub type AssetId = Id<AssetMarker>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_ids_keep_decimal_text() {
        let id: ReleaseId = serde_json::from_str("987").unwrap();
        assert_eq!(id.as_str(), "987");
    }

    #[test]
    fn string_ids_pass_through() {
        let id: AssetId = serde_json::from_str("\"abc\"").unwrap();
        assert_eq!(id.to_string(), "abc");
    }

    #[test]
    fn blank_string_ids_are_rejected() {
        assert!(serde_json::from_str::<ReleaseId>("\"  \"").is_err());
    }
}
