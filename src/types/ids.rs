use super::ValidationError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::marker::PhantomData;
use uuid::Uuid;

lazy_static::lazy_static! {
    /// A 32-hex or dashed UUID at the tail of a Notion URL path segment.
    static ref URL_ID_PATTERN: Regex = Regex::new(
        r"(?:[/-])([a-fA-F0-9]{32}|[a-fA-F0-9]{8}-[a-fA-F0-9]{4}-[a-fA-F0-9]{4}-[a-fA-F0-9]{4}-[a-fA-F0-9]{12})(?:[/?#]|$)"
    )
    .expect("URL_ID_PATTERN is a valid regex");
}

/// A Notion object identifier, tagged with the kind of object it names.
///
/// Stored in the canonical 32-character lowercase hex form. The marker type
/// keeps a page id from being passed where a data source id is expected.
pub struct Id<K> {
    value: String,
    _kind: PhantomData<K>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AnyObject;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageMarker;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlockMarker;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DatabaseMarker;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DataSourceMarker;

/// An identifier whose object kind is not yet known (user input).
pub type NotionId = Id<AnyObject>;
pub type PageId = Id<PageMarker>;
pub type BlockId = Id<BlockMarker>;
pub type DatabaseId = Id<DatabaseMarker>;
pub type DataSourceId = Id<DataSourceMarker>;

impl<K> Id<K> {
    /// Accepts a bare 32-hex id, a dashed UUID, or a Notion URL ending in one.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let cleaned = input.trim().trim_end_matches('/');
        if cleaned.is_empty() {
            return Err(ValidationError::InvalidId("empty identifier".to_string()));
        }

        if let Ok(uuid) = Uuid::parse_str(cleaned) {
            return Ok(Self::from_raw(uuid.as_simple().to_string()));
        }

        if cleaned.starts_with("http://") || cleaned.starts_with("https://") {
            let captured = URL_ID_PATTERN
                .captures(cleaned)
                .and_then(|captures| captures.get(1))
                .map(|m| m.as_str().replace('-', ""));
            return match captured {
                Some(hex) => Ok(Self::from_raw(hex.to_lowercase())),
                None => Err(ValidationError::InvalidId(format!(
                    "no Notion id found in URL: {}",
                    cleaned
                ))),
            };
        }

        Err(ValidationError::InvalidId(format!(
            "expected 32 hex characters or a UUID, got '{}'",
            cleaned
        )))
    }

    /// Wraps an identifier taken verbatim from an API payload.
    ///
    /// Payload ids are trusted; a malformed one still identifies its block
    /// within the run, so it is kept rather than rejected.
    pub(crate) fn from_raw(value: impl Into<String>) -> Self {
        let value = value.into();
        let value = match Uuid::parse_str(&value) {
            Ok(uuid) => uuid.as_simple().to_string(),
            Err(_) => value,
        };
        Self {
            value,
            _kind: PhantomData,
        }
    }

    pub fn new_v4() -> Self {
        Self::from_raw(Uuid::new_v4().as_simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// The 8-4-4-4-12 form used in API paths.
    pub fn to_dashed(&self) -> String {
        match Uuid::parse_str(&self.value) {
            Ok(uuid) => uuid.as_hyphenated().to_string(),
            Err(_) => self.value.clone(),
        }
    }

    /// First eight characters, for log lines and context labels.
    pub fn short(&self) -> &str {
        self.value.get(..8).unwrap_or(&self.value)
    }

    /// Re-tags the identifier once the object kind is known.
    pub fn retag<J>(&self) -> Id<J> {
        Id {
            value: self.value.clone(),
            _kind: PhantomData,
        }
    }
}

// Manual impls: derives would demand the marker implement the traits.
impl<K> Clone for Id<K> {
    fn clone(&self) -> Self {
        self.retag()
    }
}

impl<K> PartialEq for Id<K> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<K> Eq for Id<K> {}

impl<K> std::hash::Hash for Id<K> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

impl<K> fmt::Debug for Id<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Id({})", self.value)
    }
}

impl<K> fmt::Display for Id<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

impl<K> Serialize for Id<K> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.value.serialize(serializer)
    }
}

impl<'de, K> Deserialize<'de> for Id<K> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::from_raw(raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEX: &str = "550e8400e29b41d4a716446655440000";

    #[test]
    fn parses_every_supported_shape() {
        let shapes = [
            HEX.to_string(),
            "550e8400-e29b-41d4-a716-446655440000".to_string(),
            format!("https://www.notion.so/acme/Quarterly-Plan-{}", HEX),
            format!("https://www.notion.so/{}?v=1", HEX),
        ];
        for shape in shapes {
            let id = PageId::parse(&shape).unwrap();
            assert_eq!(id.as_str(), HEX, "shape: {}", shape);
        }
    }

    #[test]
    fn rejects_garbage() {
        assert!(PageId::parse("").is_err());
        assert!(PageId::parse("too-short").is_err());
        assert!(PageId::parse("https://www.notion.so/no-id-here").is_err());
    }

    #[test]
    fn dashed_form_round_trips_through_parse() {
        let id = BlockId::parse(HEX).unwrap();
        assert_eq!(id.to_dashed(), "550e8400-e29b-41d4-a716-446655440000");
        assert_eq!(BlockId::parse(&id.to_dashed()).unwrap(), id);
    }

    #[test]
    fn raw_payload_ids_are_kept_even_when_malformed() {
        let id = BlockId::from_raw("row-1");
        assert_eq!(id.as_str(), "row-1");
        assert_eq!(id.to_dashed(), "row-1");
        assert_eq!(id.short(), "row-1");
    }

    #[test]
    fn retag_preserves_value() {
        let any = NotionId::parse(HEX).unwrap();
        let page: PageId = any.retag();
        assert_eq!(page.as_str(), any.as_str());
        assert_eq!(page.short(), "550e8400");
    }
}
