use crate::error::{Result, TagmarksError};
use crate::tags;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

/// Identity of the authenticated user that owns a set of bookmarks
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Owner(String);

impl Owner {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Owner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A persisted bookmark, as returned by the store
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Bookmark {
    pub id: String,
    pub owner: Owner,
    pub url: String,
    pub title: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub favicon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Bookmark {
    /// Tag membership check (tags are compared exactly, no case folding)
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// `created_at` as Unix epoch seconds
    pub fn created_epoch(&self) -> Option<i64> {
        self.created_at.map(|ts| ts.timestamp())
    }

    /// Hostname without a leading `www.`, or the raw URL when it does not parse
    pub fn display_domain(&self) -> String {
        match Url::parse(&self.url) {
            Ok(parsed) => match parsed.host_str() {
                Some(host) => host.strip_prefix("www.").unwrap_or(host).to_string(),
                None => self.url.clone(),
            },
            Err(_) => self.url.clone(),
        }
    }

    /// Editable fields of this bookmark, used as the starting point of an edit
    pub fn to_new(&self) -> NewBookmark {
        NewBookmark {
            url: self.url.clone(),
            title: self.title.clone(),
            tags: self.tags.clone(),
            favicon: self.favicon.clone(),
        }
    }
}

/// A bookmark that has not been persisted yet
///
/// Produced by direct entry, by decoding an exchange file, or as the payload of
/// an edit. It carries no id, owner or creation time: the store assigns those.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct NewBookmark {
    pub url: String,
    pub title: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub favicon: Option<String>,
}

impl NewBookmark {
    pub fn new(url: impl Into<String>, title: impl Into<String>, tags: Vec<String>) -> Self {
        Self {
            url: url.into(),
            title: title.into(),
            tags,
            favicon: None,
        }
    }

    pub fn with_favicon(mut self, favicon: impl Into<String>) -> Self {
        self.favicon = Some(favicon.into());
        self
    }

    /// Enforce the persistence invariants
    ///
    /// The URL is trimmed and must parse as an absolute URL, the title is
    /// trimmed and must be non-empty, tags are trimmed with empty entries
    /// dropped, and an empty favicon collapses to `None`.
    pub fn validated(self) -> Result<Self> {
        validate_url(&self.url)?;

        let title = self.title.trim().to_string();
        if title.is_empty() {
            return Err(TagmarksError::InvalidInput(
                "bookmark title cannot be empty".to_string(),
            ));
        }

        Ok(Self {
            url: self.url.trim().to_string(),
            title,
            tags: tags::normalize_tags(self.tags),
            favicon: self.favicon.filter(|f| !f.trim().is_empty()),
        })
    }
}

/// Parse `raw` (surrounding whitespace ignored) as an absolute URL
pub fn validate_url(raw: &str) -> Result<Url> {
    Url::parse(raw.trim()).map_err(|e| TagmarksError::InvalidUrl(format!("'{}': {}", raw, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn sample() -> Bookmark {
        Bookmark {
            id: "b-1".to_string(),
            owner: Owner::new("alice"),
            url: "https://www.example.com/path".to_string(),
            title: "Example".to_string(),
            tags: vec!["rust".to_string(), "web".to_string()],
            favicon: None,
            created_at: Some("2024-03-01T12:00:00Z".parse().unwrap()),
        }
    }

    #[test]
    fn test_bookmark_serialization() {
        let bookmark = sample();
        let json = serde_json::to_string(&bookmark).unwrap();
        assert!(json.contains("\"owner\":\"alice\""));
        assert!(json.contains("\"tags\":[\"rust\",\"web\"]"));
        assert!(!json.contains("favicon"));

        let deserialized: Bookmark = serde_json::from_str(&json).unwrap();
        assert_eq!(bookmark, deserialized);
    }

    #[test]
    fn test_created_epoch() {
        assert_eq!(sample().created_epoch(), Some(1_709_294_400));
    }

    #[rstest]
    #[case("https://www.example.com/path", "example.com")]
    #[case("https://docs.rs/tokio", "docs.rs")]
    #[case("not a url", "not a url")]
    fn test_display_domain(#[case] url: &str, #[case] expected: &str) {
        let mut bookmark = sample();
        bookmark.url = url.to_string();
        assert_eq!(bookmark.display_domain(), expected);
    }

    #[test]
    fn test_has_tag_is_exact() {
        let bookmark = sample();
        assert!(bookmark.has_tag("rust"));
        assert!(!bookmark.has_tag("Rust"));
    }

    #[test]
    fn test_validated_normalizes_fields() {
        let candidate = NewBookmark {
            url: "  https://example.com  ".to_string(),
            title: "  Example  ".to_string(),
            tags: vec![" a ".to_string(), "".to_string(), "b".to_string()],
            favicon: Some("   ".to_string()),
        };

        let valid = candidate.validated().unwrap();
        assert_eq!(valid.url, "https://example.com");
        assert_eq!(valid.title, "Example");
        assert_eq!(valid.tags, vec!["a", "b"]);
        assert_eq!(valid.favicon, None);
    }

    #[rstest]
    #[case("")]
    #[case("example.com")]
    #[case("http//missing-colon")]
    fn test_validated_rejects_bad_url(#[case] url: &str) {
        let result = NewBookmark::new(url, "Title", vec![]).validated();
        assert!(matches!(result, Err(TagmarksError::InvalidUrl(_))));
    }

    #[test]
    fn test_validated_rejects_blank_title() {
        let result = NewBookmark::new("https://example.com", "   ", vec![]).validated();
        assert!(matches!(result, Err(TagmarksError::InvalidInput(_))));
    }

    #[test]
    fn test_to_new_keeps_editable_fields() {
        let bookmark = sample();
        let edit = bookmark.to_new();
        assert_eq!(edit.url, bookmark.url);
        assert_eq!(edit.tags, bookmark.tags);
    }
}
