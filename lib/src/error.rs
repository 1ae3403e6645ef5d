/// Error type for the tagmarks library
///
/// Every fallible operation in the crate returns this enum. Store failures are
/// reported as [`TagmarksError::Remote`] regardless of the backend, so callers
/// can surface them without knowing which store is plugged in.
#[derive(Debug, thiserror::Error)]
pub enum TagmarksError {
    /// Input string is not a parseable absolute URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Exchange file could not be read as a document at all
    #[error("Bookmark file parse error: {0}")]
    Parse(String),

    /// A store operation (list/insert/update/delete/subscribe) failed
    #[error("Remote store error: {0}")]
    Remote(String),

    /// A write or refresh was attempted without an authenticated owner
    #[error("No user is signed in")]
    NotSignedIn,

    /// Invalid input or arguments
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Database-related errors (SQLite)
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// I/O errors (file operations)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP request errors
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// YAML parsing/serialization errors
    #[error("YAML error: {0}")]
    Yaml(String),

    /// JSON errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Generic error for cases that don't fit other categories
    #[error("{0}")]
    Other(String),
}

/// Result type alias using TagmarksError
pub type Result<T> = std::result::Result<T, TagmarksError>;

impl TagmarksError {
    /// Wrap any store-side failure as a [`TagmarksError::Remote`]
    pub fn remote(err: impl std::fmt::Display) -> Self {
        TagmarksError::Remote(err.to_string())
    }
}

impl From<String> for TagmarksError {
    fn from(s: String) -> Self {
        TagmarksError::Other(s)
    }
}

impl From<&str> for TagmarksError {
    fn from(s: &str) -> Self {
        TagmarksError::Other(s.to_string())
    }
}

impl From<serde_yaml::Error> for TagmarksError {
    fn from(err: serde_yaml::Error) -> Self {
        TagmarksError::Yaml(err.to_string())
    }
}

impl From<serde_json::Error> for TagmarksError {
    fn from(err: serde_json::Error) -> Self {
        TagmarksError::Json(err.to_string())
    }
}

impl From<url::ParseError> for TagmarksError {
    fn from(err: url::ParseError) -> Self {
        TagmarksError::InvalidUrl(err.to_string())
    }
}
