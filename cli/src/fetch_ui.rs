use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;
use tagmarks::error::{Result, TagmarksError};
use tagmarks::fetch::{MetadataSource, PageMetadata};
use tagmarks::utils::truncate;

/// Steadily ticking spinner on stderr
pub fn spinner(message: impl Into<String>) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message.into());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Fetch page metadata with visual spinner feedback
///
/// Shows an animated spinner while fetching, then a success or fallback
/// status line. A page that could not be read still yields a title (the
/// hostname); only an invalid URL is an error.
pub async fn fetch_with_spinner(source: &dyn MetadataSource, url: &str) -> Result<PageMetadata> {
    let url_display = truncate(url, 60);
    let pb = spinner(format!("Fetching: {}", url_display));

    let result = source.fetch_metadata(url).await;

    match &result {
        Ok(meta) if meta.success => pb.finish_with_message(format!("✓ {}", url_display)),
        Ok(meta) => pb.finish_with_message(format!(
            "✗ {} (using \"{}\")",
            url_display, meta.title
        )),
        Err(e) => pb.finish_with_message(format!("✗ {} ({})", url_display, categorize_error(e))),
    }

    result
}

/// Categorize error for user-friendly display
pub fn categorize_error(error: &TagmarksError) -> &'static str {
    if let TagmarksError::InvalidUrl(_) = error {
        return "invalid url";
    }

    let error_str = error.to_string().to_lowercase();
    if error_str.contains("403") {
        "blocked"
    } else if error_str.contains("401") {
        "unauthorized"
    } else if error_str.contains("404") {
        "not found"
    } else if error_str.contains("timeout") || error_str.contains("timed out") {
        "timeout"
    } else if error_str.contains("dns") {
        "dns error"
    } else if error_str.contains("connection") {
        "connection error"
    } else {
        "fetch error"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::StaticSource;
    use rstest::rstest;

    #[rstest]
    #[case(TagmarksError::InvalidUrl("x".into()), "invalid url")]
    #[case(TagmarksError::Other("HTTP 403 Forbidden".into()), "blocked")]
    #[case(TagmarksError::Other("HTTP 401 Unauthorized".into()), "unauthorized")]
    #[case(TagmarksError::Other("page not found 404".into()), "not found")]
    #[case(TagmarksError::Other("connection timeout".into()), "timeout")]
    #[case(TagmarksError::Other("operation timed out".into()), "timeout")]
    #[case(TagmarksError::Other("DNS lookup failed".into()), "dns error")]
    #[case(TagmarksError::Other("connection refused".into()), "connection error")]
    #[case(TagmarksError::Other("unexpected error".into()), "fetch error")]
    fn test_categorize_error(#[case] error: TagmarksError, #[case] expected: &str) {
        assert_eq!(categorize_error(&error), expected);
    }

    #[tokio::test]
    async fn test_fetch_with_spinner_passes_result_through() {
        let meta = fetch_with_spinner(&StaticSource, "https://example.com/page")
            .await
            .unwrap();
        assert_eq!(meta.title, "Fetched Title");
        assert_eq!(meta.favicon, "icon:example.com");
    }

    #[tokio::test]
    async fn test_fetch_with_spinner_invalid_url() {
        let result = fetch_with_spinner(&StaticSource, "not-a-valid-url").await;
        assert!(matches!(result, Err(TagmarksError::InvalidUrl(_))));
    }
}
