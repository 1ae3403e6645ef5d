//! Page metadata used to prefill new bookmarks.

use crate::config::Config;
use crate::error::{Result, TagmarksError};
use crate::models::validate_url;
use async_trait::async_trait;
use kuchikiki::traits::*;
use log::{debug, warn};
use reqwest::{Client, StatusCode};
use serde::Serialize;
use std::time::Duration;
use url::Url;

/// Title and favicon suggested for a URL
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageMetadata {
    pub title: String,
    pub favicon: String,
    /// `false` when the values are the hostname fallback
    pub success: bool,
}

/// Source of page metadata
///
/// Only a malformed URL is an error. Network trouble of any kind resolves to
/// the hostname fallback with `success: false`.
#[async_trait]
pub trait MetadataSource: Send + Sync {
    async fn fetch_metadata(&self, url: &str) -> Result<PageMetadata>;
}

/// Fetches the page over HTTP and reads its `<title>`
pub struct HttpMetadataSource {
    client: Client,
    favicon_service: String,
}

impl HttpMetadataSource {
    pub fn new(user_agent: &str, timeout: Duration, favicon_service: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()?;
        Ok(Self {
            client,
            favicon_service: favicon_service.into(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(
            &config.user_agent,
            Duration::from_secs(config.metadata_timeout_secs),
            config.favicon_service.clone(),
        )
    }

    pub fn fallback(&self, url: &Url) -> PageMetadata {
        PageMetadata {
            title: hostname(url),
            favicon: favicon_url(&self.favicon_service, url),
            success: false,
        }
    }

    async fn fetch_title(&self, url: &Url) -> Result<Option<String>> {
        let resp = self.client.get(url.clone()).send().await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(TagmarksError::Other(format!(
                "{} (Status: {})",
                status_message(status),
                status
            )));
        }

        let body = resp.text().await?;
        Ok(parse_title(&body))
    }
}

#[async_trait]
impl MetadataSource for HttpMetadataSource {
    async fn fetch_metadata(&self, url: &str) -> Result<PageMetadata> {
        let parsed = validate_url(url)?;

        match self.fetch_title(&parsed).await {
            Ok(title) => {
                debug!("Fetched metadata for {}", parsed);
                Ok(PageMetadata {
                    title: title.unwrap_or_else(|| hostname(&parsed)),
                    favicon: favicon_url(&self.favicon_service, &parsed),
                    success: true,
                })
            }
            Err(e) => {
                warn!("Metadata fetch for {} failed, using hostname: {}", parsed, e);
                Ok(self.fallback(&parsed))
            }
        }
    }
}

fn status_message(status: StatusCode) -> &'static str {
    match status.as_u16() {
        403 => {
            "HTTP 403 Forbidden - This is often caused by user-agent blocking. \
             Try customizing the user-agent in ~/.config/tagmarks/config.yml"
        }
        401 => "HTTP 401 Unauthorized - The website requires authentication",
        404 => "HTTP 404 Not Found - The URL does not exist",
        429 => "HTTP 429 Too Many Requests - You are being rate limited",
        500..=599 => "HTTP 5xx Server Error - The website is experiencing issues",
        _ => "HTTP request failed with non-success status",
    }
}

/// Host part of `url`, or the whole URL when it has none
pub fn hostname(url: &Url) -> String {
    url.host_str()
        .map(str::to_string)
        .unwrap_or_else(|| url.to_string())
}

/// Fill the favicon service template for `url`'s host
pub fn favicon_url(service: &str, url: &Url) -> String {
    service.replace("{host}", url.host_str().unwrap_or_default())
}

/// Trimmed text of the first `<title>`, entities decoded
pub fn parse_title(html: &str) -> Option<String> {
    let document = kuchikiki::parse_html().one(html).document_node;
    let title = document.select_first("title").ok()?;
    let text = title.as_node().text_contents();
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

pub fn is_valid_url(url: &str) -> bool {
    validate_url(url).is_ok()
}
