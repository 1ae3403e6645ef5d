use super::{AppContext, TagmarksCommand};
use crate::fetch_ui::fetch_with_spinner;
use crate::output::short_id;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tagmarks::error::Result;
use tagmarks::fetch::{favicon_url, hostname};
use tagmarks::models::{validate_url, NewBookmark};
use tagmarks::tags::parse_tags;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddCommand {
    pub url: String,
    /// Each entry may itself be comma-separated
    pub tag: Vec<String>,
    pub title: Option<String>,
    pub offline: bool,
}

#[async_trait]
impl TagmarksCommand for AddCommand {
    async fn execute(&self, ctx: &AppContext<'_>) -> Result<()> {
        let parsed = validate_url(&self.url)?;
        let tags: Vec<String> = self.tag.iter().flat_map(|t| parse_tags(t)).collect();

        let title = match self.title.as_deref().map(str::trim) {
            Some(title) if !title.is_empty() => title.to_string(),
            _ if self.offline => hostname(&parsed),
            _ => fetch_with_spinner(ctx.metadata, &self.url).await?.title,
        };

        let bookmark = NewBookmark::new(self.url.trim(), title, tags)
            .with_favicon(favicon_url(&ctx.config.favicon_service, &parsed));

        let saved = ctx.reconciler.insert(bookmark).await?;
        eprintln!("Added bookmark {} ({})", short_id(&saved.id), saved.title);
        Ok(())
    }
}
