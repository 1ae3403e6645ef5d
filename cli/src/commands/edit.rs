use super::{AppContext, TagmarksCommand};
use crate::output::short_id;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tagmarks::error::{Result, TagmarksError};
use tagmarks::fetch::favicon_url;
use tagmarks::models::{validate_url, Bookmark, NewBookmark};
use tagmarks::tags::parse_tags;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditCommand {
    pub id: String,
    pub url: Option<String>,
    pub title: Option<String>,
    /// Replaces the whole tag list; `--tag ""` clears it
    pub tag: Option<Vec<String>>,
}

impl EditCommand {
    fn has_changes(&self) -> bool {
        self.url.is_some() || self.title.is_some() || self.tag.is_some()
    }

    /// Editable fields of `current` with the requested changes applied
    pub fn apply(&self, current: &Bookmark, favicon_service: &str) -> Result<NewBookmark> {
        let mut edit = current.to_new();

        if let Some(url) = &self.url {
            let parsed = validate_url(url)?;
            if url.trim() != current.url {
                edit.favicon = Some(favicon_url(favicon_service, &parsed));
            }
            edit.url = url.trim().to_string();
        }
        if let Some(title) = &self.title {
            edit.title = title.clone();
        }
        if let Some(tags) = &self.tag {
            edit.tags = tags.iter().flat_map(|t| parse_tags(t)).collect();
        }
        Ok(edit)
    }
}

#[async_trait]
impl TagmarksCommand for EditCommand {
    async fn execute(&self, ctx: &AppContext<'_>) -> Result<()> {
        if !self.has_changes() {
            return Err(TagmarksError::InvalidInput(
                "Nothing to change: pass --url, --title or --tag".to_string(),
            ));
        }

        let id = ctx.resolve_id(&self.id)?;
        let current = ctx
            .reconciler
            .get(&id)
            .ok_or_else(|| TagmarksError::InvalidInput(format!("No bookmark with id '{}'", id)))?;

        let edit = self.apply(&current, &ctx.config.favicon_service)?;
        let updated = ctx.reconciler.update(&id, edit).await?;
        eprintln!("Bookmark {} updated successfully", short_id(&updated.id));
        Ok(())
    }
}
