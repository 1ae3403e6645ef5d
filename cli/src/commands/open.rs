use super::{AppContext, TagmarksCommand};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tagmarks::browser;
use tagmarks::error::{Result, TagmarksError};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenCommand {
    pub ids: Vec<String>,
}

impl OpenCommand {
    /// URLs to open, resolved up front so a bad id opens nothing
    pub fn urls(&self, ctx: &AppContext<'_>) -> Result<Vec<String>> {
        if self.ids.is_empty() {
            return Err(TagmarksError::InvalidInput(
                "No bookmark IDs specified".to_string(),
            ));
        }

        self.ids
            .iter()
            .map(|prefix| {
                let id = ctx.resolve_id(prefix)?;
                ctx.reconciler
                    .get(&id)
                    .map(|b| b.url)
                    .ok_or_else(|| TagmarksError::InvalidInput(format!("No bookmark with id '{}'", id)))
            })
            .collect()
    }
}

#[async_trait]
impl TagmarksCommand for OpenCommand {
    async fn execute(&self, ctx: &AppContext<'_>) -> Result<()> {
        for url in self.urls(ctx)? {
            browser::open_url(&url)?;
        }
        Ok(())
    }
}
