use super::{AppContext, TagmarksCommand};
use crate::output::short_id;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::io::{self, Write};
use tagmarks::error::{Result, TagmarksError};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteCommand {
    pub ids: Vec<String>,
    pub force: bool,
}

fn confirm(prompt: &str) -> Result<bool> {
    eprint!("{}", prompt);
    io::stderr().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(matches!(input.trim().to_lowercase().as_str(), "y" | "yes"))
}

#[async_trait]
impl TagmarksCommand for DeleteCommand {
    async fn execute(&self, ctx: &AppContext<'_>) -> Result<()> {
        if self.ids.is_empty() {
            return Err(TagmarksError::InvalidInput(
                "No bookmark IDs specified".to_string(),
            ));
        }

        let mut targets = Vec::with_capacity(self.ids.len());
        for prefix in &self.ids {
            let id = ctx.resolve_id(prefix)?;
            if let Some(bookmark) = ctx.reconciler.get(&id) {
                if !targets.iter().any(|b: &tagmarks::models::Bookmark| b.id == id) {
                    targets.push(bookmark);
                }
            }
        }

        eprintln!("Bookmarks to be deleted:");
        for bookmark in &targets {
            eprintln!("  {}. {} - {}", short_id(&bookmark.id), bookmark.title, bookmark.url);
        }

        if !self.force && !confirm(&format!("Delete {} bookmark(s)? [y/N]: ", targets.len()))? {
            eprintln!("Deletion cancelled.");
            return Ok(());
        }

        for bookmark in &targets {
            ctx.reconciler.delete(&bookmark.id).await?;
        }
        eprintln!("Deleted {} bookmark(s)", targets.len());
        Ok(())
    }
}
