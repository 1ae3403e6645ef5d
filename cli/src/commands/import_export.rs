use super::{AppContext, TagmarksCommand};
use crate::fetch_ui::spinner;
use async_trait::async_trait;
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tagmarks::error::Result;
use tagmarks::exchange::{export_filename, read_exchange_file, write_export};
use tagmarks::tags::TagSelection;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportCommand {
    pub file: PathBuf,
}

#[async_trait]
impl TagmarksCommand for ImportCommand {
    async fn execute(&self, ctx: &AppContext<'_>) -> Result<()> {
        let records = read_exchange_file(&self.file)?;
        if records.is_empty() {
            eprintln!("No bookmarks found in {}", self.file.display());
            return Ok(());
        }

        let pb = spinner(format!(
            "Importing {} bookmark(s) from {}",
            records.len(),
            self.file.display()
        ));
        let report = ctx.reconciler.import_records(records).await;
        pb.finish_and_clear();

        eprintln!("✓ {}", report?);
        Ok(())
    }
}

/// Writes the selected bookmarks as a Netscape bookmark file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportCommand {
    /// Defaults to `bookmarks_<date>.html` in the working directory
    pub file: Option<PathBuf>,
    pub tags: Vec<String>,
}

impl ExportCommand {
    pub fn target(&self) -> PathBuf {
        self.file
            .clone()
            .unwrap_or_else(|| PathBuf::from(export_filename(Local::now().date_naive())))
    }
}

#[async_trait]
impl TagmarksCommand for ExportCommand {
    async fn execute(&self, ctx: &AppContext<'_>) -> Result<()> {
        let selection = TagSelection::from_tags(
            self.tags.iter().map(|t| t.trim()).filter(|t| !t.is_empty()),
        );
        let records = ctx.reconciler.view("", &selection);
        let target = self.target();

        write_export(&target, &records)?;
        eprintln!("Exported {} bookmark(s) to {}", records.len(), target.display());
        Ok(())
    }
}
