use super::{AppContext, TagmarksCommand};
use crate::format::OutputFormat;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tagmarks::error::Result;
use tagmarks::filter::FilterSummary;
use tagmarks::tags::TagSelection;

/// Filtered listing; also what a bare `tagmarks [KEYWORD...]` runs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListCommand {
    pub query: Vec<String>,
    pub tags: Vec<String>,
    pub limit: Option<usize>,
    pub format: Option<String>,
}

impl ListCommand {
    pub fn query(&self) -> String {
        self.query.join(" ")
    }

    pub fn selection(&self) -> TagSelection {
        TagSelection::from_tags(self.tags.iter().map(|t| t.trim()).filter(|t| !t.is_empty()))
    }
}

#[async_trait]
impl TagmarksCommand for ListCommand {
    async fn execute(&self, ctx: &AppContext<'_>) -> Result<()> {
        let query = self.query();
        let selection = self.selection();

        let total = ctx.reconciler.snapshot().len();
        let mut records = ctx.reconciler.view(&query, &selection);
        let summary = FilterSummary::new(records.len(), total, &query, &selection);

        if let Some(limit) = self.limit {
            records.truncate(limit);
        }

        if records.is_empty() {
            if summary.filtering {
                eprintln!("No bookmarks found matching the search criteria.");
            } else {
                eprintln!("No bookmarks yet. Add one with `tagmarks add <URL>`.");
            }
            return Ok(());
        }

        let format = OutputFormat::from_string(self.format.as_deref().unwrap_or_default());
        format.print_bookmarks(&records, ctx.no_color);
        if format.is_human() {
            eprintln!("{}", summary);
        }
        Ok(())
    }
}
