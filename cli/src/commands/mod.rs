use async_trait::async_trait;
use tagmarks::config::Config;
use tagmarks::error::{Result, TagmarksError};
use tagmarks::fetch::MetadataSource;
use tagmarks::models::Bookmark;
use tagmarks::store::SqliteStore;
use tagmarks::sync::Reconciler;

pub struct AppContext<'a> {
    pub reconciler: &'a Reconciler<SqliteStore>,
    pub config: &'a Config,
    pub metadata: &'a dyn MetadataSource,
    pub no_color: bool,
}

impl AppContext<'_> {
    /// Full id of the one bookmark whose id starts with `prefix`
    pub fn resolve_id(&self, prefix: &str) -> Result<String> {
        resolve_prefix(&self.reconciler.snapshot(), prefix)
    }
}

fn resolve_prefix(bookmarks: &[Bookmark], prefix: &str) -> Result<String> {
    let prefix = prefix.trim();
    if prefix.is_empty() {
        return Err(TagmarksError::InvalidInput("empty bookmark id".to_string()));
    }

    let mut matches = bookmarks.iter().filter(|b| b.id.starts_with(prefix));
    match (matches.next(), matches.next()) {
        (Some(bookmark), None) => Ok(bookmark.id.clone()),
        (None, _) => Err(TagmarksError::InvalidInput(format!(
            "No bookmark with id '{}'",
            prefix
        ))),
        (Some(_), Some(_)) => Err(TagmarksError::InvalidInput(format!(
            "Bookmark id '{}' is ambiguous; use more characters",
            prefix
        ))),
    }
}

pub mod add;
pub mod delete;
pub mod edit;
pub mod import_export;
pub mod list;
pub mod open;
pub mod tags;

#[async_trait]
pub trait TagmarksCommand {
    async fn execute(&self, ctx: &AppContext<'_>) -> Result<()>;
}

/// Enum-based dispatch for commands (avoids Box<dyn TagmarksCommand>)
pub enum CommandEnum {
    Add(add::AddCommand),
    List(list::ListCommand),
    Tags(tags::TagsCommand),
    Edit(edit::EditCommand),
    Delete(delete::DeleteCommand),
    Import(import_export::ImportCommand),
    Export(import_export::ExportCommand),
    Open(open::OpenCommand),
}

impl CommandEnum {
    pub async fn execute(&self, ctx: &AppContext<'_>) -> Result<()> {
        match self {
            Self::Add(cmd) => cmd.execute(ctx).await,
            Self::List(cmd) => cmd.execute(ctx).await,
            Self::Tags(cmd) => cmd.execute(ctx).await,
            Self::Edit(cmd) => cmd.execute(ctx).await,
            Self::Delete(cmd) => cmd.execute(ctx).await,
            Self::Import(cmd) => cmd.execute(ctx).await,
            Self::Export(cmd) => cmd.execute(ctx).await,
            Self::Open(cmd) => cmd.execute(ctx).await,
        }
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::TestEnv;
    use super::*;
    use rstest::rstest;
    use tagmarks::models::Owner;

    fn with_ids(ids: &[&str]) -> Vec<Bookmark> {
        ids.iter()
            .map(|id| Bookmark {
                id: id.to_string(),
                owner: Owner::new("tester"),
                url: format!("https://{id}.example"),
                title: id.to_string(),
                tags: vec![],
                favicon: None,
                created_at: None,
            })
            .collect()
    }

    #[rstest]
    #[case("ab12", Ok("ab12-ffff"))]
    #[case("  cd ", Ok("cd34-0000"))]
    #[case("a", Err(()))]
    #[case("zz", Err(()))]
    #[case("", Err(()))]
    fn test_resolve_prefix(#[case] prefix: &str, #[case] expected: std::result::Result<&str, ()>) {
        let bookmarks = with_ids(&["ab12-ffff", "ab99-0000", "cd34-0000"]);
        let result = resolve_prefix(&bookmarks, prefix);
        match expected {
            Ok(id) => assert_eq!(result.unwrap(), id),
            Err(()) => assert!(matches!(result, Err(TagmarksError::InvalidInput(_)))),
        }
    }

    #[tokio::test]
    async fn test_resolve_id_uses_snapshot() {
        let env = TestEnv::new().await;
        let saved = env.seed("https://a.example", "A", &[]).await;

        let ctx = env.ctx();
        assert_eq!(ctx.resolve_id(&saved.id[..8]).unwrap(), saved.id);
    }
}
