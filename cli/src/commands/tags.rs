use super::{AppContext, TagmarksCommand};
use async_trait::async_trait;
use owo_colors::OwoColorize;
use serde::{Deserialize, Serialize};
use tagmarks::error::Result;
use tagmarks::models::Bookmark;

/// Print every tag in use with the number of bookmarks carrying it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagsCommand {
    pub format: Option<String>,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct TagCount {
    pub tag: String,
    pub count: usize,
}

pub fn count_tags(universe: Vec<String>, bookmarks: &[Bookmark]) -> Vec<TagCount> {
    universe
        .into_iter()
        .map(|tag| {
            let count = bookmarks.iter().filter(|b| b.has_tag(&tag)).count();
            TagCount { tag, count }
        })
        .collect()
}

#[async_trait]
impl TagmarksCommand for TagsCommand {
    async fn execute(&self, ctx: &AppContext<'_>) -> Result<()> {
        let snapshot = ctx.reconciler.snapshot();
        let counts = count_tags(ctx.reconciler.tag_universe(), &snapshot);

        if counts.is_empty() {
            eprintln!("No tags in use.");
            return Ok(());
        }

        match self.format.as_deref() {
            Some("json") => println!("{}", serde_json::to_string_pretty(&counts)?),
            Some("yaml") | Some("yml") => print!("{}", serde_yaml::to_string(&counts)?),
            _ => {
                for TagCount { tag, count } in &counts {
                    if ctx.no_color {
                        println!("{} ({})", tag, count);
                    } else {
                        println!("{} ({})", tag.blue(), count.bright_black());
                    }
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::TestEnv;

    #[tokio::test]
    async fn test_count_tags() {
        let env = TestEnv::new().await;
        env.seed("https://a.example", "A", &["rust", "web"]).await;
        env.seed("https://b.example", "B", &["rust"]).await;
        env.seed("https://c.example", "C", &[]).await;

        let snapshot = env.reconciler.snapshot();
        let counts = count_tags(env.reconciler.tag_universe(), &snapshot);

        assert_eq!(
            counts,
            vec![
                TagCount { tag: "rust".to_string(), count: 2 },
                TagCount { tag: "web".to_string(), count: 1 },
            ]
        );

        TagsCommand { format: Some("json".to_string()) }
            .execute(&env.ctx())
            .await
            .unwrap();
    }
}
