use crate::format::traits::BookmarkFormat;
use serde::Serialize;
use tagmarks::models::Bookmark;

pub struct TomlBookmark<'a>(pub &'a Bookmark);

#[derive(Serialize)]
struct Entry<'a> {
    bookmark: [&'a Bookmark; 1],
}

impl<'a> BookmarkFormat for TomlBookmark<'a> {
    /// Rendered as a `[[bookmark]]` table so records concatenate into one document
    fn render(&self) -> String {
        toml::to_string_pretty(&Entry { bookmark: [self.0] }).unwrap_or_default()
    }
}
