use crate::format::traits::BookmarkFormat;
use tagmarks::models::Bookmark;

pub struct JsonBookmark<'a>(pub &'a Bookmark);

impl<'a> BookmarkFormat for JsonBookmark<'a> {
    fn render(&self) -> String {
        serde_json::to_string_pretty(self.0).unwrap_or_default()
    }
}
