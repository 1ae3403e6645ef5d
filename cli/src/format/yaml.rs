use crate::format::traits::BookmarkFormat;
use tagmarks::models::Bookmark;

pub struct YamlBookmark<'a>(pub &'a Bookmark);

impl<'a> BookmarkFormat for YamlBookmark<'a> {
    fn render(&self) -> String {
        // A single-item sequence so consecutive records concatenate into one list
        serde_yaml::to_string(std::slice::from_ref(self.0)).unwrap_or_default()
    }
}
