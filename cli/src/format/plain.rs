use crate::format::traits::BookmarkFormat;
use crate::output::short_id;
use tagmarks::models::Bookmark;

pub struct PlainBookmark<'a>(pub &'a Bookmark);

impl<'a> BookmarkFormat for PlainBookmark<'a> {
    fn render(&self) -> String {
        let b = self.0;
        let id = short_id(&b.id);
        let padding = id.len() + 3;

        let mut s = format!("{}. {}\n", id, b.title);
        s.push_str(&format!("{:>padding$} {}\n", ">", b.url));
        if !b.tags.is_empty() {
            s.push_str(&format!("{:>padding$} {}\n", "#", b.tags.join(", ")));
        }
        s
    }
}
