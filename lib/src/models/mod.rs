pub mod bookmark;

pub use bookmark::{validate_url, Bookmark, NewBookmark, Owner};
