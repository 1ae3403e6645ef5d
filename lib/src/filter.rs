//! Search and tag filtering over an in-memory collection.
//!
//! Everything here is a pure function of its inputs: the source slice is never
//! mutated and survivors keep their relative order.

use crate::models::Bookmark;
use crate::tags::TagSelection;
use std::fmt;

/// Visible subset of `bookmarks` for a free-text query and a tag selection
///
/// A bookmark survives when its title or URL contains the query
/// (case-insensitive; a blank query matches everything) and it carries every
/// selected tag. Surrounding whitespace in a non-blank query is part of the
/// needle, so `" book"` does not match `"Notebook"`.
pub fn filter(bookmarks: &[Bookmark], query: &str, selected: &TagSelection) -> Vec<Bookmark> {
    let needle = if query.trim().is_empty() {
        String::new()
    } else {
        query.to_lowercase()
    };

    bookmarks
        .iter()
        .filter(|b| matches_query(b, &needle) && matches_tags(b, selected))
        .cloned()
        .collect()
}

/// `needle` must already be lowercased; an empty needle matches everything
pub fn matches_query(bookmark: &Bookmark, needle: &str) -> bool {
    needle.is_empty()
        || bookmark.title.to_lowercase().contains(needle)
        || bookmark.url.to_lowercase().contains(needle)
}

pub fn matches_tags(bookmark: &Bookmark, selected: &TagSelection) -> bool {
    selected.iter().all(|tag| bookmark.has_tag(tag))
}

/// Counts shown next to a filtered listing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterSummary {
    pub shown: usize,
    pub total: usize,
    pub filtering: bool,
}

impl FilterSummary {
    pub fn new(shown: usize, total: usize, query: &str, selected: &TagSelection) -> Self {
        Self {
            shown,
            total,
            filtering: !query.trim().is_empty() || !selected.is_empty(),
        }
    }
}

impl fmt::Display for FilterSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.filtering && self.shown != self.total {
            write!(f, "{} of {} bookmarks", self.shown, self.total)
        } else {
            write!(f, "{} bookmarks", self.total)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Owner;
    use rstest::rstest;

    fn bookmark(id: &str, title: &str, url: &str, tags: &[&str]) -> Bookmark {
        Bookmark {
            id: id.to_string(),
            owner: Owner::new("u"),
            url: url.to_string(),
            title: title.to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            favicon: None,
            created_at: None,
        }
    }

    fn collection() -> Vec<Bookmark> {
        vec![
            bookmark("1", "Rust Book", "https://doc.rust-lang.org/book", &["rust", "docs"]),
            bookmark("2", "Tokio", "https://tokio.rs", &["rust", "async"]),
            bookmark("3", "MDN", "https://developer.mozilla.org", &["docs", "web"]),
            bookmark("4", "Hacker News", "https://news.ycombinator.com", &[]),
        ]
    }

    fn ids(bookmarks: &[Bookmark]) -> Vec<&str> {
        bookmarks.iter().map(|b| b.id.as_str()).collect()
    }

    #[rstest]
    #[case("", vec!["1", "2", "3", "4"])]
    #[case("   ", vec!["1", "2", "3", "4"])]
    #[case("rust", vec!["1"])]
    #[case("RUST", vec!["1"])]
    #[case("tokio.rs", vec!["2"])]
    #[case("  mdn ", vec![])]
    #[case(" book", vec!["1"])]
    #[case("tokio ", vec![])]
    #[case("https://", vec!["1", "2", "3", "4"])]
    #[case("nothing-matches", vec![])]
    fn test_text_filter(#[case] query: &str, #[case] expected: Vec<&str>) {
        let bookmarks = collection();
        let result = filter(&bookmarks, query, &TagSelection::new());
        assert_eq!(ids(&result), expected);
    }

    #[test]
    fn test_padded_query_is_not_trimmed() {
        let bookmarks = vec![
            bookmark("1", "Notebook", "https://notebook.example", &[]),
            bookmark("2", "A book", "https://a.example", &[]),
        ];
        let result = filter(&bookmarks, " book", &TagSelection::new());
        assert_eq!(ids(&result), vec!["2"]);
    }

    #[test]
    fn test_tags_are_and_combined() {
        let bookmarks = vec![
            bookmark("X", "X", "https://x.example", &["a", "b"]),
            bookmark("Y", "Y", "https://y.example", &["a"]),
        ];

        let both = filter(&bookmarks, "", &TagSelection::from_tags(["a", "b"]));
        assert_eq!(ids(&both), vec!["X"]);

        let only_a = filter(&bookmarks, "", &TagSelection::from_tags(["a"]));
        assert_eq!(ids(&only_a), vec!["X", "Y"]);
    }

    #[test]
    fn test_text_and_tags_compose() {
        let bookmarks = collection();
        let selected = TagSelection::from_tags(["docs"]);

        let result = filter(&bookmarks, "mozilla", &selected);
        assert_eq!(ids(&result), vec!["3"]);

        let result = filter(&bookmarks, "tokio", &selected);
        assert!(result.is_empty());
    }

    #[test]
    fn test_filter_preserves_order_and_source() {
        let mut bookmarks = collection();
        bookmarks.reverse();
        let before = bookmarks.clone();

        let result = filter(&bookmarks, "", &TagSelection::from_tags(["rust"]));

        assert_eq!(ids(&result), vec!["2", "1"]);
        assert_eq!(bookmarks, before);
    }

    #[test]
    fn test_tag_match_ignores_duplicate_tags() {
        let bookmarks = vec![bookmark("1", "T", "https://t.example", &["a", "a"])];
        let result = filter(&bookmarks, "", &TagSelection::from_tags(["a"]));
        assert_eq!(result.len(), 1);
    }

    #[rstest]
    #[case(4, 4, "", &[], "4 bookmarks")]
    #[case(1, 4, "rust", &[], "1 of 4 bookmarks")]
    #[case(2, 4, "", &["docs"], "2 of 4 bookmarks")]
    #[case(4, 4, "https", &[], "4 bookmarks")]
    fn test_filter_summary(
        #[case] shown: usize,
        #[case] total: usize,
        #[case] query: &str,
        #[case] tags: &[&str],
        #[case] expected: &str,
    ) {
        let selected = TagSelection::from_tags(tags.iter().copied());
        let summary = FilterSummary::new(shown, total, query, &selected);
        assert_eq!(summary.to_string(), expected);
    }
}
