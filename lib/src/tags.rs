use crate::models::Bookmark;
use std::collections::BTreeSet;

/// Parse comma-separated tags, filtering empty ones
pub fn parse_tags(tags_str: &str) -> Vec<String> {
    tags_str
        .split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .collect()
}

/// Trim every tag and drop the empty ones, keeping order and duplicates
pub fn normalize_tags<I, S>(tags: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    tags.into_iter()
        .map(|t| t.as_ref().trim().to_string())
        .filter(|t| !t.is_empty())
        .collect()
}

/// Every distinct tag across the collection, sorted lexicographically
///
/// This is the tag index used to populate filter controls. It is recomputed
/// from scratch for each call.
pub fn tag_universe(bookmarks: &[Bookmark]) -> Vec<String> {
    bookmarks
        .iter()
        .flat_map(|b| b.tags.iter())
        .cloned()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Input driving the tag filter controls
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagToggle {
    /// Select the tag if unselected, deselect it otherwise
    Tag(String),
    /// Empty the whole selection
    Clear,
}

/// Set of tags currently selected as filters
///
/// Behaves as a set; insertion order is kept so controls render selections in
/// the order the user picked them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagSelection {
    tags: Vec<String>,
}

impl TagSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_tags<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut selection = Self::new();
        for tag in tags {
            let tag = tag.into();
            if !selection.contains(&tag) {
                selection.tags.push(tag);
            }
        }
        selection
    }

    pub fn toggle(&mut self, tag: &str) {
        if let Some(pos) = self.tags.iter().position(|t| t == tag) {
            self.tags.remove(pos);
        } else {
            self.tags.push(tag.to_string());
        }
    }

    pub fn clear(&mut self) {
        self.tags.clear();
    }

    /// Pure state transition: the selection that results from `input`
    pub fn apply(&self, input: TagToggle) -> TagSelection {
        let mut next = self.clone();
        match input {
            TagToggle::Tag(tag) => next.toggle(&tag),
            TagToggle::Clear => next.clear(),
        }
        next
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tags.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.tags
    }
}

impl<S: Into<String>> FromIterator<S> for TagSelection {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::from_tags(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Owner;
    use rstest::rstest;

    fn bookmark(tags: &[&str]) -> Bookmark {
        Bookmark {
            id: "id".to_string(),
            owner: Owner::new("u"),
            url: "https://example.com".to_string(),
            title: "Example".to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            favicon: None,
            created_at: None,
        }
    }

    #[rstest]
    #[case("", vec![])]
    #[case(",", vec![])]
    #[case(",,,", vec![])]
    #[case("rust", vec!["rust"])]
    #[case("rust,testing", vec!["rust", "testing"])]
    #[case(",rust,testing,", vec!["rust", "testing"])]
    #[case("development, react, tutorial", vec!["development", "react", "tutorial"])]
    #[case("  rust  ,  testing  ", vec!["rust", "testing"])]
    #[case("rust,,testing", vec!["rust", "testing"])]
    #[case("two words, more", vec!["two words", "more"])]
    fn test_parse_tags(#[case] input: &str, #[case] expected: Vec<&str>) {
        assert_eq!(parse_tags(input), expected);
    }

    #[test]
    fn test_parse_tags_preserves_order() {
        assert_eq!(parse_tags("z,a,m,b"), vec!["z", "a", "m", "b"]);
    }

    #[test]
    fn test_parse_tags_handles_unicode() {
        assert_eq!(
            parse_tags("rust,测试,программирование"),
            vec!["rust", "测试", "программирование"]
        );
    }

    #[test]
    fn test_normalize_tags_keeps_duplicates() {
        assert_eq!(normalize_tags([" a", "b ", " ", "a"]), vec!["a", "b", "a"]);
    }

    #[test]
    fn test_tag_universe_sorted_and_distinct() {
        let bookmarks = vec![
            bookmark(&["web", "rust"]),
            bookmark(&[]),
            bookmark(&["async", "rust"]),
        ];
        assert_eq!(tag_universe(&bookmarks), vec!["async", "rust", "web"]);
    }

    #[test]
    fn test_tag_universe_empty_collection() {
        assert!(tag_universe(&[]).is_empty());
    }

    #[test]
    fn test_toggle_adds_then_removes() {
        let mut selection = TagSelection::new();
        selection.toggle("a");
        selection.toggle("b");
        assert_eq!(selection.as_slice(), ["a", "b"]);

        selection.toggle("a");
        assert_eq!(selection.as_slice(), ["b"]);
    }

    #[test]
    fn test_apply_is_pure() {
        let selection = TagSelection::from_tags(["a"]);
        let next = selection.apply(TagToggle::Tag("b".to_string()));

        assert_eq!(selection.as_slice(), ["a"]);
        assert_eq!(next.as_slice(), ["a", "b"]);
        assert!(next.apply(TagToggle::Clear).is_empty());
    }

    #[test]
    fn test_from_tags_dedups() {
        let selection: TagSelection = ["a", "b", "a"].into_iter().collect();
        assert_eq!(selection.len(), 2);
        assert!(selection.contains("a"));
        assert!(selection.contains("b"));
    }
}
