use crate::models::Bookmark;
use std::collections::BTreeMap;

const HEADER: &str = "<!DOCTYPE NETSCAPE-Bookmark-file-1>
<!-- This is an automatically generated file.
     It will be read and overwritten.
     DO NOT EDIT! -->
<META HTTP-EQUIV=\"Content-Type\" CONTENT=\"text/html; charset=UTF-8\">
<TITLE>Bookmarks</TITLE>
<H1>Bookmarks</H1>
<DL><p>
";

const FOOTER: &str = "</DL><p>\n";

/// Serialize bookmarks to a Netscape bookmark file, stamped with the current time
pub fn encode(bookmarks: &[Bookmark]) -> String {
    encode_at(bookmarks, chrono::Utc::now().timestamp())
}

/// Serialize bookmarks to a Netscape bookmark file
///
/// Every tag becomes a folder (sorted by name) listing each bookmark that
/// carries it, in input order, so a bookmark with several tags appears in
/// several folders. Untagged bookmarks follow the folders at top level.
/// `now` (Unix seconds) stamps the folders and any bookmark without a
/// creation time.
pub fn encode_at(bookmarks: &[Bookmark], now: i64) -> String {
    let mut folders: BTreeMap<&str, Vec<&Bookmark>> = BTreeMap::new();
    let mut untagged: Vec<&Bookmark> = Vec::new();

    for bookmark in bookmarks {
        if bookmark.tags.is_empty() {
            untagged.push(bookmark);
            continue;
        }
        for tag in &bookmark.tags {
            let entries = folders.entry(tag.as_str()).or_default();
            // repeated tag on the same bookmark
            if entries.last().is_some_and(|last| std::ptr::eq(*last, bookmark)) {
                continue;
            }
            entries.push(bookmark);
        }
    }

    let mut html = String::from(HEADER);

    for (tag, entries) in &folders {
        html.push_str(&format!(
            "    <DT><H3 ADD_DATE=\"{now}\" LAST_MODIFIED=\"{now}\">{}</H3>\n",
            escape_html(tag)
        ));
        html.push_str("    <DL><p>\n");
        for bookmark in entries {
            push_link(&mut html, "        ", bookmark, now);
        }
        html.push_str("    </DL><p>\n");
    }

    for bookmark in untagged {
        push_link(&mut html, "    ", bookmark, now);
    }

    html.push_str(FOOTER);
    html
}

fn push_link(html: &mut String, indent: &str, bookmark: &Bookmark, now: i64) {
    let add_date = bookmark.created_epoch().unwrap_or(now);
    html.push_str(&format!(
        "{indent}<DT><A HREF=\"{}\" ADD_DATE=\"{add_date}\">{}</A>\n",
        escape_html(&bookmark.url),
        escape_html(&bookmark.title)
    ));
}

/// Escape the five HTML-significant characters
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Owner;
    use chrono::{TimeZone, Utc};
    use rstest::rstest;

    const NOW: i64 = 1_700_000_000;

    fn bookmark(url: &str, title: &str, tags: &[&str]) -> Bookmark {
        Bookmark {
            id: url.to_string(),
            owner: Owner::new("u"),
            url: url.to_string(),
            title: title.to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            favicon: None,
            created_at: None,
        }
    }

    #[test]
    fn test_encode_exact_document() {
        let mut dated = bookmark("https://a.example", "A", &["rust"]);
        dated.created_at = Some(Utc.timestamp_opt(1_600_000_000, 0).unwrap());
        let bookmarks = vec![dated, bookmark("https://b.example", "B", &[])];

        let expected = "<!DOCTYPE NETSCAPE-Bookmark-file-1>
<!-- This is an automatically generated file.
     It will be read and overwritten.
     DO NOT EDIT! -->
<META HTTP-EQUIV=\"Content-Type\" CONTENT=\"text/html; charset=UTF-8\">
<TITLE>Bookmarks</TITLE>
<H1>Bookmarks</H1>
<DL><p>
    <DT><H3 ADD_DATE=\"1700000000\" LAST_MODIFIED=\"1700000000\">rust</H3>
    <DL><p>
        <DT><A HREF=\"https://a.example\" ADD_DATE=\"1600000000\">A</A>
    </DL><p>
    <DT><A HREF=\"https://b.example\" ADD_DATE=\"1700000000\">B</A>
</DL><p>
";
        assert_eq!(encode_at(&bookmarks, NOW), expected);
    }

    #[test]
    fn test_encode_empty_collection() {
        let html = encode_at(&[], NOW);
        assert!(html.starts_with("<!DOCTYPE NETSCAPE-Bookmark-file-1>\n"));
        assert!(html.ends_with("<H1>Bookmarks</H1>\n<DL><p>\n</DL><p>\n"));
    }

    #[test]
    fn test_multi_tag_bookmark_listed_in_each_folder() {
        let bookmarks = vec![bookmark("https://x.example", "X", &["b", "a"])];
        let html = encode_at(&bookmarks, NOW);

        assert_eq!(html.matches("https://x.example").count(), 2);
        let a = html.find(">a</H3>").unwrap();
        let b = html.find(">b</H3>").unwrap();
        assert!(a < b, "folders must be sorted by tag name");
    }

    #[test]
    fn test_repeated_tag_lists_bookmark_once() {
        let bookmarks = vec![bookmark("https://x.example", "X", &["a", "a"])];
        let html = encode_at(&bookmarks, NOW);
        assert_eq!(html.matches(">a</H3>").count(), 1);
        assert_eq!(html.matches("https://x.example").count(), 1);
    }

    #[test]
    fn test_untagged_after_folders_regardless_of_input_order() {
        let bookmarks = vec![
            bookmark("https://untagged.example", "U", &[]),
            bookmark("https://zed.example", "Z", &["z"]),
        ];
        let html = encode_at(&bookmarks, NOW);

        let folder = html.find(">z</H3>").unwrap();
        let untagged = html.find("https://untagged.example").unwrap();
        assert!(folder < untagged);
    }

    #[test]
    fn test_folder_keeps_input_order() {
        let bookmarks = vec![
            bookmark("https://second.example", "Second", &["t"]),
            bookmark("https://first.example", "First", &["t"]),
        ];
        let html = encode_at(&bookmarks, NOW);
        assert!(html.find("Second").unwrap() < html.find("First").unwrap());
    }

    #[test]
    fn test_user_text_is_escaped() {
        let bookmarks = vec![bookmark(
            "https://e.example/?a=1&b=\"2\"",
            "A & B <script>",
            &["<tag>"],
        )];
        let html = encode_at(&bookmarks, NOW);

        assert!(html.contains(">A &amp; B &lt;script&gt;</A>"));
        assert!(html.contains("HREF=\"https://e.example/?a=1&amp;b=&quot;2&quot;\""));
        assert!(html.contains(">&lt;tag&gt;</H3>"));
        assert!(!html.contains("<script>"));
    }

    #[rstest]
    #[case("plain", "plain")]
    #[case("a&b", "a&amp;b")]
    #[case("<>", "&lt;&gt;")]
    #[case("\"quoted\"", "&quot;quoted&quot;")]
    #[case("it's", "it&#39;s")]
    #[case("&amp;", "&amp;amp;")]
    #[case("", "")]
    fn test_escape_html(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(escape_html(input), expected);
    }
}
