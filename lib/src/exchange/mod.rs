//! Netscape bookmark file format, as written and read by every major browser.

pub mod decode;
pub mod encode;
pub mod markup;

pub use decode::{decode, decode_bytes, decode_with, merge_duplicates, read_exchange_file};
pub use encode::{encode, encode_at, escape_html};
pub use markup::{Html5Parser, MarkupParser, MarkupTree};

use crate::error::Result;
use crate::models::Bookmark;
use chrono::NaiveDate;
use log::info;
use std::path::Path;

/// Suggested download name for an export made on `date`
pub fn export_filename(date: NaiveDate) -> String {
    format!("bookmarks_{}.html", date.format("%Y-%m-%d"))
}

/// Encode `bookmarks` and write them to `path`
pub fn write_export(path: &Path, bookmarks: &[Bookmark]) -> Result<()> {
    std::fs::write(path, encode(bookmarks))?;
    info!("Exported {} bookmarks to {}", bookmarks.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Owner;
    use tempfile::tempdir;

    #[test]
    fn test_export_filename() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
        assert_eq!(export_filename(date), "bookmarks_2024-03-07.html");
    }

    #[test]
    fn test_write_export_then_read_back() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.html");
        let bookmarks = vec![Bookmark {
            id: "1".to_string(),
            owner: Owner::new("u"),
            url: "https://example.com".to_string(),
            title: "Example".to_string(),
            tags: vec!["t".to_string()],
            favicon: None,
            created_at: None,
        }];

        write_export(&path, &bookmarks).unwrap();
        let records = read_exchange_file(&path).unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].url, "https://example.com");
        assert_eq!(records[0].tags, vec!["t"]);
    }
}
