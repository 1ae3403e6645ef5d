use super::markup::{Html5Parser, MarkupParser, MarkupTree};
use crate::error::{Result, TagmarksError};
use crate::models::NewBookmark;
use log::debug;
use std::collections::HashMap;
use std::path::Path;

const LINK: &str = "a";
const FOLDER_ITEM: &str = "dt";
const FOLDER_HEADING: &str = "h3";

/// Decode a Netscape bookmark file into unsaved bookmarks
pub fn decode(document: &str) -> Result<Vec<NewBookmark>> {
    decode_with(&Html5Parser, document)
}

/// Decode raw file bytes, which must be UTF-8
pub fn decode_bytes(bytes: &[u8]) -> Result<Vec<NewBookmark>> {
    let document = std::str::from_utf8(bytes)
        .map_err(|e| TagmarksError::Parse(format!("document is not valid UTF-8: {}", e)))?;
    decode(document)
}

/// Read and decode a bookmark file from disk
pub fn read_exchange_file(path: &Path) -> Result<Vec<NewBookmark>> {
    let bytes = std::fs::read(path)?;
    decode_bytes(&bytes)
}

/// Decode with an explicit markup parser
///
/// Every link element with a non-empty destination and non-empty text yields
/// one record, in document order; links missing either are skipped. A record
/// gets at most one tag, the name of the nearest enclosing folder.
///
/// Browsers emit each folder as a `DT` item holding an `H3` heading followed
/// by a nested `DL`. The folder of a link is found by walking up from the link
/// and, at each ancestor, taking the first heading anywhere below it: the
/// first non-blank one names the folder. The walk never goes above the
/// outermost `DT` item, so links sitting directly in the top-level list stay
/// untagged even when folders precede them.
///
/// A link listed in a folder after one of its subfolders picks up that
/// subfolder's name, and a folder with a blank heading inherits from the
/// folder around it. Files written by [`super::encode`] never nest folders, so
/// they decode exactly.
///
/// Headings outside any `DT` item are not folders: a link under
/// `<div><h3>Dev</h3><ul><li><a ..>` decodes untagged.
pub fn decode_with<P: MarkupParser>(parser: &P, document: &str) -> Result<Vec<NewBookmark>> {
    let tree = parser.parse(document)?;

    let mut folders = FolderIndex::new(&tree);
    let mut records = Vec::new();
    let mut skipped = 0usize;

    for link in tree.elements_named(LINK) {
        let url = tree.attribute(&link, "href").unwrap_or_default();
        let title = tree.text(&link).trim().to_string();

        if url.is_empty() || title.is_empty() {
            skipped += 1;
            continue;
        }

        records.push(NewBookmark {
            url,
            title,
            tags: folders.folder_of(&link).into_iter().collect(),
            favicon: None,
        });
    }

    debug!(
        "Decoded {} bookmarks ({} links skipped)",
        records.len(),
        skipped
    );

    Ok(records)
}

/// Folder lookup with the per-ancestor heading scan memoized
///
/// Links in one folder share their upper ancestors, so each ancestor's subtree
/// is scanned for a heading at most once per document.
struct FolderIndex<'t, T: MarkupTree> {
    tree: &'t T,
    headings: HashMap<usize, Option<String>>,
}

impl<'t, T: MarkupTree> FolderIndex<'t, T> {
    fn new(tree: &'t T) -> Self {
        Self {
            tree,
            headings: HashMap::new(),
        }
    }

    fn folder_of(&mut self, link: &T::Node) -> Option<String> {
        let tree = self.tree;
        let ancestors: Vec<T::Node> = std::iter::successors(tree.parent(link), |node| tree.parent(node))
            .take_while(|node| tree.name(node).is_some())
            .collect();

        let outermost_item = ancestors
            .iter()
            .rposition(|node| tree.name(node).as_deref() == Some(FOLDER_ITEM))?;

        ancestors[..=outermost_item]
            .iter()
            .find_map(|ancestor| self.heading_below(ancestor))
    }

    /// Trimmed text of the first heading under `node`, if it is non-blank
    fn heading_below(&mut self, node: &T::Node) -> Option<String> {
        let tree = self.tree;
        self.headings
            .entry(tree.node_key(node))
            .or_insert_with(|| {
                let heading = tree.first_descendant_named(node, FOLDER_HEADING)?;
                let name = tree.text(&heading).trim().to_string();
                (!name.is_empty()).then_some(name)
            })
            .clone()
    }
}

/// Collapse records that share a URL into the first occurrence
///
/// A bookmark exported under several tags comes back once per folder; this
/// folds those copies together, keeping the first title and favicon and the
/// union of tags in first-seen order.
pub fn merge_duplicates(records: Vec<NewBookmark>) -> Vec<NewBookmark> {
    let mut merged: Vec<NewBookmark> = Vec::with_capacity(records.len());
    let mut index: HashMap<String, usize> = HashMap::new();

    for record in records {
        match index.get(&record.url) {
            Some(&pos) => {
                let existing = &mut merged[pos];
                for tag in record.tags {
                    if !existing.tags.contains(&tag) {
                        existing.tags.push(tag);
                    }
                }
                if existing.favicon.is_none() {
                    existing.favicon = record.favicon;
                }
            }
            None => {
                index.insert(record.url.clone(), merged.len());
                merged.push(record);
            }
        }
    }

    merged
}
