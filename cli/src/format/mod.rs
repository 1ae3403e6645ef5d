use crate::{
    format::{
        json::JsonBookmark, plain::PlainBookmark, toml::TomlBookmark, traits::BookmarkFormat,
        yaml::YamlBookmark,
    },
    output::colorize::{Colorize, ColorizeBookmark},
};
use tagmarks::models::Bookmark;

pub mod json;
pub mod plain;
pub mod toml;
pub mod traits;
pub mod yaml;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Yaml,
    Toml,
    Plain,
    Colored,
}

impl OutputFormat {
    pub fn from_string(format: &str) -> Self {
        match format {
            "json" => OutputFormat::Json,
            "yaml" | "yml" => OutputFormat::Yaml,
            "toml" => OutputFormat::Toml,
            "plain" => OutputFormat::Plain,
            _ => OutputFormat::Colored,
        }
    }

    /// Whether the output is meant for a terminal rather than another program
    pub fn is_human(self) -> bool {
        matches!(self, OutputFormat::Plain | OutputFormat::Colored)
    }

    pub fn render(self, bookmark: &Bookmark, no_color: bool) -> String {
        match self {
            OutputFormat::Json => JsonBookmark(bookmark).render(),
            OutputFormat::Yaml => YamlBookmark(bookmark).render(),
            OutputFormat::Toml => TomlBookmark(bookmark).render(),
            OutputFormat::Colored if !no_color => ColorizeBookmark(bookmark).to_colored(),
            OutputFormat::Plain | OutputFormat::Colored => PlainBookmark(bookmark).render(),
        }
    }

    pub fn print_bookmarks(self, records: &[Bookmark], no_color: bool) {
        for b in records {
            println!("{}", self.render(b, no_color));
        }
    }
}
