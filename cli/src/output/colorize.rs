use crate::output::short_id;
use owo_colors::OwoColorize;
use tagmarks::models::Bookmark;

pub trait Colorize {
    fn to_colored(&self) -> String;
}

pub struct ColorizeBookmark<'a>(pub &'a Bookmark);

impl<'a> Colorize for ColorizeBookmark<'a> {
    fn to_colored(&self) -> String {
        let b = self.0;
        let id = short_id(&b.id);
        let mut s = String::new();
        s.push_str(&format!(
            "{}. {} {}\n",
            id.bright_blue(),
            b.title.bold().green(),
            format!("({})", b.display_domain()).bright_black(),
        ));
        // padding for alignment
        let padding = id.len() + 3;
        s.push_str(&format!("{:>padding$} {}\n", ">".red(), b.url.yellow()));

        if !b.tags.is_empty() {
            let tags_str = b.tags.join(", ");
            s.push_str(&format!("{:>padding$} {}\n", "#".red(), tags_str.blue()));
        }
        if let Some(created) = b.created_at {
            let date = created.format("%Y-%m-%d").to_string();
            s.push_str(&format!("{:>padding$} {}\n", "@".red(), date.bright_black()));
        }
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tagmarks::models::Owner;

    fn bookmark(tags: &[&str]) -> Bookmark {
        Bookmark {
            id: "42abcdef-0000-4000-8000-000000000000".to_string(),
            owner: Owner::new("alice"),
            url: "https://www.rust-lang.org/learn".to_string(),
            title: "Rust Programming Language".to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            favicon: None,
            created_at: Some("2024-03-01T12:00:00Z".parse().unwrap()),
        }
    }

    #[test]
    fn test_colorize_bookmark_with_tags() {
        let colorized = ColorizeBookmark(&bookmark(&["rust", "testing"])).to_colored();

        assert!(colorized.contains("rust, testing"));
        assert!(colorized.contains('#'));
    }

    #[test]
    fn test_colorize_bookmark_without_tags() {
        let colorized = ColorizeBookmark(&bookmark(&[])).to_colored();

        let has_tag_line = colorized.lines().any(|line| line.trim().starts_with('#'));
        assert!(!has_tag_line, "Should not have tag line for empty tags");
    }

    #[test]
    fn test_colorize_output_structure() {
        let colorized = ColorizeBookmark(&bookmark(&["rust"])).to_colored();
        let lines: Vec<&str> = colorized.lines().collect();

        assert_eq!(lines.len(), 4);
        assert!(lines[0].contains("42abcdef"));
        assert!(!lines[0].contains("42abcdef-"));
        assert!(lines[0].contains("Rust Programming Language"));
        assert!(lines[0].contains("rust-lang.org"));
        assert!(lines[1].contains("https://www.rust-lang.org/learn"));
        assert!(lines[3].contains("2024-03-01"));
    }
}
