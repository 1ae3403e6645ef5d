use std::path::PathBuf;

pub fn get_default_dbdir() -> PathBuf {
    if let Ok(path) = std::env::var("TAGMARKS_DATA_DIR") {
        return PathBuf::from(path);
    }

    if let Ok(path) = std::env::var("XDG_DATA_HOME") {
        return PathBuf::from(path).join("tagmarks");
    }

    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".local/share/tagmarks");
    }

    #[cfg(target_os = "windows")]
    if let Ok(appdata) = std::env::var("APPDATA") {
        return PathBuf::from(appdata).join("tagmarks");
    }

    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}

pub fn get_config_dir() -> PathBuf {
    if let Ok(path) = std::env::var("XDG_CONFIG_HOME") {
        return PathBuf::from(path).join("tagmarks");
    }

    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".config/tagmarks");
    }

    #[cfg(target_os = "windows")]
    if let Ok(appdata) = std::env::var("APPDATA") {
        return PathBuf::from(appdata).join("tagmarks");
    }

    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}

/// Shorten `text` to at most `max` characters, ending in `...` when cut
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(3)).collect();
    format!("{}...", kept)
}
