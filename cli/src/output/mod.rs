pub mod colorize;

/// Leading eight characters of a bookmark id, enough to pass back to `edit`/`delete`/`open`
pub fn short_id(id: &str) -> &str {
    id.get(..8).unwrap_or(id)
}
