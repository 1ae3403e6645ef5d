/// One bookmark rendered in a machine- or human-readable format
pub trait BookmarkFormat {
    fn render(&self) -> String;
}
