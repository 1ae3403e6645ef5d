use crate::error::Result;
use crate::models::validate_url;
use log::debug;

/// Open a bookmark's URL in the system browser
pub fn open_url(url: &str) -> Result<()> {
    let parsed = validate_url(url)?;
    debug!("Opening {}", parsed);
    open::that(parsed.as_str())?;
    Ok(())
}
