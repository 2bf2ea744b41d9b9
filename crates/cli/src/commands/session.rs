//! Durable session record maintenance.

use std::io::Write;

use tracing::info;

use shophere_storefront::config::StorefrontConfig;
use shophere_storefront::db::{FileSessionStore, SessionStore};
use shophere_storefront::models::session_keys;

/// Print the stored session entries.
///
/// # Errors
///
/// Returns an error if the record cannot be read or stdout cannot be written.
pub fn show(config: &StorefrontConfig) -> Result<(), Box<dyn std::error::Error>> {
    let store = FileSessionStore::new(&config.session_file);
    let entries = store.entries()?;

    let mut out = std::io::stdout().lock();
    if entries.is_empty() {
        writeln!(out, "No stored session at {}", store.path().display())?;
        return Ok(());
    }

    writeln!(out, "Session record at {}:", store.path().display())?;
    for (key, value) in &entries {
        writeln!(out, "  {key} = {value}")?;
    }
    Ok(())
}

/// Remove the stored session.
///
/// # Errors
///
/// Returns an error if the record cannot be written.
pub fn clear(config: &StorefrontConfig) -> Result<(), Box<dyn std::error::Error>> {
    let store = FileSessionStore::new(&config.session_file);
    for key in [session_keys::USER, session_keys::USER_ROLE] {
        store.remove(key)?;
    }
    info!(path = %store.path().display(), "Cleared stored session");
    Ok(())
}
