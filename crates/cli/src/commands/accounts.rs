//! Demo account listing.

use std::io::Write;

use shophere_storefront::db::credentials::{DEMO_PASSWORD, demo_identities};

/// Print the seeded demo accounts.
///
/// # Errors
///
/// Returns an error if stdout cannot be written.
pub fn list() -> Result<(), Box<dyn std::error::Error>> {
    let mut out = std::io::stdout().lock();
    for identity in demo_identities()? {
        let business = identity
            .business_name
            .map(|name| format!(" ({name})"))
            .unwrap_or_default();
        writeln!(
            out,
            "{:<8} {:<20} {}{business}",
            identity.role.as_str(),
            identity.email.as_str(),
            identity.name
        )?;
    }
    writeln!(out, "\nAll demo accounts use the password \"{DEMO_PASSWORD}\".")?;
    Ok(())
}
