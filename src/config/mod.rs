mod defaults;
pub mod ini;
mod store;
mod validation;

pub use defaults::*;
pub use store::*;
pub use validation::*;

use crate::secret::REDACTED;

/// Whether a configuration value should be hidden when displayed.
///
/// Covers the decryption key and every field that is encrypted once
/// provisioned, since a source file still holds them in plaintext.
pub fn is_sensitive_key(key: &str) -> bool {
    key == KEY_SECRET_KEY_FERNET || ENCRYPTED_FIELDS.contains(&key)
}

/// Render every section for display, redacting sensitive values.
pub fn display_config(store: &ConfigStore) -> crate::error::Result<String> {
    let mut out = String::new();
    for (section, entries) in store.sections()? {
        out.push_str(&format!("Section: {section}\n"));
        for (key, value) in entries {
            let shown = if is_sensitive_key(key) { REDACTED } else { value.as_str() };
            out.push_str(&format!("  {key} = {shown}\n"));
        }
    }
    Ok(out)
}

/// Every section as a JSON object, redacting sensitive values.
pub fn display_config_json(store: &ConfigStore) -> crate::error::Result<serde_json::Value> {
    let redacted: ini::Sections = store
        .sections()?
        .iter()
        .map(|(section, entries)| {
            let entries = entries
                .iter()
                .map(|(key, value)| {
                    let shown = if is_sensitive_key(key) { REDACTED } else { value.as_str() };
                    (key.clone(), shown.to_string())
                })
                .collect();
            (section.clone(), entries)
        })
        .collect();
    Ok(serde_json::json!(redacted))
}
