//! One-time provisioning of an encrypted configuration file.
//!
//! Reads a plaintext configuration, generates a fresh key, stores it under
//! `SecretKeyFernet`, replaces each sensitive field with its sealed form and
//! writes the result to a new path. The destination is only created once
//! every field has been sealed, and the write itself is atomic, so a failure
//! at any step leaves no output file.

use crate::config::{ConfigStore, DEFAULT_SECTION, ENCRYPTED_FIELDS, KEY_SECRET_KEY_FERNET};
use crate::crypto::{generate_key, seal_field};
use crate::error::Result;
use std::path::{Path, PathBuf};
use tracing::info;

/// Outcome of a provisioning run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisioningReport {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub encrypted_fields: Vec<String>,
}

/// Encrypt the sensitive fields of `source` into `destination`.
pub fn encrypt_config(source: &Path, destination: &Path) -> Result<ProvisioningReport> {
    let mut store = ConfigStore::new(source);
    store.reinitialize(source)?;

    let key = generate_key();
    store.set(DEFAULT_SECTION, KEY_SECRET_KEY_FERNET, key.to_text().into_inner())?;
    info!("Generated encryption key");

    let mut encrypted_fields = Vec::with_capacity(ENCRYPTED_FIELDS.len());
    for field in ENCRYPTED_FIELDS {
        let sealed = {
            let plaintext = store.get(DEFAULT_SECTION, field)?;
            seal_field(&key, plaintext)?
        };
        store.set(DEFAULT_SECTION, field, sealed)?;
        info!(field, "Encrypted and stored field");
        encrypted_fields.push(field.to_string());
    }

    store.write(destination)?;
    info!("Encrypted configuration file saved at {}", destination.display());

    Ok(ProvisioningReport {
        source: source.to_path_buf(),
        destination: destination.to_path_buf(),
        encrypted_fields,
    })
}
