use crate::config::{ConfigStore, DEFAULT_SECTION, KEY_SECRET_KEY_FERNET};
use crate::crypto::{open_field, SymmetricKey};
use crate::error::Result;
use crate::secret::SecretString;
use tracing::error;

/// Decrypts configuration fields with the key stored alongside them.
pub struct FieldDecryptor<'a> {
    store: &'a ConfigStore,
    key: SymmetricKey,
}

impl<'a> FieldDecryptor<'a> {
    /// Read `SecretKeyFernet` from the store.
    pub fn from_store(store: &'a ConfigStore) -> Result<Self> {
        let text = store.get(DEFAULT_SECTION, KEY_SECRET_KEY_FERNET)?;
        let key = SymmetricKey::from_text(text).map_err(|e| {
            error!(field = KEY_SECRET_KEY_FERNET, error = %e, "Stored decryption key is unusable");
            e
        })?;
        Ok(Self { store, key })
    }

    /// Decode and decrypt `field` from the `[default]` section.
    pub fn open(&self, field: &str) -> Result<SecretString> {
        let stored = self.store.get(DEFAULT_SECTION, field)?;
        open_field(&self.key, stored).map_err(|e| {
            error!(field, error = %e, "Failed to decrypt configuration field");
            e
        })
    }
}
