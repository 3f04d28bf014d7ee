//! Authenticated symmetric encryption of short configuration values.
//!
//! Values are Fernet tokens (AES-128-CBC with an HMAC-SHA256 over version,
//! timestamp, IV and ciphertext). The key is the 32-byte Fernet key in its
//! URL-safe base64 text form, as stored under `SecretKeyFernet`, so files
//! written by earlier Fernet-based tooling remain readable.

use crate::error::{Error, Result};
use crate::secret::{Secret, SecretString};
use base64::engine::general_purpose::URL_SAFE;
use base64::Engine;
use fernet::Fernet;
use std::fmt;
use zeroize::Zeroizing;

/// Decoded key size in bytes (signing half + encryption half).
pub const KEY_SIZE: usize = 32;

/// Leading byte of every Fernet token.
pub const TOKEN_VERSION: u8 = 0x80;

/// A symmetric key. Never printed; see [`SymmetricKey::to_text`].
pub struct SymmetricKey {
    text: SecretString,
}

impl SymmetricKey {
    /// Generate a fresh random key.
    pub fn generate() -> Self {
        Self {
            text: Secret::new(Fernet::generate_key()),
        }
    }

    /// Parse the URL-safe base64 text form stored under `SecretKeyFernet`.
    pub fn from_text(text: &str) -> Result<Self> {
        let text = text.trim();
        let decoded = Zeroizing::new(URL_SAFE.decode(text)?);
        if decoded.len() != KEY_SIZE {
            return Err(Error::InvalidKey {
                reason: format!("expected {KEY_SIZE} bytes, got {}", decoded.len()),
            });
        }
        if Fernet::new(text).is_none() {
            return Err(Error::InvalidKey {
                reason: "not a Fernet key".to_string(),
            });
        }
        Ok(Self {
            text: Secret::new(text.to_string()),
        })
    }

    /// URL-safe base64 text form, suitable for a configuration value.
    pub fn to_text(&self) -> SecretString {
        self.text.clone()
    }

    fn fernet(&self) -> Result<Fernet> {
        Fernet::new(self.text.expose()).ok_or_else(|| Error::InvalidKey {
            reason: "not a Fernet key".to_string(),
        })
    }
}

impl fmt::Debug for SymmetricKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SymmetricKey")
            .field(&crate::secret::REDACTED)
            .finish()
    }
}

/// Generate a fresh random key.
pub fn generate_key() -> SymmetricKey {
    SymmetricKey::generate()
}

/// Encrypt `plaintext`, returning the Fernet token as ASCII bytes.
pub fn encrypt(key: &SymmetricKey, plaintext: &str) -> Result<Vec<u8>> {
    Ok(key.fernet()?.encrypt(plaintext.as_bytes()).into_bytes())
}

/// Decrypt a Fernet token. Token age is not checked.
///
/// Any altered byte, truncated token or wrong key yields
/// [`Error::TamperOrKeyMismatch`].
pub fn decrypt(key: &SymmetricKey, token: &[u8]) -> Result<SecretString> {
    let token = std::str::from_utf8(token).map_err(|_| Error::TamperOrKeyMismatch)?;
    let plaintext = Zeroizing::new(
        key.fernet()?
            .decrypt(token)
            .map_err(|_| Error::TamperOrKeyMismatch)?,
    );

    let text = std::str::from_utf8(&plaintext).map_err(|_| Error::NonUtf8Plaintext)?;
    Ok(Secret::new(text.to_string()))
}
