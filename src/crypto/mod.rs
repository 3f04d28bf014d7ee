pub mod cipher;
pub mod codec;

pub use cipher::{decrypt, encrypt, generate_key, SymmetricKey};

use crate::error::Result;
use crate::secret::SecretString;

/// Encrypt and text-encode a plaintext value for storage:
/// `codec::encode(cipher::encrypt(key, plaintext))`.
pub fn seal_field(key: &SymmetricKey, plaintext: &str) -> Result<String> {
    let token = cipher::encrypt(key, plaintext)?;
    Ok(codec::encode(&token))
}

/// Decode and decrypt a stored field value.
pub fn open_field(key: &SymmetricKey, stored: &str) -> Result<SecretString> {
    let token = codec::decode(stored)?;
    cipher::decrypt(key, &token)
}
