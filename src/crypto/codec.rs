use crate::error::Result;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;

/// Standard base64 with padding, the form stored in configuration files.
pub fn encode(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// Fails with [`crate::error::Error::MalformedEncoding`] on characters outside
/// the alphabet or bad padding.
pub fn decode(text: &str) -> Result<Vec<u8>> {
    Ok(STANDARD.decode(text.trim())?)
}
