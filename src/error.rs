//! Error taxonomy shared by every module.
//!
//! Nothing in the library terminates the process. Failures travel up as
//! [`Error`] values and the binary maps them to an exit status with
//! [`Error::exit_code`]. Messages carry identifiers only (paths, keys, role
//! ARNs, model ids), never key material or decrypted values.

use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("configuration file not found: {}", path.display())]
    ConfigFileNotFound { path: PathBuf },

    #[error("failed to parse configuration file '{}' at line {line}: {message}", path.display())]
    ConfigParse {
        path: PathBuf,
        line: usize,
        message: String,
    },

    #[error("key '{key}' not found in section '{section}'")]
    KeyNotFound { section: String, key: String },

    #[error("configuration has no [models] section")]
    ModelsSectionMissing,

    #[error("configuration validation failed:\n{}", problems.join("\n"))]
    ConfigInvalid { problems: Vec<String> },

    #[error("malformed text encoding: {0}")]
    MalformedEncoding(#[from] base64::DecodeError),

    #[error("invalid encryption key: {reason}")]
    InvalidKey { reason: String },

    #[error("ciphertext failed authentication (tampered data or wrong key)")]
    TamperOrKeyMismatch,

    #[error("decrypted value is not valid UTF-8")]
    NonUtf8Plaintext,

    #[error("encryption failed: {0}")]
    Encryption(String),

    #[error("access key pair was rejected: {message}")]
    Authentication { message: String },

    #[error("unable to assume role {role_arn}: {message}")]
    RoleAssumption { role_arn: String, message: String },

    #[error("network failure during {operation}: {message}")]
    Network { operation: String, message: String },

    #[error("failed to invoke model {model_id}: {message}")]
    Invocation { model_id: String, message: String },

    #[error("I/O error on '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("prompt failed: {0}")]
    Prompt(String),

    #[error("invalid selection: {0}")]
    InvalidSelection(String),
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn key_not_found(section: &str, key: &str) -> Self {
        Self::KeyNotFound {
            section: section.to_string(),
            key: key.to_string(),
        }
    }

    /// Process exit status for this failure. Never zero.
    pub fn exit_code(&self) -> u8 {
        match self {
            Error::Io { .. } => 1,
            Error::ConfigFileNotFound { .. }
            | Error::ConfigParse { .. }
            | Error::KeyNotFound { .. }
            | Error::ModelsSectionMissing
            | Error::ConfigInvalid { .. } => 2,
            Error::MalformedEncoding(_)
            | Error::InvalidKey { .. }
            | Error::TamperOrKeyMismatch
            | Error::NonUtf8Plaintext
            | Error::Encryption(_) => 3,
            Error::Authentication { .. } | Error::RoleAssumption { .. } => 4,
            Error::Network { .. } => 5,
            Error::Invocation { .. } => 6,
            Error::Prompt(_) | Error::InvalidSelection(_) => 7,
        }
    }
}
