/// Default configuration constants and reserved names.

/// Configuration file used when no path is given.
pub const DEFAULT_CONFIG_PATH: &str = "config.properties";

/// Section holding connection and credential settings.
pub const DEFAULT_SECTION: &str = "default";

/// Section holding `displayName = modelIdentifier` pairs, in order.
pub const MODELS_SECTION: &str = "models";

pub const KEY_REGION: &str = "Region";
pub const KEY_USE_VPCE: &str = "UseVPCe";
pub const KEY_VPC_ENDPOINT_URL: &str = "VPCEndpointURL";
pub const KEY_GET_CREDENTIALS_FROM: &str = "GetCredentialsFrom";
pub const KEY_ASSUME_ROLE_ARN: &str = "AssumeRoleARN";
pub const KEY_ACCESS_KEY: &str = "AccessKey";
pub const KEY_SECRET_KEY: &str = "SecretKey";

/// Decryption key for the encrypted fields. Stored unencrypted.
pub const KEY_SECRET_KEY_FERNET: &str = "SecretKeyFernet";

/// Fields stored encrypted, in the order the provisioning tool processes them.
pub const ENCRYPTED_FIELDS: [&str; 4] = [
    KEY_ACCESS_KEY,
    KEY_SECRET_KEY,
    KEY_ASSUME_ROLE_ARN,
    KEY_VPC_ENDPOINT_URL,
];

/// Maximum size for a config file (1 MB).
pub const MAX_CONFIG_FILE_BYTES: u64 = 1024 * 1024;
