use super::defaults::*;
use super::ConfigStore;
use crate::credentials::CredentialSource;
use crate::error::{Error, Result};

/// Validation errors for configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigValidationError {
    pub path: String,
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

fn required(
    store: &ConfigStore,
    key: &str,
    reason: &str,
    errors: &mut Vec<ConfigValidationError>,
) -> Result<()> {
    let present = store
        .get_optional(DEFAULT_SECTION, key)?
        .is_some_and(|v| !v.is_empty());
    if !present {
        errors.push(ConfigValidationError {
            path: format!("{DEFAULT_SECTION}.{key}"),
            message: reason.to_string(),
        });
    }
    Ok(())
}

/// Check that every key the run-time path will read is present.
///
/// Reports all problems at once rather than stopping at the first one.
/// Only I/O and parse failures of the store itself are returned as `Err`.
pub fn validate_config(store: &ConfigStore) -> Result<Vec<ConfigValidationError>> {
    let mut errors = Vec::new();

    required(store, KEY_REGION, "Region is required", &mut errors)?;
    required(store, KEY_USE_VPCE, "UseVPCe must be set to 'true' or 'false'", &mut errors)?;

    let use_vpce = store.get_optional(DEFAULT_SECTION, KEY_USE_VPCE)? == Some("true");
    let source = CredentialSource::from_setting(
        store.get_optional(DEFAULT_SECTION, KEY_GET_CREDENTIALS_FROM)?,
    );

    if use_vpce {
        required(
            store,
            KEY_VPC_ENDPOINT_URL,
            "VPC endpoint URL is required when UseVPCe is true",
            &mut errors,
        )?;
    }

    match source {
        CredentialSource::RoleAssumption => {
            required(store, KEY_ASSUME_ROLE_ARN, "role ARN is required for GetCredentialsFrom = 1", &mut errors)?;
        }
        CredentialSource::ApiKeyAssumption => {
            required(store, KEY_ASSUME_ROLE_ARN, "role ARN is required for GetCredentialsFrom = 2", &mut errors)?;
            required(store, KEY_ACCESS_KEY, "access key is required for GetCredentialsFrom = 2", &mut errors)?;
            required(store, KEY_SECRET_KEY, "secret key is required for GetCredentialsFrom = 2", &mut errors)?;
        }
        CredentialSource::AmbientIdentity => {}
    }

    if use_vpce || source.reads_encrypted_fields() {
        required(
            store,
            KEY_SECRET_KEY_FERNET,
            "decryption key is required to read encrypted fields",
            &mut errors,
        )?;
    }

    match store.sections()?.get(MODELS_SECTION) {
        None => errors.push(ConfigValidationError {
            path: MODELS_SECTION.to_string(),
            message: "models section is missing".to_string(),
        }),
        Some(models) if models.is_empty() => errors.push(ConfigValidationError {
            path: MODELS_SECTION.to_string(),
            message: "models section lists no models".to_string(),
        }),
        Some(_) => {}
    }

    Ok(errors)
}

/// Like [`validate_config`], but any problem is an [`Error::ConfigInvalid`].
pub fn validate_config_object(store: &ConfigStore) -> Result<()> {
    let errors = validate_config(store)?;
    if errors.is_empty() {
        Ok(())
    } else {
        Err(Error::ConfigInvalid {
            problems: errors.iter().map(|e| e.to_string()).collect(),
        })
    }
}
