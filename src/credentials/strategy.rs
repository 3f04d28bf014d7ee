use super::fields::FieldDecryptor;
use crate::config::{
    ConfigStore, DEFAULT_SECTION, KEY_ACCESS_KEY, KEY_ASSUME_ROLE_ARN, KEY_GET_CREDENTIALS_FROM,
    KEY_SECRET_KEY,
};
use crate::error::Result;
use crate::secret::SecretString;
use tracing::info;

/// Which strategy the `GetCredentialsFrom` setting selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialSource {
    /// `1`: assume a role with the process's ambient identity.
    RoleAssumption,
    /// `2`: assume a role with a long-lived access key pair.
    ApiKeyAssumption,
    /// Anything else, including an absent setting.
    AmbientIdentity,
}

impl CredentialSource {
    pub fn from_setting(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some("1") => CredentialSource::RoleAssumption,
            Some("2") => CredentialSource::ApiKeyAssumption,
            _ => CredentialSource::AmbientIdentity,
        }
    }

    /// Read the setting once from the `[default]` section.
    pub fn from_store(store: &ConfigStore) -> Result<Self> {
        let value = store.get_optional(DEFAULT_SECTION, KEY_GET_CREDENTIALS_FROM)?;
        let source = Self::from_setting(value);
        info!(setting = value.unwrap_or("<unset>"), ?source, "Selected credential source");
        Ok(source)
    }

    pub fn reads_encrypted_fields(self) -> bool {
        !matches!(self, CredentialSource::AmbientIdentity)
    }
}

/// Long-lived key pair used to authenticate before assuming a role.
#[derive(Debug, Clone)]
pub struct AccessKeyPair {
    pub access_key_id: SecretString,
    pub secret_access_key: SecretString,
}

/// A strategy with its decrypted inputs.
#[derive(Debug)]
pub enum CredentialStrategy {
    RoleAssumption {
        target_role_arn: String,
    },
    ApiKeyAssumption {
        keys: AccessKeyPair,
        target_role_arn: String,
    },
    AmbientIdentity,
}

impl CredentialStrategy {
    /// Select the strategy and decrypt only the fields it needs.
    pub fn load(store: &ConfigStore) -> Result<Self> {
        match CredentialSource::from_store(store)? {
            CredentialSource::RoleAssumption => {
                let fields = FieldDecryptor::from_store(store)?;
                Ok(CredentialStrategy::RoleAssumption {
                    target_role_arn: fields.open(KEY_ASSUME_ROLE_ARN)?.into_inner(),
                })
            }
            CredentialSource::ApiKeyAssumption => {
                let fields = FieldDecryptor::from_store(store)?;
                let target_role_arn = fields.open(KEY_ASSUME_ROLE_ARN)?.into_inner();
                let keys = AccessKeyPair {
                    access_key_id: fields.open(KEY_ACCESS_KEY)?,
                    secret_access_key: fields.open(KEY_SECRET_KEY)?,
                };
                Ok(CredentialStrategy::ApiKeyAssumption {
                    keys,
                    target_role_arn,
                })
            }
            CredentialSource::AmbientIdentity => Ok(CredentialStrategy::AmbientIdentity),
        }
    }

    pub fn source(&self) -> CredentialSource {
        match self {
            CredentialStrategy::RoleAssumption { .. } => CredentialSource::RoleAssumption,
            CredentialStrategy::ApiKeyAssumption { .. } => CredentialSource::ApiKeyAssumption,
            CredentialStrategy::AmbientIdentity => CredentialSource::AmbientIdentity,
        }
    }
}
