//! Credential resolution.
//!
//! `GetCredentialsFrom` selects one of three strategies:
//! 1. **Role assumption**: assume the decrypted `AssumeRoleARN` with the
//!    process's ambient identity for a fixed 900-second session.
//! 2. **API-key assumption**: authenticate with the decrypted
//!    `AccessKey`/`SecretKey` pair, then assume `AssumeRoleARN`.
//! 3. **Ambient identity**: no decryption and no assumption; the runtime
//!    client falls back to the SDK default chain.
//!
//! Failures in strategies 1 and 2 are returned as-is. Resolution never
//! degrades to the ambient identity after a failed assumption.

pub mod endpoint;
pub mod fields;
pub mod strategy;
pub mod sts;

pub use endpoint::{public_endpoint, resolve_endpoint};
pub use fields::FieldDecryptor;
pub use strategy::{AccessKeyPair, CredentialSource, CredentialStrategy};
pub use sts::{AssumeRoleRequest, RoleAssumptionService, StsRoleAssumptionService};

use crate::config::{ConfigStore, DEFAULT_SECTION, KEY_REGION};
use crate::error::Result;
use crate::secret::SecretString;
use aws_credential_types::Credentials;
use std::time::{Duration, SystemTime};
use tracing::info;

/// Session name used when assuming a role with the ambient identity.
pub const ROLE_SESSION_NAME: &str = "MyBedrockClient";

/// Session name used when assuming a role with an access key pair.
pub const API_KEY_SESSION_NAME: &str = "my-session-name";

/// Fixed session length for strategy 1.
pub const ROLE_SESSION_DURATION: Duration = Duration::from_secs(900);

/// Provider name attached to credentials handed to the runtime client.
const BUNDLE_PROVIDER_NAME: &str = "bedrock-vault-assumed-role";

/// Short-lived credentials. Never persisted.
#[derive(Debug, Clone)]
pub struct CredentialBundle {
    pub access_key_id: SecretString,
    pub secret_access_key: SecretString,
    pub session_token: SecretString,
    pub expiration: Option<SystemTime>,
}

impl CredentialBundle {
    pub fn from_credentials(credentials: &Credentials) -> Self {
        Self {
            access_key_id: credentials.access_key_id().into(),
            secret_access_key: credentials.secret_access_key().into(),
            session_token: credentials.session_token().unwrap_or_default().into(),
            expiration: credentials.expiry(),
        }
    }

    /// SDK credentials for the runtime client.
    pub fn to_credentials(&self) -> Credentials {
        let token = self.session_token.expose();
        Credentials::new(
            self.access_key_id.expose().clone(),
            self.secret_access_key.expose().clone(),
            (!token.is_empty()).then(|| token.clone()),
            self.expiration,
            BUNDLE_PROVIDER_NAME,
        )
    }
}

/// Identity the runtime client should use.
#[derive(Debug, Clone)]
pub enum ResolvedIdentity {
    Assumed(CredentialBundle),
    Ambient,
}

impl ResolvedIdentity {
    pub fn is_ambient(&self) -> bool {
        matches!(self, ResolvedIdentity::Ambient)
    }
}

/// Everything the runtime inference client needs.
#[derive(Debug, Clone)]
pub struct RuntimeTarget {
    pub region: String,
    pub endpoint_url: String,
    pub identity: ResolvedIdentity,
}

/// Run a loaded strategy against `service`.
pub async fn resolve_identity(
    strategy: CredentialStrategy,
    service: &dyn RoleAssumptionService,
) -> Result<ResolvedIdentity> {
    match strategy {
        CredentialStrategy::RoleAssumption { target_role_arn } => {
            let request = AssumeRoleRequest {
                role_arn: target_role_arn,
                session_name: ROLE_SESSION_NAME.to_string(),
                duration: Some(ROLE_SESSION_DURATION),
            };
            let bundle = service.assume_role(&request).await?;
            Ok(ResolvedIdentity::Assumed(bundle))
        }
        CredentialStrategy::ApiKeyAssumption {
            keys,
            target_role_arn,
        } => {
            let request = AssumeRoleRequest {
                role_arn: target_role_arn,
                session_name: API_KEY_SESSION_NAME.to_string(),
                duration: None,
            };
            let bundle = service.assume_role_with_keys(&keys, &request).await?;
            Ok(ResolvedIdentity::Assumed(bundle))
        }
        CredentialStrategy::AmbientIdentity => {
            info!("Using the ambient identity of the environment");
            Ok(ResolvedIdentity::Ambient)
        }
    }
}

/// Resolve credentials for `endpoint_url` from the configuration.
///
/// `GetCredentialsFrom` is read exactly once, before any decryption or
/// network call.
pub async fn resolve(
    store: &ConfigStore,
    endpoint_url: String,
    service: &dyn RoleAssumptionService,
) -> Result<RuntimeTarget> {
    let region = store.get(DEFAULT_SECTION, KEY_REGION)?.to_string();
    let strategy = CredentialStrategy::load(store)?;
    let identity = resolve_identity(strategy, service).await?;
    Ok(RuntimeTarget {
        region,
        endpoint_url,
        identity,
    })
}
