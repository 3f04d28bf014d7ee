//! Role-assumption service.
//!
//! [`RoleAssumptionService`] is the seam between credential resolution and
//! the network. [`StsRoleAssumptionService`] talks to AWS STS through the
//! SDK's assume-role credentials provider; tests substitute an in-memory
//! fake.

use super::strategy::AccessKeyPair;
use super::CredentialBundle;
use crate::error::{Error, Result};
use async_trait::async_trait;
use aws_config::sts::AssumeRoleProvider;
use aws_config::Region;
use aws_credential_types::provider::error::CredentialsError;
use aws_credential_types::provider::ProvideCredentials;
use aws_credential_types::Credentials;
use aws_smithy_runtime_api::client::result::ConnectorError;
use aws_smithy_types::error::display::DisplayErrorContext;
use aws_smithy_types::error::ErrorMetadata;
use std::error::Error as StdError;
use std::time::Duration;
use tracing::{error, info};

/// Provider name attached to credentials built from a configured key pair.
const STATIC_PROVIDER_NAME: &str = "bedrock-vault-access-key";

/// STS error codes meaning the key pair itself was rejected.
const AUTH_FAILURE_CODES: [&str; 4] = [
    "InvalidClientTokenId",
    "SignatureDoesNotMatch",
    "UnrecognizedClientException",
    "IncompleteSignature",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssumeRoleRequest {
    pub role_arn: String,
    pub session_name: String,
    /// `None` leaves the provider default in place.
    pub duration: Option<Duration>,
}

#[async_trait]
pub trait RoleAssumptionService: Send + Sync {
    /// Assume `request.role_arn` using the process's ambient identity.
    async fn assume_role(&self, request: &AssumeRoleRequest) -> Result<CredentialBundle>;

    /// Authenticate with `keys`, then assume `request.role_arn` as that identity.
    async fn assume_role_with_keys(
        &self,
        keys: &AccessKeyPair,
        request: &AssumeRoleRequest,
    ) -> Result<CredentialBundle>;
}

/// AWS STS-backed implementation.
pub struct StsRoleAssumptionService {
    region: String,
}

impl StsRoleAssumptionService {
    pub fn new(region: impl Into<String>) -> Self {
        Self {
            region: region.into(),
        }
    }

    async fn fetch(
        provider: AssumeRoleProvider,
        request: &AssumeRoleRequest,
        with_keys: bool,
    ) -> Result<CredentialBundle> {
        match provider.provide_credentials().await {
            Ok(credentials) => {
                info!(role_arn = %request.role_arn, "Assumed role");
                Ok(CredentialBundle::from_credentials(&credentials))
            }
            Err(err) => {
                let failure = classify_failure(&request.role_arn, with_keys, &err);
                error!(role_arn = %request.role_arn, error = %failure, "Role assumption failed");
                Err(failure)
            }
        }
    }
}

#[async_trait]
impl RoleAssumptionService for StsRoleAssumptionService {
    async fn assume_role(&self, request: &AssumeRoleRequest) -> Result<CredentialBundle> {
        info!(role_arn = %request.role_arn, "Assuming role with ambient identity");
        let mut builder = AssumeRoleProvider::builder(request.role_arn.clone())
            .session_name(request.session_name.clone())
            .region(Region::new(self.region.clone()));
        if let Some(duration) = request.duration {
            builder = builder.session_length(duration);
        }
        let provider = builder.build().await;
        Self::fetch(provider, request, false).await
    }

    async fn assume_role_with_keys(
        &self,
        keys: &AccessKeyPair,
        request: &AssumeRoleRequest,
    ) -> Result<CredentialBundle> {
        if keys.access_key_id.expose().is_empty() || keys.secret_access_key.expose().is_empty() {
            return Err(Error::Authentication {
                message: "access key pair is empty".to_string(),
            });
        }

        info!(role_arn = %request.role_arn, "Assuming role with configured access key pair");
        let base = Credentials::new(
            keys.access_key_id.expose().clone(),
            keys.secret_access_key.expose().clone(),
            None,
            None,
            STATIC_PROVIDER_NAME,
        );
        let mut builder = AssumeRoleProvider::builder(request.role_arn.clone())
            .session_name(request.session_name.clone())
            .region(Region::new(self.region.clone()));
        if let Some(duration) = request.duration {
            builder = builder.session_length(duration);
        }
        let provider = builder.build_from_provider(base).await;
        Self::fetch(provider, request, true).await
    }
}

/// Map an assume-role failure onto the error taxonomy.
///
/// Transport failures and provider timeouts are [`Error::Network`]. A
/// rejected key pair is only [`Error::Authentication`] when a key pair was
/// actually used; everything else is [`Error::RoleAssumption`] carrying the
/// ARN.
fn classify_failure(role_arn: &str, with_keys: bool, err: &CredentialsError) -> Error {
    let detail = DisplayErrorContext(err).to_string();
    if matches!(err, CredentialsError::ProviderTimedOut(_)) || is_transport_failure(err) {
        return Error::Network {
            operation: "sts:AssumeRole".to_string(),
            message: detail,
        };
    }
    if with_keys && error_code(err).is_some_and(|code| AUTH_FAILURE_CODES.contains(&code)) {
        return Error::Authentication { message: detail };
    }
    Error::RoleAssumption {
        role_arn: role_arn.to_string(),
        message: detail,
    }
}

fn causes<'a>(
    err: &'a (dyn StdError + 'static),
) -> impl Iterator<Item = &'a (dyn StdError + 'static)> {
    std::iter::successors(Some(err), |e: &&'a (dyn StdError + 'static)| (*e).source())
}

/// Service error code from the first error metadata in the cause chain.
fn error_code(err: &CredentialsError) -> Option<&str> {
    causes(err)
        .find_map(|cause| cause.downcast_ref::<ErrorMetadata>())
        .and_then(ErrorMetadata::code)
}

fn is_transport_failure(err: &CredentialsError) -> bool {
    causes(err).any(|cause| cause.downcast_ref::<ConnectorError>().is_some())
}
