use super::fields::FieldDecryptor;
use crate::config::{ConfigStore, DEFAULT_SECTION, KEY_REGION, KEY_USE_VPCE, KEY_VPC_ENDPOINT_URL};
use crate::error::{Error, Result};
use tracing::info;

/// Public Bedrock runtime endpoint for `region`.
pub fn public_endpoint(region: &str) -> String {
    format!("https://bedrock-runtime.{region}.amazonaws.com")
}

/// Decrypted `VPCEndpointURL` when `UseVPCe = true`, otherwise the public
/// endpoint for `Region`. `UseVPCe` must be present.
pub fn resolve_endpoint(store: &ConfigStore) -> Result<String> {
    let use_vpce = match store.get_optional(DEFAULT_SECTION, KEY_USE_VPCE)? {
        Some(value) if !value.is_empty() => value,
        _ => return Err(Error::key_not_found(DEFAULT_SECTION, KEY_USE_VPCE)),
    };

    if use_vpce == "true" {
        let fields = FieldDecryptor::from_store(store)?;
        let url = fields.open(KEY_VPC_ENDPOINT_URL)?;
        info!("Bedrock VPC endpoint is enabled, using the configured endpoint URL");
        Ok(url.into_inner())
    } else {
        let url = public_endpoint(store.get(DEFAULT_SECTION, KEY_REGION)?);
        info!(endpoint = %url, "Bedrock VPC endpoint is not enabled, using the public service URL");
        Ok(url)
    }
}
