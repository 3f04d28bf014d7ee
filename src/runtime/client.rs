use crate::credentials::{ResolvedIdentity, RuntimeTarget};
use aws_config::{BehaviorVersion, Region};
use aws_sdk_bedrockruntime::Client;
use tracing::info;

/// Build a runtime client for `target`.
///
/// Assumed credentials are installed as a static provider. The ambient
/// identity leaves the SDK default credential chain in place.
pub async fn build_client(target: &RuntimeTarget) -> Client {
    let loader = aws_config::defaults(BehaviorVersion::latest())
        .region(Region::new(target.region.clone()))
        .endpoint_url(target.endpoint_url.clone());

    let loader = match &target.identity {
        ResolvedIdentity::Assumed(bundle) => {
            info!(region = %target.region, "Creating Bedrock runtime client with assumed-role credentials");
            loader.credentials_provider(bundle.to_credentials())
        }
        ResolvedIdentity::Ambient => {
            info!(region = %target.region, "Creating Bedrock runtime client with the ambient identity");
            loader
        }
    };

    let config = loader.load().await;
    Client::new(&config)
}
