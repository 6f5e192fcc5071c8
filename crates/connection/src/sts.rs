//! Validation probe backed by `sts:GetCallerIdentity`.

use std::sync::Arc;

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_credential_types::Credentials;
use aws_sdk_sts::config::Region;
use aws_sdk_sts::error::{DisplayErrorContext, SdkError};
use aws_sdk_sts::Client;
use awsctx_core::config::AwsConfig;
use awsctx_core::{DEFAULT_PROFILE_ID, PROFILE_ID_PREFIX};
use awsctx_registry::CredentialResolver;
use tracing::{debug, info};

use crate::error::ProbeError;
use crate::probe::ValidationProbe;

/// Probes a pair by asking STS who the credentials belong to.
///
/// Identities with static keys are used directly. Identities without keys go
/// through the SDK default chain, pinned to the named profile unless it is
/// the default one.
pub struct StsProbe {
    resolver: Arc<dyn CredentialResolver>,
    endpoint_url: Option<String>,
}

impl StsProbe {
    pub fn new(resolver: Arc<dyn CredentialResolver>, aws: &AwsConfig) -> Self {
        Self {
            resolver,
            endpoint_url: aws.endpoint_url.clone().filter(|e| !e.is_empty()),
        }
    }

    fn endpoint(&self) -> Option<String> {
        self.endpoint_url.as_ref().map(|endpoint| {
            if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
                endpoint.clone()
            } else {
                format!("https://{endpoint}")
            }
        })
    }

    async fn client_for(&self, region_id: &str, credential_id: &str) -> Client {
        let region = Region::new(region_id.to_string());

        if let Some(creds) = self.resolver.resolve(credential_id) {
            let mut sts_config = aws_sdk_sts::Config::builder()
                .region(region)
                .behavior_version(BehaviorVersion::latest())
                .credentials_provider(Credentials::new(
                    creds.access_key_id,
                    creds.secret_access_key,
                    creds.session_token,
                    None,
                    "awsctx-static",
                ));
            if let Some(url) = self.endpoint() {
                sts_config = sts_config.endpoint_url(url);
            }
            return Client::from_conf(sts_config.build());
        }

        let mut loader = aws_config::defaults(BehaviorVersion::latest()).region(region);
        if let Some(name) = sdk_profile_name(credential_id) {
            loader = loader.profile_name(name);
        }
        let sdk_config = loader.load().await;
        let mut sts_config = aws_sdk_sts::config::Builder::from(&sdk_config);
        if let Some(url) = self.endpoint() {
            sts_config = sts_config.endpoint_url(url);
        }
        Client::from_conf(sts_config.build())
    }
}

#[async_trait]
impl ValidationProbe for StsProbe {
    async fn validate(&self, region_id: &str, credential_id: &str) -> Result<(), ProbeError> {
        debug!(region = %region_id, credential_id = %credential_id, "Calling sts:GetCallerIdentity");

        let client = self.client_for(region_id, credential_id).await;
        let resp = client
            .get_caller_identity()
            .send()
            .await
            .map_err(|e| {
                let detail = DisplayErrorContext(&e).to_string();
                match e {
                    SdkError::ServiceError(_) => ProbeError::Rejected(detail),
                    _ => ProbeError::AwsSdk(detail),
                }
            })?;

        info!(
            credential_id = %credential_id,
            region = %region_id,
            account = resp.account().unwrap_or("unknown"),
            arn = resp.arn().unwrap_or("unknown"),
            "Credentials validated"
        );
        Ok(())
    }

    fn probe_name(&self) -> &str {
        "sts"
    }
}

/// Named SDK profile for an identifier; the default profile needs none.
fn sdk_profile_name(credential_id: &str) -> Option<&str> {
    if credential_id == DEFAULT_PROFILE_ID {
        None
    } else {
        credential_id.strip_prefix(PROFILE_ID_PREFIX)
    }
}
