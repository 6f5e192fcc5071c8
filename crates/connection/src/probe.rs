//! Validation probe contract.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::ProbeError;

/// External check confirming a credential + region pair can be used.
///
/// Calls may overlap and complete in any order; the connection manager
/// decides which result is current.
#[async_trait]
pub trait ValidationProbe: Send + Sync {
    async fn validate(&self, region_id: &str, credential_id: &str) -> Result<(), ProbeError>;

    /// Short name for log messages (e.g. "sts", "presence").
    fn probe_name(&self) -> &str;
}

/// Blanket implementation so `Arc<dyn ValidationProbe>` can be used directly.
#[async_trait]
impl<T: ValidationProbe + ?Sized> ValidationProbe for Arc<T> {
    async fn validate(&self, region_id: &str, credential_id: &str) -> Result<(), ProbeError> {
        (**self).validate(region_id, credential_id).await
    }

    fn probe_name(&self) -> &str {
        (**self).probe_name()
    }
}

/// Accepts every pair. Registry presence is still checked by the manager,
/// so this reduces validation to "both ids exist" (offline mode).
pub struct PresenceProbe;

#[async_trait]
impl ValidationProbe for PresenceProbe {
    async fn validate(&self, _region_id: &str, _credential_id: &str) -> Result<(), ProbeError> {
        Ok(())
    }

    fn probe_name(&self) -> &str {
        "presence"
    }
}
