use std::sync::Arc;

use tracing::info;

use super::{ConnectionManager, Inner, Shared};

impl Shared {
    /// Record `id` as recently used if the registry knows it.
    pub(super) fn touch_credential(&self, inner: &mut Inner, id: &str) {
        if self.credentials.get(id).is_some() {
            inner.recent_credentials.touch(id.to_string());
        }
    }

    pub(super) fn touch_region(&self, inner: &mut Inner, id: &str) {
        if self.regions.get(id).is_some() {
            inner.recent_regions.touch(id.to_string());
        }
    }

    pub(super) fn select(
        self: &Arc<Self>,
        credential_id: Option<&str>,
        region_id: Option<&str>,
    ) {
        let mut inner = self.lock();
        if let Some(id) = credential_id {
            inner.credential_id = Some(id.to_string());
            self.touch_credential(&mut inner, id);
        }
        if let Some(id) = region_id {
            inner.region_id = Some(id.to_string());
            self.touch_region(&mut inner, id);
        }
        self.revalidate(&mut inner);
    }
}

impl ConnectionManager {
    /// Select a credential and revalidate. An unknown id is selected anyway
    /// and ends as `Invalid` without probing, but only ids the registry
    /// resolves are recorded in the recently used list.
    pub fn change_credential_provider(&self, credential_id: &str) {
        info!(credential_id = %credential_id, "Changing credential");
        self.shared.select(Some(credential_id), None);
    }

    /// Select a region and revalidate. As with credentials, an unknown region
    /// is selected but never recorded as recently used.
    pub fn change_region(&self, region_id: &str) {
        info!(region = %region_id, "Changing region");
        self.shared.select(None, Some(region_id));
    }

    /// Select both in one transition with a single validation.
    pub fn change_connection_settings(&self, credential_id: &str, region_id: &str) {
        info!(credential_id = %credential_id, region = %region_id, "Changing connection settings");
        self.shared.select(Some(credential_id), Some(region_id));
    }

    /// Probe the current pair again without changing the selection.
    pub fn refresh_connection_state(&self) {
        let mut inner = self.shared.lock();
        self.shared.revalidate(&mut inner);
    }
}
