use awsctx_core::DEFAULT_PROFILE_ID;
use tracing::{debug, info};

use super::{ConnectionManager, Inner, Shared};
use crate::codec::PersistedSelection;
use crate::recency::RecencyList;

impl Shared {
    /// Region for a freshly chosen credential: its own hint if that resolves,
    /// else the registry default.
    fn fallback_region_for(&self, credential_id: &str) -> String {
        self.credentials
            .get(credential_id)
            .and_then(|c| c.default_region_id)
            .filter(|hint| self.regions.get(hint).is_some())
            .unwrap_or_else(|| self.regions.default_region().id)
    }

    fn select_default_profile(&self, inner: &mut Inner) {
        let registered = self.credentials.list();
        match registered.as_slice() {
            [only] if only.id == DEFAULT_PROFILE_ID => {
                let region_id = self.fallback_region_for(&only.id);
                info!(credential_id = %only.id, region = %region_id, "No saved state, selecting default profile");
                inner.credential_id = Some(only.id.clone());
                inner.region_id = Some(region_id.clone());
                inner.recent_credentials.touch(only.id.clone());
                inner.recent_regions.touch(region_id);
            }
            _ => debug!(
                registered = registered.len(),
                "No saved state and no lone default profile"
            ),
        }
    }
}

impl ConnectionManager {
    /// Startup path when nothing was persisted: pick `profile:default` when it
    /// is the only registered credential, then validate.
    pub fn no_state_loaded(&self) {
        let mut inner = self.shared.lock();
        self.shared.select_default_profile(&mut inner);
        self.shared.revalidate(&mut inner);
    }

    /// Restore a persisted selection. `None` or a document without any field
    /// means no prior state.
    ///
    /// Recency lists are restored verbatim (bounded). Active ids that no longer
    /// resolve are left unselected. The fallback region only applies when no
    /// region was stored at all.
    pub fn load_state(&self, doc: Option<PersistedSelection>) {
        let doc = match doc {
            Some(doc) if !doc.is_empty() => doc,
            _ => return self.no_state_loaded(),
        };

        let shared = &self.shared;
        let mut inner = shared.lock();
        let limit = shared.config.recent_limit;
        inner.recent_credentials = RecencyList::from_items(limit, doc.recently_used_profiles);
        inner.recent_regions = RecencyList::from_items(limit, doc.recently_used_regions);

        let credential_id = doc
            .active_profile
            .filter(|id| shared.credentials.get(id).is_some());
        let region_id = match (doc.active_region, credential_id.as_deref()) {
            (Some(region), _) => Some(region).filter(|id| shared.regions.get(id).is_some()),
            (None, Some(credential_id)) => Some(shared.fallback_region_for(credential_id)),
            (None, None) => None,
        };
        inner.credential_id = credential_id;
        inner.region_id = region_id;

        info!(
            credential_id = inner.credential_id.as_deref().unwrap_or("-"),
            region = inner.region_id.as_deref().unwrap_or("-"),
            "Restored connection selection"
        );
        shared.revalidate(&mut inner);
    }

    /// Snapshot for saving. Ids are written as selected, even if they no
    /// longer resolve.
    pub fn persisted_selection(&self) -> PersistedSelection {
        let inner = self.shared.lock();
        PersistedSelection {
            active_profile: inner.credential_id.clone(),
            active_region: inner.region_id.clone(),
            recently_used_profiles: inner.recent_credentials.to_vec(),
            recently_used_regions: inner.recent_regions.to_vec(),
        }
    }
}
