//! The connection state machine.
//!
//! [`ConnectionManager`] owns the selected credential + region for one
//! workspace context, the two recency lists and the current
//! [`ConnectionState`]. Mutations are serialized by a single lock; probe calls
//! run on spawned tasks and report back with the request token they were
//! issued under, so only the latest request can change the state.

mod events;
mod persistence;
mod selection;
mod validation;


use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use awsctx_core::config::ConnectionConfig;
use awsctx_core::{CredentialIdentifier, Region};
use awsctx_registry::{CredentialRegistry, RegionRegistry};
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;

use crate::error::ConnectionError;
use crate::notify::StateNotifier;
use crate::probe::ValidationProbe;
use crate::recency::RecencyList;
use crate::state::{ConnectionSettings, ConnectionState, ConnectionStateChange};

/// Selection and bookkeeping guarded by the manager lock.
struct Inner {
    credential_id: Option<String>,
    region_id: Option<String>,
    recent_credentials: RecencyList<String>,
    recent_regions: RecencyList<String>,
    /// Id of the latest validation request.
    token: u64,
}

struct Shared {
    credentials: Arc<dyn CredentialRegistry>,
    regions: Arc<dyn RegionRegistry>,
    probe: Arc<dyn ValidationProbe>,
    config: ConnectionConfig,
    inner: Mutex<Inner>,
    state: watch::Sender<ConnectionState>,
    notifier: StateNotifier,
    listener: Mutex<Option<JoinHandle<()>>>,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().expect("connection state lock poisoned")
    }
}

impl Drop for Shared {
    fn drop(&mut self) {
        if let Ok(mut listener) = self.listener.lock() {
            if let Some(handle) = listener.take() {
                handle.abort();
            }
        }
    }
}

/// Handle to the connection state of one workspace context.
///
/// Cloning is cheap and every clone drives the same state.
#[derive(Clone)]
pub struct ConnectionManager {
    shared: Arc<Shared>,
}

impl ConnectionManager {
    /// Create a manager with no selection and start listening to registry
    /// events. Must be called from within a tokio runtime.
    pub fn new(
        credentials: Arc<dyn CredentialRegistry>,
        regions: Arc<dyn RegionRegistry>,
        probe: Arc<dyn ValidationProbe>,
        config: ConnectionConfig,
    ) -> Self {
        let limit = config.recent_limit;
        let (state, _) = watch::channel(ConnectionState::NoSelection);
        let events = credentials.subscribe();

        let shared = Arc::new(Shared {
            credentials,
            regions,
            probe,
            config,
            inner: Mutex::new(Inner {
                credential_id: None,
                region_id: None,
                recent_credentials: RecencyList::new(limit),
                recent_regions: RecencyList::new(limit),
                token: 0,
            }),
            state,
            notifier: StateNotifier::new(),
            listener: Mutex::new(None),
        });

        let handle = events::spawn_listener(Arc::downgrade(&shared), events);
        *shared.listener.lock().expect("listener lock poisoned") = Some(handle);

        Self { shared }
    }

    /// Current state snapshot.
    pub fn state(&self) -> ConnectionState {
        self.shared.state.borrow().clone()
    }

    /// The pair, only while the state is `Valid`.
    pub fn connection_settings(&self) -> Option<ConnectionSettings> {
        self.shared.state.borrow().settings()
    }

    pub fn is_valid_connection_settings(&self) -> bool {
        self.shared.state.borrow().is_valid()
    }

    /// Selected credential, if it still resolves in the registry.
    pub fn selected_credential_identifier(&self) -> Option<CredentialIdentifier> {
        let id = self.shared.lock().credential_id.clone()?;
        self.shared.credentials.get(&id)
    }

    /// Selected region, if it still resolves in the registry.
    pub fn selected_region(&self) -> Option<Region> {
        let id = self.shared.lock().region_id.clone()?;
        self.shared.regions.get(&id)
    }

    /// Credential ids, most recent first.
    pub fn recently_used_credentials(&self) -> Vec<String> {
        self.shared.lock().recent_credentials.to_vec()
    }

    /// Region ids, most recent first.
    pub fn recently_used_regions(&self) -> Vec<String> {
        self.shared.lock().recent_regions.to_vec()
    }

    /// Every transition from now on, in order.
    pub fn subscribe(&self) -> broadcast::Receiver<ConnectionStateChange> {
        self.shared.notifier.subscribe()
    }

    /// Latest-value view of the state.
    pub fn watch_state(&self) -> watch::Receiver<ConnectionState> {
        self.shared.state.subscribe()
    }

    /// Resolve once no validation is in flight.
    pub async fn wait_until_stable(&self) -> ConnectionState {
        let mut rx = self.shared.state.subscribe();
        let settled = rx
            .wait_for(ConnectionState::is_stable)
            .await
            .map(|state| state.clone());
        settled.unwrap_or_else(|_| self.state())
    }

    /// [`wait_until_stable`](Self::wait_until_stable) bounded by `limit`.
    /// Expiry fails the wait, not the state.
    pub async fn wait_until_stable_timeout(
        &self,
        limit: Duration,
    ) -> Result<ConnectionState, ConnectionError> {
        tokio::time::timeout(limit, self.wait_until_stable())
            .await
            .map_err(|_| ConnectionError::WaitTimeout(limit))
    }

    /// Name of the configured probe.
    pub fn probe_name(&self) -> &str {
        self.shared.probe.probe_name()
    }
}
