use std::sync::{Arc, Weak};

use awsctx_registry::CredentialEvent;
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::{ConnectionManager, Shared};
use crate::state::{ConnectionState, InvalidReason};

/// Forward registry events to the manager until it is dropped.
pub(super) fn spawn_listener(
    shared: Weak<Shared>,
    mut events: broadcast::Receiver<CredentialEvent>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            let received = events.recv().await;
            let Some(shared) = shared.upgrade() else {
                break;
            };
            match received {
                Ok(event) => shared.on_credential_event(&event),
                Err(RecvError::Lagged(missed)) => {
                    warn!(missed, "Credential events lagged, refreshing connection state");
                    shared.resync_after_lag();
                }
                Err(RecvError::Closed) => break,
            }
        }
        debug!("Credential event listener stopped");
    })
}

impl Shared {
    /// Missed events may have included the removal of the active credential.
    /// Drop it if it stopped resolving since the last validation, then
    /// revalidate whatever remains selected.
    fn resync_after_lag(self: &Arc<Self>) {
        let mut inner = self.lock();
        if let Some(id) = inner.credential_id.clone() {
            let already_missing = matches!(
                &*self.state.borrow(),
                ConnectionState::Invalid {
                    reason: InvalidReason::CredentialNotFound(missing),
                    ..
                } if *missing == id
            );
            if !already_missing && self.credentials.get(&id).is_none() {
                info!(credential_id = %id, "Active credential vanished during lag, clearing selection");
                inner.recent_credentials.remove(&id);
                inner.credential_id = None;
            }
        }
        self.revalidate(&mut inner);
    }

    fn on_credential_event(self: &Arc<Self>, event: &CredentialEvent) {
        let mut inner = self.lock();
        let id = event.credential_id();
        let selected = inner.credential_id.as_deref() == Some(id);

        match event {
            CredentialEvent::Removed(_) => {
                inner.recent_credentials.remove(&id.to_string());
                if selected {
                    info!(credential_id = %id, "Active credential removed, clearing selection");
                    inner.credential_id = None;
                    self.revalidate(&mut inner);
                }
            }
            CredentialEvent::Modified(_) | CredentialEvent::Added(_) if selected => {
                info!(credential_id = %id, "Active credential changed, refreshing");
                self.revalidate(&mut inner);
            }
            _ => {}
        }
    }
}

impl ConnectionManager {
    /// React to a registry change as the background listener would.
    pub fn handle_credential_event(&self, event: &CredentialEvent) {
        self.shared.on_credential_event(event);
    }
}
