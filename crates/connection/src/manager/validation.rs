use std::sync::Arc;

use awsctx_core::{CredentialIdentifier, Region};
use tracing::{debug, info, warn};

use super::{Inner, Shared};
use crate::error::ProbeError;
use crate::state::{ConnectionState, InvalidReason};

impl Shared {
    /// Swap in `next` and notify, unless it equals the current state.
    /// Called with the inner lock held so notifications keep transition order.
    pub(super) fn transition(&self, next: ConnectionState) {
        let changed = self.state.send_if_modified(|current| {
            if *current == next {
                false
            } else {
                *current = next.clone();
                true
            }
        });
        if changed {
            let change = self.notifier.publish(next);
            debug!(
                sequence = change.sequence,
                state = change.state.label(),
                "Connection state changed"
            );
        }
    }

    /// Issue a new request token and re-derive the state from the selection.
    ///
    /// A selected id that does not resolve ends as `Invalid` right away, even
    /// when the other id is unset. A complete, resolvable pair moves to
    /// `Validating` and a probe task is spawned.
    pub(super) fn revalidate(self: &Arc<Self>, inner: &mut Inner) {
        inner.token += 1;
        let token = inner.token;

        let credential = match inner.credential_id.as_deref() {
            Some(id) => match self.credentials.get(id) {
                Some(credential) => Some(credential),
                None => {
                    info!(credential_id = %id, "Selected credential not registered");
                    self.transition(ConnectionState::Invalid {
                        reason: InvalidReason::CredentialNotFound(id.to_string()),
                        credential_id: inner.credential_id.clone(),
                        region_id: inner.region_id.clone(),
                    });
                    return;
                }
            },
            None => None,
        };
        let region = match inner.region_id.as_deref() {
            Some(id) => match self.regions.get(id) {
                Some(region) => Some(region),
                None => {
                    info!(region = %id, "Selected region not registered");
                    self.transition(ConnectionState::Invalid {
                        reason: InvalidReason::RegionNotFound(id.to_string()),
                        credential_id: inner.credential_id.clone(),
                        region_id: inner.region_id.clone(),
                    });
                    return;
                }
            },
            None => None,
        };

        let (Some(credential), Some(region)) = (credential, region) else {
            self.transition(ConnectionState::NoSelection);
            return;
        };
        let (credential_id, region_id) = (credential.id.clone(), region.id.clone());

        debug!(
            credential_id = %credential_id,
            region = %region_id,
            token,
            probe = self.probe.probe_name(),
            "Validating connection"
        );
        self.transition(ConnectionState::Validating {
            credential_id,
            region_id,
        });

        let shared = Arc::clone(self);
        tokio::spawn(async move {
            let outcome = shared.run_probe(credential, region).await;
            shared.complete_validation(token, outcome);
        });
    }

    /// Call the probe with the configured timeout. A panicking probe or an
    /// expired timeout both end as `Invalid`.
    async fn run_probe(&self, credential: CredentialIdentifier, region: Region) -> ConnectionState {
        let probe = Arc::clone(&self.probe);
        let (credential_id, region_id) = (credential.id.clone(), region.id.clone());
        let mut call = tokio::spawn(async move { probe.validate(&region_id, &credential_id).await });

        let limit = self.config.validation_timeout();
        let failure = match tokio::time::timeout(limit, &mut call).await {
            Ok(Ok(Ok(()))) => return ConnectionState::Valid { credential, region },
            Ok(Ok(Err(e))) => InvalidReason::ProbeFailure(e.to_string()),
            Ok(Err(join)) => InvalidReason::ProbeFailure(ProbeError::Task(join.to_string()).to_string()),
            Err(_) => {
                call.abort();
                InvalidReason::Timeout(limit.as_secs())
            }
        };

        warn!(
            credential_id = %credential.id,
            region = %region.id,
            reason = %failure,
            "Connection validation failed"
        );
        ConnectionState::Invalid {
            credential_id: Some(credential.id),
            region_id: Some(region.id),
            reason: failure,
        }
    }

    /// Apply a probe outcome if its token is still the latest.
    fn complete_validation(&self, token: u64, outcome: ConnectionState) {
        let inner = self.lock();
        if inner.token != token {
            debug!(token, current = inner.token, "Discarding stale validation result");
            return;
        }
        if outcome.is_valid() {
            info!(token, "{}", outcome);
        }
        self.transition(outcome);
    }
}
