//! Connection state values and change events.

use std::fmt;

use awsctx_core::{CredentialIdentifier, Region};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Why a selection is not usable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum InvalidReason {
    /// The selected credential id is not in the registry.
    CredentialNotFound(String),
    /// The selected region id is not in the registry.
    RegionNotFound(String),
    /// The probe reported the pair as unusable.
    ProbeFailure(String),
    /// The probe did not answer within the configured number of seconds.
    Timeout(u64),
}

impl fmt::Display for InvalidReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvalidReason::CredentialNotFound(id) => write!(f, "credential '{id}' not found"),
            InvalidReason::RegionNotFound(id) => write!(f, "region '{id}' not found"),
            InvalidReason::ProbeFailure(reason) => write!(f, "{reason}"),
            InvalidReason::Timeout(secs) => write!(f, "validation timed out after {secs}s"),
        }
    }
}

/// A validated credential + region pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConnectionSettings {
    pub credential: CredentialIdentifier,
    pub region: Region,
}

/// Validity of the current selection.
///
/// `Valid` and `Invalid` are stable; `Validating` is always followed by one
/// of them unless the selection changes first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ConnectionState {
    /// Credential or region (or both) not chosen.
    NoSelection,
    Validating {
        credential_id: String,
        region_id: String,
    },
    Valid {
        credential: CredentialIdentifier,
        region: Region,
    },
    /// Either id may be absent when the present one does not resolve.
    Invalid {
        credential_id: Option<String>,
        region_id: Option<String>,
        reason: InvalidReason,
    },
}

impl ConnectionState {
    /// Not mid-transition.
    pub fn is_stable(&self) -> bool {
        !matches!(self, ConnectionState::Validating { .. })
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, ConnectionState::Valid { .. })
    }

    /// The pair, only when validated.
    pub fn settings(&self) -> Option<ConnectionSettings> {
        match self {
            ConnectionState::Valid { credential, region } => Some(ConnectionSettings {
                credential: credential.clone(),
                region: region.clone(),
            }),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ConnectionState::NoSelection => "no_selection",
            ConnectionState::Validating { .. } => "validating",
            ConnectionState::Valid { .. } => "valid",
            ConnectionState::Invalid { .. } => "invalid",
        }
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectionState::NoSelection => write!(f, "no selection"),
            ConnectionState::Validating {
                credential_id,
                region_id,
            } => write!(f, "validating {credential_id}@{region_id}"),
            ConnectionState::Valid { credential, region } => {
                write!(f, "valid {}@{}", credential.id, region.id)
            }
            ConnectionState::Invalid {
                credential_id,
                region_id,
                reason,
            } => write!(
                f,
                "invalid {}@{}: {reason}",
                credential_id.as_deref().unwrap_or("-"),
                region_id.as_deref().unwrap_or("-")
            ),
        }
    }
}

/// Notification fired on every state transition.
#[derive(Debug, Clone, Serialize)]
pub struct ConnectionStateChange {
    /// Increases by one per transition; gaps mean a lagging subscriber.
    pub sequence: u64,
    pub state: ConnectionState,
    pub at: DateTime<Utc>,
}
