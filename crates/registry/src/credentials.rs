//! Credential registry contract and the in-memory implementation.

use std::collections::BTreeMap;
use std::sync::RwLock;

use awsctx_core::{AwsCredentials, CredentialIdentifier};
use tokio::sync::broadcast;
use tracing::{debug, info};

use crate::error::RegistryError;

/// Capacity of the event channel; slow subscribers observe `Lagged`.
pub const EVENT_CAPACITY: usize = 64;

/// Change notification emitted by a credential registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialEvent {
    Added(CredentialIdentifier),
    Removed(String),
    Modified(CredentialIdentifier),
}

impl CredentialEvent {
    /// Id of the credential the event refers to.
    pub fn credential_id(&self) -> &str {
        match self {
            CredentialEvent::Added(c) | CredentialEvent::Modified(c) => &c.id,
            CredentialEvent::Removed(id) => id,
        }
    }
}

/// Source of truth for known credential identities.
///
/// Identities may be added or removed at any time; subscribers learn about
/// it through [`CredentialEvent`]s.
pub trait CredentialRegistry: Send + Sync {
    fn list(&self) -> Vec<CredentialIdentifier>;

    fn get(&self, id: &str) -> Option<CredentialIdentifier>;

    /// Register for change events. Dropping the receiver unregisters.
    fn subscribe(&self) -> broadcast::Receiver<CredentialEvent>;
}

/// Resolves an identifier to static key material, if it has any.
///
/// `None` means the identity relies on the ambient SDK credential chain.
pub trait CredentialResolver: Send + Sync {
    fn resolve(&self, id: &str) -> Option<AwsCredentials>;
}

#[derive(Debug, Clone)]
struct Entry {
    identifier: CredentialIdentifier,
    credentials: Option<AwsCredentials>,
}

/// Thread-safe in-memory credential registry.
pub struct InMemoryCredentialRegistry {
    entries: RwLock<BTreeMap<String, Entry>>,
    events: broadcast::Sender<CredentialEvent>,
}

impl Default for InMemoryCredentialRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryCredentialRegistry {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            entries: RwLock::new(BTreeMap::new()),
            events,
        }
    }

    /// Build a registry pre-populated with identities that carry no key material.
    pub fn with_identifiers(identifiers: impl IntoIterator<Item = CredentialIdentifier>) -> Self {
        let registry = Self::new();
        {
            let mut entries = registry.entries.write().expect("credential registry lock poisoned");
            for identifier in identifiers {
                entries.insert(
                    identifier.id.clone(),
                    Entry {
                        identifier,
                        credentials: None,
                    },
                );
            }
        }
        registry
    }

    pub fn add(&self, identifier: CredentialIdentifier) -> Result<(), RegistryError> {
        self.add_with_credentials(identifier, None)
    }

    pub fn add_with_credentials(
        &self,
        identifier: CredentialIdentifier,
        credentials: Option<AwsCredentials>,
    ) -> Result<(), RegistryError> {
        {
            let mut entries = self.entries.write().expect("credential registry lock poisoned");
            if entries.contains_key(&identifier.id) {
                return Err(RegistryError::AlreadyExists(identifier.id));
            }
            entries.insert(
                identifier.id.clone(),
                Entry {
                    identifier: identifier.clone(),
                    credentials,
                },
            );
        }
        info!(credential_id = %identifier.id, "Credential added");
        self.emit(CredentialEvent::Added(identifier));
        Ok(())
    }

    /// Remove an identity. Returns `false` if it was not registered.
    pub fn remove(&self, id: &str) -> bool {
        let removed = self
            .entries
            .write()
            .expect("credential registry lock poisoned")
            .remove(id)
            .is_some();
        if removed {
            info!(credential_id = %id, "Credential removed");
            self.emit(CredentialEvent::Removed(id.to_string()));
        }
        removed
    }

    /// Replace an identity's metadata, keeping its key material.
    pub fn modify(&self, identifier: CredentialIdentifier) -> Result<(), RegistryError> {
        {
            let mut entries = self.entries.write().expect("credential registry lock poisoned");
            let entry = entries
                .get_mut(&identifier.id)
                .ok_or_else(|| RegistryError::NotFound(identifier.id.clone()))?;
            entry.identifier = identifier.clone();
        }
        info!(credential_id = %identifier.id, "Credential modified");
        self.emit(CredentialEvent::Modified(identifier));
        Ok(())
    }

    /// Replace an identity's key material.
    pub fn update_credentials(
        &self,
        id: &str,
        credentials: Option<AwsCredentials>,
    ) -> Result<(), RegistryError> {
        let identifier = {
            let mut entries = self.entries.write().expect("credential registry lock poisoned");
            let entry = entries
                .get_mut(id)
                .ok_or_else(|| RegistryError::NotFound(id.to_string()))?;
            entry.credentials = credentials;
            entry.identifier.clone()
        };
        info!(credential_id = %id, "Credential key material updated");
        self.emit(CredentialEvent::Modified(identifier));
        Ok(())
    }

    /// Swap the full set of identities, emitting one event per difference.
    ///
    /// Entries whose metadata or key material changed are reported as
    /// `Modified`; untouched entries emit nothing.
    pub fn replace_all(
        &self,
        new_entries: impl IntoIterator<Item = (CredentialIdentifier, Option<AwsCredentials>)>,
    ) -> Vec<CredentialEvent> {
        let next: BTreeMap<String, Entry> = new_entries
            .into_iter()
            .map(|(identifier, credentials)| {
                (
                    identifier.id.clone(),
                    Entry {
                        identifier,
                        credentials,
                    },
                )
            })
            .collect();

        let mut events = Vec::new();
        {
            let mut entries = self.entries.write().expect("credential registry lock poisoned");
            for (id, old) in entries.iter() {
                match next.get(id) {
                    None => events.push(CredentialEvent::Removed(id.clone())),
                    Some(new)
                        if new.identifier != old.identifier
                            || new.credentials != old.credentials =>
                    {
                        events.push(CredentialEvent::Modified(new.identifier.clone()))
                    }
                    Some(_) => {}
                }
            }
            for (id, new) in next.iter() {
                if !entries.contains_key(id) {
                    events.push(CredentialEvent::Added(new.identifier.clone()));
                }
            }
            *entries = next;
        }

        debug!(changes = events.len(), "Credential registry replaced");
        for event in &events {
            self.emit(event.clone());
        }
        events
    }

    pub fn len(&self) -> usize {
        self.entries.read().expect("credential registry lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn emit(&self, event: CredentialEvent) {
        // No receivers is fine: nobody is listening yet.
        let _ = self.events.send(event);
    }
}

impl CredentialRegistry for InMemoryCredentialRegistry {
    fn list(&self) -> Vec<CredentialIdentifier> {
        self.entries
            .read()
            .expect("credential registry lock poisoned")
            .values()
            .map(|e| e.identifier.clone())
            .collect()
    }

    fn get(&self, id: &str) -> Option<CredentialIdentifier> {
        self.entries
            .read()
            .expect("credential registry lock poisoned")
            .get(id)
            .map(|e| e.identifier.clone())
    }

    fn subscribe(&self) -> broadcast::Receiver<CredentialEvent> {
        self.events.subscribe()
    }
}

impl CredentialResolver for InMemoryCredentialRegistry {
    fn resolve(&self, id: &str) -> Option<AwsCredentials> {
        self.entries
            .read()
            .expect("credential registry lock poisoned")
            .get(id)
            .and_then(|e| e.credentials.clone())
    }
}
