//! Discover credential profiles from environment variables.
//!
//! The unprefixed `AWS_ACCESS_KEY_ID` / `AWS_SECRET_ACCESS_KEY` pair is the
//! `default` profile. Any `{PREFIX}_AWS_ACCESS_KEY_ID` defines a profile named
//! after the lower-cased prefix, e.g. `PROD_AWS_ACCESS_KEY_ID` → `profile:prod`.

use std::collections::{BTreeMap, BTreeSet};

use awsctx_core::{AwsCredentials, CredentialIdentifier};
use tracing::{debug, info};

use crate::credentials::InMemoryCredentialRegistry;

const MARKER_KEY: &str = "AWS_ACCESS_KEY_ID";

/// Snapshot of environment variables interpreted as credential profiles.
pub struct EnvProfileSource {
    vars: BTreeMap<String, String>,
    include_default: bool,
}

impl EnvProfileSource {
    /// Read the current process environment.
    pub fn from_env() -> Self {
        Self::from_vars(std::env::vars())
    }

    /// Interpret an explicit set of variables (used by tests).
    pub fn from_vars(vars: impl IntoIterator<Item = (String, String)>) -> Self {
        Self {
            vars: vars
                .into_iter()
                .filter(|(_, v)| !v.is_empty())
                .collect(),
            include_default: true,
        }
    }

    /// Always register `profile:default`, even without static keys, so the
    /// SDK default chain can back it.
    pub fn include_default(mut self, include: bool) -> Self {
        self.include_default = include;
        self
    }

    /// Profile prefixes found in the environment (empty string = default).
    fn prefixes(&self) -> BTreeSet<String> {
        let mut prefixes = BTreeSet::new();
        if self.include_default || self.vars.contains_key(MARKER_KEY) {
            prefixes.insert(String::new());
        }
        for key in self.vars.keys() {
            if let Some(prefix) = key.strip_suffix(&format!("_{}", MARKER_KEY)) {
                if !prefix.is_empty()
                    && prefix.chars().all(|c| c.is_ascii_uppercase() || c == '_')
                {
                    prefixes.insert(prefix.to_string());
                }
            }
        }
        prefixes
    }

    fn var(&self, prefix: &str, key: &str) -> Option<String> {
        let name = if prefix.is_empty() {
            key.to_string()
        } else {
            format!("{}_{}", prefix, key)
        };
        self.vars.get(&name).cloned()
    }

    /// All discovered profiles with their region hint and static keys.
    pub fn profiles(&self) -> Vec<(CredentialIdentifier, Option<AwsCredentials>)> {
        self.prefixes()
            .into_iter()
            .map(|prefix| {
                let name = if prefix.is_empty() {
                    "default".to_string()
                } else {
                    prefix.to_lowercase()
                };
                let mut identifier = CredentialIdentifier::profile(&name);
                if let Some(region) = self
                    .var(&prefix, "AWS_REGION")
                    .or_else(|| self.var(&prefix, "AWS_DEFAULT_REGION"))
                {
                    identifier = identifier.with_default_region(region);
                }

                let credentials = match (
                    self.var(&prefix, MARKER_KEY),
                    self.var(&prefix, "AWS_SECRET_ACCESS_KEY"),
                ) {
                    (Some(access_key_id), Some(secret_access_key)) => Some(AwsCredentials {
                        access_key_id,
                        secret_access_key,
                        session_token: self.var(&prefix, "AWS_SESSION_TOKEN"),
                    }),
                    _ => None,
                };

                debug!(
                    credential_id = %identifier.id,
                    has_static_keys = credentials.is_some(),
                    "Discovered env profile"
                );
                (identifier, credentials)
            })
            .collect()
    }

    /// Register every discovered profile, skipping ids already present.
    pub fn load_into(&self, registry: &InMemoryCredentialRegistry) -> usize {
        let mut loaded = 0;
        for (identifier, credentials) in self.profiles() {
            if registry.add_with_credentials(identifier, credentials).is_ok() {
                loaded += 1;
            }
        }
        info!(count = loaded, "Loaded env profiles");
        loaded
    }
}
