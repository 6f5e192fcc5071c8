//! Wiring of registries, probe, manager and state file for one invocation.

use std::collections::BTreeSet;
use std::sync::Arc;

use anyhow::{Context as _, Result};
use tracing::{debug, info};

use awsctx_connection::{
    ConnectionManager, PresenceProbe, SelectionFileStore, StsProbe, ValidationProbe,
};
use awsctx_core::{AwsCredentials, Config, CredentialIdentifier};
use awsctx_registry::{
    EnvProfileSource, InMemoryCredentialRegistry, SharedConfigProfileSource, StaticRegionRegistry,
};

pub struct Context {
    pub config: Config,
    pub credentials: Arc<InMemoryCredentialRegistry>,
    pub regions: Arc<StaticRegionRegistry>,
    pub profiles: SharedConfigProfileSource,
    pub state_file: SelectionFileStore,
    pub manager: ConnectionManager,
}

impl Context {
    pub async fn open(config: Config, workspace: &str, offline: bool) -> Result<Self> {
        let profiles = SharedConfigProfileSource::from_default_files();
        let credentials = Arc::new(InMemoryCredentialRegistry::new());
        credentials.replace_all(read_profiles(&profiles).await?);

        let regions = Arc::new(StaticRegionRegistry::builtin(
            &config.regions.default_region_id,
        ));

        let probe: Arc<dyn ValidationProbe> = if offline {
            Arc::new(PresenceProbe)
        } else {
            Arc::new(StsProbe::new(credentials.clone(), &config.aws))
        };

        let manager = ConnectionManager::new(
            credentials.clone(),
            regions.clone(),
            probe,
            config.connection.clone(),
        );
        let state_file = SelectionFileStore::for_workspace(&config.storage, workspace);
        info!(
            workspace = %workspace,
            credentials = credentials.len(),
            probe = manager.probe_name(),
            "Opened workspace"
        );

        Ok(Self {
            config,
            credentials,
            regions,
            profiles,
            state_file,
            manager,
        })
    }

    /// Restore the saved selection (or pick the default profile).
    pub fn load(&self) -> Result<()> {
        let saved = self
            .state_file
            .load()
            .with_context(|| format!("failed to read {}", self.state_file.path().display()))?;
        self.manager.load_state(saved);
        Ok(())
    }

    pub fn save(&self) -> Result<()> {
        self.state_file
            .save(&self.manager.persisted_selection())
            .with_context(|| format!("failed to write {}", self.state_file.path().display()))
    }

    /// Re-read the shared config files and swap the registry contents.
    pub async fn reload_profiles(&self) -> Result<usize> {
        let entries = read_profiles(&self.profiles).await?;
        let events = self.credentials.replace_all(entries);
        Ok(events.len())
    }
}

type ProfileEntry = (CredentialIdentifier, Option<AwsCredentials>);

async fn read_profiles(shared: &SharedConfigProfileSource) -> Result<Vec<ProfileEntry>> {
    let from_files = shared
        .profiles()
        .await
        .context("failed to read shared AWS config files")?;
    Ok(collect_profiles(EnvProfileSource::from_env().profiles(), from_files))
}

/// Env profiles first, then shared config profiles whose id is not taken yet.
pub fn collect_profiles(env: Vec<ProfileEntry>, shared: Vec<ProfileEntry>) -> Vec<ProfileEntry> {
    let mut seen = BTreeSet::new();
    let mut all = Vec::new();
    for (identifier, credentials) in env.into_iter().chain(shared) {
        if seen.insert(identifier.id.clone()) {
            all.push((identifier, credentials));
        } else {
            debug!(credential_id = %identifier.id, "Profile id already registered, keeping the first");
        }
    }
    all
}
