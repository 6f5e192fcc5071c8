//! Discover credential profiles from the shared AWS config files.
//!
//! Every profile named in `~/.aws/config` or `~/.aws/credentials` (or the
//! files pointed to by `AWS_CONFIG_FILE` / `AWS_SHARED_CREDENTIALS_FILE`)
//! becomes `profile:<name>`, with its `region` setting as the region hint.
//! No keys are copied out of the files: the STS validator hands the profile
//! name to the SDK, which resolves static keys, SSO, assume-role and
//! `credential_process` itself.

use std::path::PathBuf;

use aws_config::profile::{self, ProfileSet};
use aws_runtime::env_config::file::{EnvConfigFileKind, EnvConfigFiles};
use aws_types::os_shim_internal::{Env, Fs};
use awsctx_core::{AwsCredentials, CredentialIdentifier};
use tracing::{debug, info};

use crate::credentials::InMemoryCredentialRegistry;
use crate::error::RegistryError;

const CONFIG_FILE_ENV: &str = "AWS_CONFIG_FILE";
const CREDENTIALS_FILE_ENV: &str = "AWS_SHARED_CREDENTIALS_FILE";

/// Loader for the profiles defined in the shared config files.
pub struct SharedConfigProfileSource {
    fs: Fs,
    env: Env,
    files: EnvConfigFiles,
    paths: Vec<PathBuf>,
}

impl SharedConfigProfileSource {
    /// The SDK's default file locations, including the env overrides.
    pub fn from_default_files() -> Self {
        let aws_dir = dirs::home_dir().unwrap_or_default().join(".aws");
        let path = |var: &str, file: &str| {
            std::env::var_os(var)
                .map(PathBuf::from)
                .unwrap_or_else(|| aws_dir.join(file))
        };
        Self {
            fs: Fs::real(),
            env: Env::real(),
            files: EnvConfigFiles::default(),
            paths: vec![
                path(CONFIG_FILE_ENV, "config"),
                path(CREDENTIALS_FILE_ENV, "credentials"),
            ],
        }
    }

    /// Explicit file locations. A missing file reads as empty.
    pub fn from_files(config: impl Into<PathBuf>, credentials: impl Into<PathBuf>) -> Self {
        let (config, credentials) = (config.into(), credentials.into());
        let files = EnvConfigFiles::builder()
            .with_file(EnvConfigFileKind::Config, config.clone())
            .with_file(EnvConfigFileKind::Credentials, credentials.clone())
            .build();
        Self {
            fs: Fs::real(),
            env: Env::real(),
            files,
            paths: vec![config, credentials],
        }
    }

    /// In-memory file contents; nothing on disk is read.
    pub fn from_contents(config: &str, credentials: &str) -> Self {
        let files = EnvConfigFiles::builder()
            .with_contents(EnvConfigFileKind::Config, config)
            .with_contents(EnvConfigFileKind::Credentials, credentials)
            .build();
        Self {
            fs: Fs::from_slice(&[]),
            env: Env::from_slice(&[]),
            files,
            paths: Vec::new(),
        }
    }

    /// Files whose changes should trigger a reload.
    pub fn watched_paths(&self) -> &[PathBuf] {
        &self.paths
    }

    /// Parse the files and list every profile, sorted by name.
    pub async fn profiles(
        &self,
    ) -> Result<Vec<(CredentialIdentifier, Option<AwsCredentials>)>, RegistryError> {
        let set = profile::load(&self.fs, &self.env, &self.files, None)
            .await
            .map_err(|e| RegistryError::SharedConfig(e.to_string()))?;
        Ok(identifiers(&set))
    }

    /// Register every profile, skipping ids already present.
    pub async fn load_into(&self, registry: &InMemoryCredentialRegistry) -> Result<usize, RegistryError> {
        let mut loaded = 0;
        for (identifier, credentials) in self.profiles().await? {
            if registry.add_with_credentials(identifier, credentials).is_ok() {
                loaded += 1;
            }
        }
        info!(count = loaded, "Loaded shared config profiles");
        Ok(loaded)
    }
}

fn identifiers(set: &ProfileSet) -> Vec<(CredentialIdentifier, Option<AwsCredentials>)> {
    let mut names: Vec<&str> = set.profiles().collect();
    names.sort_unstable();
    names
        .into_iter()
        .filter_map(|name| set.get_profile(name))
        .map(|profile| {
            let mut identifier = CredentialIdentifier::profile(profile.name());
            if let Some(region) = profile.get("region").filter(|r| !r.is_empty()) {
                identifier = identifier.with_default_region(region);
            }
            debug!(
                credential_id = %identifier.id,
                region = identifier.default_region_id.as_deref().unwrap_or("-"),
                "Discovered shared config profile"
            );
            (identifier, None)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credentials::{CredentialRegistry, CredentialResolver};

    const CONFIG: &str = "\
[default]
region = us-east-2

[profile prod]
region = eu-west-1
role_arn = arn:aws:iam::123456789012:role/admin
source_profile = default

[profile sso-dev]
sso_session = corp
sso_account_id = 123456789012
sso_role_name = Developer

[sso-session corp]
sso_start_url = https://corp.awsapps.com/start
sso_region = us-east-1
";

    const CREDENTIALS: &str = "\
[default]
aws_access_key_id = AKIADEFAULT
aws_secret_access_key = secret

[staging]
aws_access_key_id = AKIASTAGING
aws_secret_access_key = staging-secret
";

    #[tokio::test]
    async fn lists_profiles_from_both_files() {
        let source = SharedConfigProfileSource::from_contents(CONFIG, CREDENTIALS);
        let profiles = source.profiles().await.unwrap();

        let ids: Vec<&str> = profiles.iter().map(|(c, _)| c.id.as_str()).collect();
        assert_eq!(
            ids,
            vec!["profile:default", "profile:prod", "profile:sso-dev", "profile:staging"]
        );
        assert_eq!(profiles[0].0.default_region_id.as_deref(), Some("us-east-2"));
        assert_eq!(profiles[1].0.default_region_id.as_deref(), Some("eu-west-1"));
        assert!(profiles[2].0.default_region_id.is_none());
        // Keys stay in the files; the SDK reads them by profile name.
        assert!(profiles.iter().all(|(_, keys)| keys.is_none()));
    }

    #[tokio::test]
    async fn load_into_registry_skips_existing_ids() {
        let registry = InMemoryCredentialRegistry::new();
        registry
            .add(CredentialIdentifier::profile("default"))
            .unwrap();

        let source = SharedConfigProfileSource::from_contents(CONFIG, "");
        assert_eq!(source.load_into(&registry).await.unwrap(), 2);
        assert!(registry.get("profile:sso-dev").is_some());
        assert!(registry.resolve("profile:prod").is_none());
        // The earlier registration keeps its (missing) region hint.
        assert!(registry.get("profile:default").unwrap().default_region_id.is_none());
    }

    #[tokio::test]
    async fn missing_files_read_as_empty_and_reload_sees_edits() {
        let tmp = tempfile::tempdir().unwrap();
        let config = tmp.path().join("config");
        let source = SharedConfigProfileSource::from_files(&config, tmp.path().join("credentials"));
        assert!(source.profiles().await.unwrap().is_empty());
        assert_eq!(source.watched_paths()[0], config);

        std::fs::write(&config, "[profile ops]\nregion = ap-south-1\n").unwrap();
        let profiles = source.profiles().await.unwrap();
        assert_eq!(profiles.len(), 1);
        assert_eq!(profiles[0].0.id, "profile:ops");
        assert_eq!(profiles[0].0.default_region_id.as_deref(), Some("ap-south-1"));
    }
}
