use std::env;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Region used when neither the environment nor a credential names one.
pub const FALLBACK_REGION_ID: &str = "us-east-1";

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.is_empty())
}

/// Read a profiled env var: tries {PROFILE}_{KEY} first, falls back to {KEY}.
fn profiled_env_opt(profile: &str, key: &str) -> Option<String> {
    if !profile.is_empty() {
        let prefixed = format!("{}_{}", profile, key);
        if let Some(v) = env_opt(&prefixed) {
            return Some(v);
        }
    }
    env_opt(key)
}

fn profiled_env_u64(profile: &str, key: &str, default: u64) -> u64 {
    profiled_env_opt(profile, key)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn profiled_env_usize(profile: &str, key: &str, default: usize) -> usize {
    profiled_env_opt(profile, key)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

// ── Top-level config ──────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Active profile name (empty = default).
    pub profile: String,
    pub storage: StorageConfig,
    pub regions: RegionConfig,
    pub connection: ConnectionConfig,
    pub aws: AwsConfig,
}

impl Config {
    /// Build config from environment variables (call `load_dotenv()` first).
    /// Profile is read from `AWSCTX_PROFILE`. When set (e.g. `PROD`), every
    /// key is first looked up as `{PROFILE}_{KEY}`, falling back to `{KEY}`.
    pub fn from_env() -> Self {
        let profile = env_or("AWSCTX_PROFILE", "").to_uppercase();
        Self::for_profile(&profile)
    }

    /// Build config for a specific named profile (empty string = default).
    pub fn for_profile(profile: &str) -> Self {
        let p = profile.to_uppercase();
        let p = p.as_str();
        Self {
            profile: p.to_string(),
            storage: StorageConfig::from_env_profiled(p),
            regions: RegionConfig::from_env_profiled(p),
            connection: ConnectionConfig::from_env_profiled(p),
            aws: AwsConfig::from_env_profiled(p),
        }
    }

    pub fn profile_label(&self) -> &str {
        if self.profile.is_empty() { "default" } else { &self.profile }
    }

    /// Print a redacted summary for startup logs.
    pub fn log_summary(&self) {
        tracing::info!("Config loaded (profile: {}):", self.profile_label());
        tracing::info!("  storage:     data_dir={}", self.storage.data_dir.display());
        tracing::info!("  regions:     default={}", self.regions.default_region_id);
        tracing::info!(
            "  connection:  recent_limit={}, validation_timeout={}s, stable_wait={}s",
            self.connection.recent_limit,
            self.connection.validation_timeout_secs,
            self.connection.stable_wait_secs
        );
        tracing::info!(
            "  aws:         endpoint={}",
            self.aws.endpoint_url.as_deref().unwrap_or("(default)")
        );
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            profile: String::new(),
            storage: StorageConfig::default(),
            regions: RegionConfig::default(),
            connection: ConnectionConfig::default(),
            aws: AwsConfig::default(),
        }
    }
}

// ── Storage ───────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
}

impl StorageConfig {
    fn from_env_profiled(p: &str) -> Self {
        let data_dir = profiled_env_opt(p, "AWSCTX_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(default_data_dir);
        Self { data_dir }
    }

    /// Directory holding the persisted selection of one workspace context.
    pub fn workspace_dir(&self, workspace_slug: &str) -> PathBuf {
        self.data_dir.join("workspaces").join(workspace_slug)
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

/// `~/.config/awsctx`, or `./.awsctx` when no config dir is known.
fn default_data_dir() -> PathBuf {
    dirs::config_dir()
        .map(|d| d.join("awsctx"))
        .unwrap_or_else(|| PathBuf::from(".awsctx"))
}

// ── Regions ───────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegionConfig {
    /// Region the registry reports as its default.
    pub default_region_id: String,
}

impl RegionConfig {
    fn from_env_profiled(p: &str) -> Self {
        let default_region_id = profiled_env_opt(p, "AWSCTX_DEFAULT_REGION")
            .or_else(|| profiled_env_opt(p, "AWS_REGION"))
            .unwrap_or_else(|| FALLBACK_REGION_ID.to_string());
        Self { default_region_id }
    }
}

impl Default for RegionConfig {
    fn default() -> Self {
        Self {
            default_region_id: FALLBACK_REGION_ID.to_string(),
        }
    }
}

// ── Connection state machine ──────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionConfig {
    /// Maximum entries kept in each recently-used list.
    pub recent_limit: usize,
    /// Per-probe timeout; expiry marks the selection invalid. At least 1s.
    pub validation_timeout_secs: u64,
    /// How long production callers wait for the state to settle.
    pub stable_wait_secs: u64,
}

impl ConnectionConfig {
    pub const DEFAULT_RECENT_LIMIT: usize = 5;

    fn from_env_profiled(p: &str) -> Self {
        Self {
            recent_limit: profiled_env_usize(
                p,
                "AWSCTX_RECENT_LIMIT",
                Self::DEFAULT_RECENT_LIMIT,
            )
            .max(1),
            validation_timeout_secs: profiled_env_u64(p, "AWSCTX_VALIDATION_TIMEOUT_SECS", 30)
                .max(1),
            stable_wait_secs: profiled_env_u64(p, "AWSCTX_STABLE_WAIT_SECS", 60),
        }
    }

    pub fn validation_timeout(&self) -> Duration {
        Duration::from_secs(self.validation_timeout_secs.max(1))
    }

    pub fn stable_wait(&self) -> Duration {
        Duration::from_secs(self.stable_wait_secs)
    }
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            recent_limit: Self::DEFAULT_RECENT_LIMIT,
            validation_timeout_secs: 30,
            stable_wait_secs: 60,
        }
    }
}

// ── AWS ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AwsConfig {
    /// Endpoint override for the validation probe (e.g. LocalStack).
    pub endpoint_url: Option<String>,
}

impl AwsConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            endpoint_url: profiled_env_opt(p, "AWS_ENDPOINT_URL"),
        }
    }
}
