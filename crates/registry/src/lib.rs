//! Credential and region registries.
//!
//! This crate provides:
//! - `CredentialRegistry` / `CredentialResolver` traits and an in-memory
//!   registry that broadcasts `CredentialEvent`s on add/remove/modify
//! - `RegionRegistry` trait and the built-in partition/region table
//! - `EnvProfileSource` for discovering profiles from environment variables
//! - `SharedConfigProfileSource` for the profiles in `~/.aws/config` and
//!   `~/.aws/credentials`

pub mod credentials;
pub mod env_profiles;
pub mod error;
pub mod regions;
pub mod shared_config;

pub use credentials::{
    CredentialEvent, CredentialRegistry, CredentialResolver, InMemoryCredentialRegistry,
};
pub use env_profiles::EnvProfileSource;
pub use error::RegistryError;
pub use regions::{RegionRegistry, StaticRegionRegistry};
pub use shared_config::SharedConfigProfileSource;
