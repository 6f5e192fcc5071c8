//! Connection state management for the active credential + region pair.
//!
//! This crate provides:
//! - `ConnectionManager`: the state machine owning the current selection,
//!   recency lists and asynchronous validation
//! - `ValidationProbe` trait with an STS-backed implementation
//! - `PersistedSelection` codec and a JSON file store
//! - State-change notifications over a broadcast channel

pub mod codec;
pub mod error;
pub mod file_store;
pub mod manager;
pub mod notify;
pub mod probe;
pub mod recency;
pub mod state;
pub mod sts;

pub use codec::PersistedSelection;
pub use error::{CodecError, ConnectionError, ProbeError};
pub use file_store::SelectionFileStore;
pub use manager::ConnectionManager;
pub use notify::StateNotifier;
pub use probe::{PresenceProbe, ValidationProbe};
pub use recency::RecencyList;
pub use state::{ConnectionSettings, ConnectionState, ConnectionStateChange, InvalidReason};
pub use sts::StsProbe;
