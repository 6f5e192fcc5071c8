/// Integration tests for the connection manager covering validation ordering,
/// persistence round trips, default-profile fallback and registry events.

mod helpers;
mod ordering;
mod persistence;
mod registry_events;
