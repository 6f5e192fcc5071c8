use std::sync::Arc;

use tokio::time::timeout;

use awsctx_connection::{ConnectionState, PersistedSelection, SelectionFileStore};
use awsctx_core::config::StorageConfig;
use awsctx_core::CredentialIdentifier;
use awsctx_registry::InMemoryCredentialRegistry;

use crate::helpers::{credentials, manager, ScriptedProbe, TIMEOUT};

#[tokio::test]
async fn saved_selection_restores_into_fresh_manager() {
    let tmp = tempfile::tempdir().unwrap();
    let storage = StorageConfig {
        data_dir: tmp.path().to_path_buf(),
    };
    let store = SelectionFileStore::for_workspace(&storage, "project-x");

    let original = manager(credentials(&["A", "B"]), ScriptedProbe::new());
    original.change_connection_settings("A", "eu-west-1");
    original.change_credential_provider("B");
    original.change_region("us-west-2");
    timeout(TIMEOUT, original.wait_until_stable()).await.unwrap();
    store.save(&original.persisted_selection()).unwrap();

    let restored = manager(credentials(&["A", "B"]), ScriptedProbe::new());
    restored.load_state(store.load().unwrap());
    let state = timeout(TIMEOUT, restored.wait_until_stable()).await.unwrap();

    assert_eq!(state, original.state());
    assert_eq!(restored.recently_used_credentials(), vec!["B", "A"]);
    assert_eq!(restored.recently_used_regions(), vec!["us-west-2", "eu-west-1"]);
    assert_eq!(restored.persisted_selection(), original.persisted_selection());
}

#[tokio::test]
async fn mock_profile_validates_after_load() {
    let probe = ScriptedProbe::new();
    let mgr = manager(credentials(&["Mock"]), probe.clone());
    let doc = PersistedSelection::from_json(r#"{"activeProfile": "Mock"}"#).unwrap();

    mgr.load_state(Some(doc));
    timeout(TIMEOUT, mgr.wait_until_stable()).await.unwrap();

    assert!(mgr.is_valid_connection_settings());
    // No region stored and no hint: registry default.
    assert_eq!(probe.calls(), vec![("us-east-1".to_string(), "Mock".to_string())]);
}

#[tokio::test]
async fn empty_document_falls_back_to_default_profile() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("connection.json");
    std::fs::write(&path, "{}").unwrap();

    let mgr = manager(credentials(&["profile:default"]), ScriptedProbe::new());
    mgr.load_state(SelectionFileStore::new(&path).load().unwrap());
    let state = timeout(TIMEOUT, mgr.wait_until_stable()).await.unwrap();

    assert_eq!(
        mgr.selected_credential_identifier().map(|c| c.id),
        Some("profile:default".to_string())
    );
    assert!(state.is_valid());
}

#[tokio::test]
async fn missing_state_file_without_default_profile_stays_unselected() {
    let tmp = tempfile::tempdir().unwrap();
    let store = SelectionFileStore::new(tmp.path().join("connection.json"));

    let mgr = manager(credentials(&["profile:prod"]), ScriptedProbe::new());
    mgr.load_state(store.load().unwrap());
    assert_eq!(mgr.state(), ConnectionState::NoSelection);
}

#[tokio::test]
async fn unselected_fields_are_omitted_on_save() {
    let registry = Arc::new(InMemoryCredentialRegistry::with_identifiers([
        CredentialIdentifier::new("Mock"),
    ]));
    let mgr = manager(registry, ScriptedProbe::new());
    mgr.change_region("ca-central-1");

    let json = mgr.persisted_selection().to_json().unwrap();
    assert!(!json.contains("activeProfile"));
    assert!(json.contains("\"activeRegion\": \"ca-central-1\""));
}
