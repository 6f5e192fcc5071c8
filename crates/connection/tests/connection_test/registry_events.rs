use tokio::time::timeout;

use awsctx_connection::ConnectionState;
use awsctx_core::CredentialIdentifier;

use crate::helpers::{credentials, manager, ScriptedProbe, TIMEOUT};

#[tokio::test]
async fn removing_active_credential_from_registry_clears_selection() {
    let registry = credentials(&["A", "B"]);
    let mgr = manager(registry.clone(), ScriptedProbe::new());
    mgr.change_connection_settings("A", "us-east-1");
    timeout(TIMEOUT, mgr.wait_until_stable()).await.unwrap();

    let mut state = mgr.watch_state();
    assert!(registry.remove("A"));
    timeout(TIMEOUT, state.wait_for(|s| *s == ConnectionState::NoSelection))
        .await
        .unwrap()
        .unwrap();

    assert!(mgr.selected_credential_identifier().is_none());
    assert!(mgr.connection_settings().is_none());
    assert!(mgr.selected_region().is_some());
}

#[tokio::test]
async fn re_adding_missing_credential_revalidates() {
    let registry = credentials(&[]);
    let mgr = manager(registry.clone(), ScriptedProbe::new());
    mgr.change_connection_settings("profile:late", "us-east-1");
    assert!(!mgr.is_valid_connection_settings());

    let mut state = mgr.watch_state();
    registry.add(CredentialIdentifier::new("profile:late")).unwrap();
    timeout(TIMEOUT, state.wait_for(|s| s.is_valid()))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(
        mgr.connection_settings().unwrap().credential.id,
        "profile:late"
    );
}

#[tokio::test]
async fn modifying_invalid_credential_retries_probe() {
    let probe = ScriptedProbe::new();
    probe.reject("A", "ExpiredToken");
    let registry = credentials(&["A"]);
    let mgr = manager(registry.clone(), probe.clone());
    mgr.change_connection_settings("A", "us-east-1");
    timeout(TIMEOUT, mgr.wait_until_stable()).await.unwrap();
    assert!(!mgr.is_valid_connection_settings());

    let mut changes = mgr.subscribe();
    registry
        .modify(CredentialIdentifier::new("A").with_display_name("A (rotated)"))
        .unwrap();
    let next = timeout(TIMEOUT, changes.recv()).await.unwrap().unwrap();
    assert_eq!(next.state.label(), "validating");
    probe.wait_finished(2).await;
    assert_eq!(probe.calls().len(), 2);
}

#[tokio::test]
async fn replace_all_drops_active_credential() {
    let registry = credentials(&["A", "B"]);
    let mgr = manager(registry.clone(), ScriptedProbe::new());
    mgr.change_connection_settings("A", "us-east-1");
    timeout(TIMEOUT, mgr.wait_until_stable()).await.unwrap();

    let mut state = mgr.watch_state();
    registry.replace_all([(CredentialIdentifier::new("B"), None)]);
    timeout(TIMEOUT, state.wait_for(|s| *s == ConnectionState::NoSelection))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(mgr.recently_used_credentials(), Vec::<String>::new());
}
