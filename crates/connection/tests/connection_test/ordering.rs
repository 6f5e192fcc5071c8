use tokio::time::{sleep, timeout};

use awsctx_connection::{ConnectionState, InvalidReason};

use crate::helpers::{credentials, manager, ScriptedProbe, SETTLE, TIMEOUT};

#[tokio::test]
async fn late_invalid_result_for_old_selection_is_discarded() {
    let probe = ScriptedProbe::new();
    probe.gate("A");
    probe.reject("A", "AccessDenied");
    let mgr = manager(credentials(&["A", "B"]), probe.clone());

    mgr.change_connection_settings("A", "us-east-1");
    mgr.change_credential_provider("B");

    let state = timeout(TIMEOUT, mgr.wait_until_stable()).await.unwrap();
    assert_eq!(state.settings().unwrap().credential.id, "B");

    let mut changes = mgr.subscribe();
    probe.release("A");
    probe.wait_finished(2).await;
    sleep(SETTLE).await;

    assert!(changes.try_recv().is_err(), "stale result changed the state");
    assert!(mgr.is_valid_connection_settings());
    assert_eq!(mgr.connection_settings().unwrap().credential.id, "B");
}

#[tokio::test]
async fn late_valid_result_for_old_selection_is_discarded() {
    let probe = ScriptedProbe::new();
    probe.gate("A");
    probe.reject("B", "ExpiredToken");
    let mgr = manager(credentials(&["A", "B"]), probe.clone());

    mgr.change_connection_settings("A", "us-east-1");
    mgr.change_credential_provider("B");
    let state = timeout(TIMEOUT, mgr.wait_until_stable()).await.unwrap();
    assert!(matches!(
        state,
        ConnectionState::Invalid {
            reason: InvalidReason::ProbeFailure(_),
            ..
        }
    ));

    probe.release("A");
    probe.wait_finished(2).await;
    sleep(SETTLE).await;

    assert!(!mgr.is_valid_connection_settings());
    assert!(mgr.connection_settings().is_none());
    assert_eq!(
        probe.calls(),
        vec![
            ("us-east-1".to_string(), "A".to_string()),
            ("us-east-1".to_string(), "B".to_string()),
        ]
    );
}

#[tokio::test]
async fn notifications_follow_transition_order() {
    let probe = ScriptedProbe::new();
    probe.gate("A");
    let mgr = manager(credentials(&["A"]), probe.clone());
    let mut changes = mgr.subscribe();

    mgr.change_connection_settings("A", "us-east-1");
    let validating = changes.recv().await.unwrap();
    assert_eq!(validating.state.label(), "validating");

    probe.release("A");
    let valid = timeout(TIMEOUT, changes.recv()).await.unwrap().unwrap();
    assert!(valid.state.is_valid());
    assert_eq!(valid.sequence, validating.sequence + 1);
    assert!(valid.at >= validating.at);
}

#[tokio::test]
async fn dropped_subscriber_does_not_block_others() {
    let probe = ScriptedProbe::new();
    let mgr = manager(credentials(&["A"]), probe);
    let dropped = mgr.subscribe();
    let mut kept = mgr.subscribe();
    drop(dropped);

    mgr.change_connection_settings("A", "eu-west-1");
    assert!(!kept.recv().await.unwrap().state.is_stable());
    assert!(kept.recv().await.unwrap().state.is_valid());
}

#[tokio::test]
async fn late_result_for_previous_region_is_discarded() {
    let probe = ScriptedProbe::new();
    probe.gate("A@us-east-1");
    probe.reject("A@us-east-1", "AccessDenied");
    let mgr = manager(credentials(&["A"]), probe.clone());

    mgr.change_connection_settings("A", "us-east-1");
    mgr.change_region("eu-west-1");

    let state = timeout(TIMEOUT, mgr.wait_until_stable()).await.unwrap();
    assert_eq!(state.settings().unwrap().region.id, "eu-west-1");

    let mut changes = mgr.subscribe();
    probe.release("A@us-east-1");
    probe.wait_finished(2).await;
    sleep(SETTLE).await;

    assert!(changes.try_recv().is_err(), "stale result changed the state");
    let settings = mgr.connection_settings().unwrap();
    assert_eq!(settings.credential.id, "A");
    assert_eq!(settings.region.id, "eu-west-1");
    assert_eq!(
        probe.calls(),
        vec![
            ("us-east-1".to_string(), "A".to_string()),
            ("eu-west-1".to_string(), "A".to_string()),
        ]
    );
}
