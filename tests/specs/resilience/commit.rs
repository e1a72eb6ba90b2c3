//! Committing an action through retry and optimistic rollback

use crate::prelude::*;
use similar_asserts::assert_eq;

#[tokio::test(start_paused = true)]
async fn flaky_backend_recovers_with_backoff() {
    let portal = Portal::new();
    let cell = portal.submitted("req-12", unit(12)).await;
    let mut events = portal.events();

    portal.channel.fail_next_saves(2, "502 bad gateway");
    portal.sign_in(Role::UnitAdmin, unit(12));
    let start = tokio::time::Instant::now();
    let status = portal.act(&cell, WorkflowAction::Approve).await.unwrap();

    assert_eq!(status, RequestStatus::ApprovedFinal);
    // 100ms then 200ms of backoff
    assert!(start.elapsed() >= Duration::from_millis(300));
    assert!(!cell.is_updating());
    assert!(drain(&mut events).contains(&Event::RetryRecovered {
        label: "approve req-12".to_string(),
        attempts: 3,
    }));
}

#[tokio::test(start_paused = true)]
async fn candidate_is_visible_while_saving() {
    let portal = Portal::new();
    let cell = portal.submitted("req-12", unit(12)).await;
    portal.channel.set_save_delay(Some(Duration::from_secs(2)));
    portal.sign_in(Role::UnitAdmin, unit(12));

    let mut states = cell.subscribe();
    let pending = async { states.wait_for(|s| s.updating).await.unwrap().value.status() };

    let (status, seen) = tokio::join!(portal.act(&cell, WorkflowAction::Approve), pending);
    assert_eq!(seen, RequestStatus::ApprovedFinal);
    assert_eq!(status.unwrap(), RequestStatus::ApprovedFinal);
    assert!(!cell.is_updating());
}

#[tokio::test(start_paused = true)]
async fn outage_rolls_back_and_reports_once() {
    let portal = Portal::new();
    let cell = portal.submitted("req-12", unit(12)).await;
    let before = cell.value();
    let mut events = portal.events();

    portal.channel.fail_all_saves("connection refused");
    portal.sign_in(Role::UnitAdmin, unit(12));
    let err = portal.act(&cell, WorkflowAction::Approve).await.unwrap_err();

    assert!(err.is_transient());
    assert!(matches!(err, ApprovalError::Commit { attempts: 3, .. }), "got {err:?}");
    assert_eq!(cell.value(), before);
    assert_eq!(portal.stored_status("req-12"), RequestStatus::Submitted);

    let events = drain(&mut events);
    let exhausted = events
        .iter()
        .filter(|e| matches!(e, Event::RetryExhausted { .. }))
        .count();
    assert_eq!(exhausted, 1);
    assert!(events
        .iter()
        .any(|e| matches!(e, Event::UpdateRolledBack { .. })));
    assert!(!events
        .iter()
        .any(|e| matches!(e, Event::RequestTransitioned { .. })));
}

#[tokio::test(start_paused = true)]
async fn action_after_rollback_succeeds_once_backend_heals() {
    let portal = Portal::new();
    let cell = portal.submitted("req-12", unit(12)).await;

    portal.channel.fail_all_saves("connection refused");
    portal.sign_in(Role::UnitAdmin, unit(12));
    assert!(portal.act(&cell, WorkflowAction::Approve).await.is_err());

    portal.channel.clear_failures();
    let status = portal.act(&cell, WorkflowAction::Approve).await.unwrap();
    assert_eq!(status, RequestStatus::ApprovedFinal);
    assert_eq!(portal.stored_status("req-12"), RequestStatus::ApprovedFinal);
}

#[tokio::test(start_paused = true)]
async fn only_one_action_in_flight_per_request() {
    let portal = Portal::new();
    let cell = portal.submitted("req-12", unit(12)).await;
    portal.channel.set_save_delay(Some(Duration::from_millis(500)));
    portal.sign_in(Role::UnitAdmin, unit(12));
    let saves = portal.channel.save_count();

    let (first, second) = tokio::join!(
        portal.act(&cell, WorkflowAction::Reject),
        portal.act(&cell, WorkflowAction::Approve),
    );

    assert_eq!(first.unwrap(), RequestStatus::Rejected);
    assert!(matches!(second, Err(ApprovalError::Busy(_))));
    assert_eq!(portal.channel.save_count(), saves + 1);
    assert_eq!(portal.stored_status("req-12"), RequestStatus::Rejected);
}

#[tokio::test(start_paused = true)]
async fn zero_retries_fails_after_one_attempt() {
    let portal = Portal::with_config(
        r#"
        [retry]
        max_retries = 0
        base_delay = "100ms"
        "#,
    );
    let cell = portal.submitted("req-12", unit(12)).await;

    portal.channel.fail_next_saves(1, "timeout");
    portal.sign_in(Role::UnitAdmin, unit(12));
    let saves = portal.channel.save_count();
    let err = portal.act(&cell, WorkflowAction::Approve).await.unwrap_err();

    assert!(matches!(err, ApprovalError::Commit { attempts: 1, .. }), "got {err:?}");
    assert_eq!(portal.channel.save_count(), saves + 1);
}
