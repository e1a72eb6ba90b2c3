//! Central-approval unit: two stages before a certificate

use crate::prelude::*;
use similar_asserts::assert_eq;

#[tokio::test(start_paused = true)]
async fn unit_admin_then_central_admin_finishes_request() {
    let portal = Portal::new();
    let mut events = portal.events();
    let cell = portal.submitted("req-3", unit(3)).await;
    assert_eq!(portal.stored_status("req-3"), RequestStatus::Submitted);

    portal.sign_in(Role::UnitAdmin, unit(3));
    let status = portal.act(&cell, WorkflowAction::Approve).await.unwrap();
    assert_eq!(status, RequestStatus::ApprovedByUnit);
    assert!(!portal.service.can_generate_certificate(&cell.value()));

    portal.sign_in(Role::CentralAdmin, None);
    let status = portal.act(&cell, WorkflowAction::Approve).await.unwrap();
    assert_eq!(status, RequestStatus::ApprovedFinal);
    assert_eq!(portal.stored_status("req-3"), RequestStatus::ApprovedFinal);
    assert!(portal.service.can_generate_certificate(&cell.value()));

    let transitions: Vec<(RequestStatus, RequestStatus)> = drain(&mut events)
        .into_iter()
        .filter_map(|e| match e {
            Event::RequestTransitioned { from, to, .. } => Some((from, to)),
            _ => None,
        })
        .collect();
    assert_eq!(
        transitions,
        vec![
            (RequestStatus::Draft, RequestStatus::Submitted),
            (RequestStatus::Submitted, RequestStatus::ApprovedByUnit),
            (RequestStatus::ApprovedByUnit, RequestStatus::ApprovedFinal),
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn unit_admin_cannot_issue_central_certificate() {
    let portal = Portal::new();
    let cell = portal.submitted("req-3", unit(3)).await;
    portal.sign_in(Role::UnitAdmin, unit(3));
    portal.act(&cell, WorkflowAction::Approve).await.unwrap();
    portal.sign_in(Role::CentralAdmin, None);
    portal.act(&cell, WorkflowAction::Approve).await.unwrap();

    portal.sign_in(Role::UnitAdmin, unit(3));
    assert!(!portal.service.can_generate_certificate(&cell.value()));
    portal.sign_in(Role::UnitMember, unit(3));
    assert!(!portal.service.can_generate_certificate(&cell.value()));
}

#[tokio::test(start_paused = true)]
async fn unit_admin_cannot_take_second_stage() {
    let portal = Portal::new();
    let cell = portal.submitted("req-3", unit(3)).await;
    portal.sign_in(Role::UnitAdmin, unit(3));
    portal.act(&cell, WorkflowAction::Approve).await.unwrap();

    let err = portal.act(&cell, WorkflowAction::Approve).await.unwrap_err();
    assert!(matches!(err, ApprovalError::Workflow(_)), "got {err:?}");
    assert_eq!(portal.stored_status("req-3"), RequestStatus::ApprovedByUnit);
}

#[tokio::test(start_paused = true)]
async fn central_admin_may_approve_directly() {
    let portal = Portal::new();
    let cell = portal.submitted("req-5", unit(5)).await;

    portal.sign_in(Role::CentralAdmin, None);
    let status = portal.act(&cell, WorkflowAction::Approve).await.unwrap();
    assert_eq!(status, RequestStatus::ApprovedFinal);
    assert!(portal.service.can_generate_certificate(&cell.value()));
}
