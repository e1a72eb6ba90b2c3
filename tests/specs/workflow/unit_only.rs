//! Unit-only unit: the unit admin finishes the request

use crate::prelude::*;
use similar_asserts::assert_eq;

#[tokio::test(start_paused = true)]
async fn unit_admin_approval_is_final() {
    let portal = Portal::new();
    let cell = portal.submitted("req-12", unit(12)).await;

    portal.sign_in(Role::UnitAdmin, unit(12));
    let status = portal.act(&cell, WorkflowAction::Approve).await.unwrap();
    assert_eq!(status, RequestStatus::ApprovedFinal);
    assert_eq!(portal.stored_status("req-12"), RequestStatus::ApprovedFinal);
    assert!(portal.service.can_generate_certificate(&cell.value()));
}

#[tokio::test(start_paused = true)]
async fn central_admin_cannot_issue_unit_only_certificate() {
    let portal = Portal::new();
    let cell = portal.submitted("req-12", unit(12)).await;
    portal.sign_in(Role::UnitAdmin, unit(12));
    portal.act(&cell, WorkflowAction::Approve).await.unwrap();

    portal.sign_in(Role::CentralAdmin, None);
    assert!(!portal.service.can_generate_certificate(&cell.value()));
}

#[tokio::test(start_paused = true)]
async fn admin_of_another_unit_is_refused() {
    let portal = Portal::new();
    let cell = portal.submitted("req-12", unit(12)).await;
    let saves = portal.channel.save_count();

    portal.sign_in(Role::UnitAdmin, unit(9));
    assert!(portal.service.available_actions(&cell.value()).is_empty());
    let err = portal.act(&cell, WorkflowAction::Approve).await.unwrap_err();
    assert!(matches!(err, ApprovalError::Workflow(_)), "got {err:?}");
    assert_eq!(portal.channel.save_count(), saves);
}

#[tokio::test(start_paused = true)]
async fn request_without_unit_is_unit_only() {
    let portal = Portal::new();
    let cell = portal.submitted("req-x", None).await;

    portal.sign_in(Role::CentralAdmin, None);
    let status = portal.act(&cell, WorkflowAction::Approve).await.unwrap();
    assert_eq!(status, RequestStatus::ApprovedFinal);
    assert!(!portal.service.can_generate_certificate(&cell.value()));
}
