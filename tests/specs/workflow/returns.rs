//! Returning, resubmitting and rejecting requests

use crate::prelude::*;
use similar_asserts::assert_eq;

#[tokio::test(start_paused = true)]
async fn returned_request_goes_back_through_approval() {
    let portal = Portal::new();
    let cell = portal.submitted("req-12", unit(12)).await;

    portal.sign_in(Role::UnitAdmin, unit(12));
    let status = portal.act(&cell, WorkflowAction::ReturnToUser).await.unwrap();
    assert_eq!(status, RequestStatus::ReturnedToUser);

    portal.sign_in(Role::UnitMember, unit(12));
    let status = portal.act(&cell, WorkflowAction::Resubmit).await.unwrap();
    assert_eq!(status, RequestStatus::Submitted);

    portal.sign_in(Role::UnitAdmin, unit(12));
    let status = portal.act(&cell, WorkflowAction::Approve).await.unwrap();
    assert_eq!(status, RequestStatus::ApprovedFinal);
}

#[tokio::test(start_paused = true)]
async fn central_admin_returns_to_unit() {
    let portal = Portal::new();
    let cell = portal.submitted("req-3", unit(3)).await;
    portal.sign_in(Role::UnitAdmin, unit(3));
    portal.act(&cell, WorkflowAction::Approve).await.unwrap();

    portal.sign_in(Role::CentralAdmin, None);
    assert!(portal
        .service
        .available_actions(&cell.value())
        .contains(&WorkflowAction::ReturnToUnit));
    let status = portal.act(&cell, WorkflowAction::ReturnToUnit).await.unwrap();
    assert_eq!(status, RequestStatus::ReturnedToUnit);

    portal.sign_in(Role::UnitAdmin, unit(3));
    let status = portal.act(&cell, WorkflowAction::Resubmit).await.unwrap();
    assert_eq!(status, RequestStatus::Submitted);
}

#[tokio::test(start_paused = true)]
async fn rejected_request_is_terminal() {
    let portal = Portal::new();
    let cell = portal.submitted("req-12", unit(12)).await;

    portal.sign_in(Role::UnitAdmin, unit(12));
    let status = portal.act(&cell, WorkflowAction::Reject).await.unwrap();
    assert_eq!(status, RequestStatus::Rejected);
    assert!(cell.value().is_terminal());

    portal.sign_in(Role::CentralAdmin, None);
    assert!(portal.service.available_actions(&cell.value()).is_empty());
    assert!(portal.act(&cell, WorkflowAction::Approve).await.is_err());
}
