//! Deployment configuration shapes the workflow

use af_core::WorkflowError;
use crate::prelude::*;
use similar_asserts::assert_eq;
use std::io::Write;

#[tokio::test(start_paused = true)]
async fn configured_partition_decides_approval_stages() {
    let portal = Portal::with_config(
        r#"
        [workflow]
        central_approval_units = [12]
        "#,
    );

    let central = portal.submitted("req-12", unit(12)).await;
    let local = portal.submitted("req-3", unit(3)).await;

    portal.sign_in(Role::UnitAdmin, unit(12));
    assert_eq!(
        portal.act(&central, WorkflowAction::Approve).await.unwrap(),
        RequestStatus::ApprovedByUnit
    );
    portal.sign_in(Role::UnitAdmin, unit(3));
    assert_eq!(
        portal.act(&local, WorkflowAction::Approve).await.unwrap(),
        RequestStatus::ApprovedFinal
    );
}

#[tokio::test(start_paused = true)]
async fn unknown_role_is_least_privileged_by_default() {
    let portal = Portal::new();
    let cell = portal.submitted("req-12", unit(12)).await;

    portal
        .session
        .sign_in(Actor::new(RoleClaim::parse("auditor"), unit(12)));
    assert!(portal.service.available_actions(&cell.value()).is_empty());
    let err = portal.act(&cell, WorkflowAction::Approve).await.unwrap_err();
    assert!(
        matches!(
            err,
            ApprovalError::Workflow(WorkflowError::AuthorizationDenied { .. })
        ),
        "got {err:?}"
    );
}

#[tokio::test(start_paused = true)]
async fn unknown_role_can_be_rejected_outright() {
    let portal = Portal::with_config(
        r#"
        [workflow]
        unknown_role = "reject"
        "#,
    );
    let cell = portal.submitted("req-12", unit(12)).await;

    portal
        .session
        .sign_in(Actor::new(RoleClaim::parse("auditor"), unit(12)));
    let err = portal.act(&cell, WorkflowAction::Approve).await.unwrap_err();
    assert!(
        matches!(
            err,
            ApprovalError::Workflow(WorkflowError::UnknownRole(ref name)) if name == "auditor"
        ),
        "got {err:?}"
    );
}

#[test]
fn config_file_is_loaded_and_validated() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        "[retry]\nmax_retries = 1\nbase_delay = \"50ms\"\n\n[guard]\nfallback_path = \"/home\""
    )
    .unwrap();

    let config = PortalConfig::load(file.path()).unwrap();
    assert_eq!(config.retry.max_retries, 1);
    assert_eq!(config.retry.base_delay, Duration::from_millis(50));
    assert_eq!(config.guard.fallback_path, "/home");
    assert_eq!(config.workflow.central_approval_units, vec![1, 2, 3, 4, 5, 6, 7]);

    assert!(PortalConfig::parse("[guard]\nfallback_path = \"home\"").is_err());
    assert!(PortalConfig::parse("[workflow]\ncentral_approval_units = [0]").is_err());
    assert!(PortalConfig::parse("[autosave]\ndebounce = \"0s\"").is_err());
    assert!(PortalConfig::parse("[unknown]\nkey = 1").is_err());
}
