//! Guarding protected views by role

use af_adapters::Navigation;
use af_core::RoleRequirement;
use af_engine::{GuardResult, RoleGuard};
use crate::prelude::*;
use similar_asserts::assert_eq;

fn admin_guard(config: &PortalConfig) -> (RoleGuard<FakeNavigator>, FakeNavigator, EventReceiver) {
    let navigator = FakeNavigator::new();
    let bus = EventBus::new();
    let rx = bus.subscribe_all("spec");
    let guard = RoleGuard::from_config(Role::UnitAdmin, &config.guard, navigator.clone(), bus);
    (guard, navigator, rx)
}

#[test]
fn admins_pass_without_navigation() {
    let (guard, navigator, mut rx) = admin_guard(&PortalConfig::default());
    let session = FakeSessionProvider::signed_in(Actor::new(Role::CentralAdmin, None));

    assert_eq!(guard.enforce_session(&session), GuardResult::Allowed);
    session.sign_in(Actor::new(Role::UnitAdmin, unit(4)));
    assert_eq!(guard.enforce_session(&session), GuardResult::Allowed);

    assert!(navigator.calls().is_empty());
    assert!(drain(&mut rx).is_empty());
}

#[test]
fn member_is_redirected_to_configured_fallback() {
    let config = PortalConfig::parse("[guard]\nfallback_path = \"/dashboard\"").unwrap();
    let (guard, navigator, mut rx) = admin_guard(&config);
    let session = FakeSessionProvider::signed_in(Actor::new(Role::UnitMember, unit(4)));

    let result = guard.enforce_session(&session);
    assert_eq!(
        result,
        GuardResult::Redirected {
            to: "/dashboard".to_string()
        }
    );
    assert_eq!(
        navigator.calls(),
        vec![Navigation {
            path: "/dashboard".to_string(),
            replace: true,
        }]
    );
    assert_eq!(
        drain(&mut rx),
        vec![Event::AccessDenied {
            required: "at least unit_admin".to_string(),
            redirect_to: "/dashboard".to_string(),
        }]
    );
}

#[test]
fn signed_out_and_unknown_roles_are_redirected() {
    let (guard, navigator, _rx) = admin_guard(&PortalConfig::default());
    let session = FakeSessionProvider::new();
    assert!(!guard.enforce_session(&session).is_allowed());

    session.sign_in(Actor::new(RoleClaim::parse("superuser"), None));
    assert!(!guard.enforce_session(&session).is_allowed());
    assert_eq!(navigator.calls().len(), 2);
}

#[test]
fn exact_membership_ignores_rank() {
    let navigator = FakeNavigator::new();
    let guard = RoleGuard::new(
        RoleRequirement::any_of([Role::UnitAdmin]),
        navigator.clone(),
        EventBus::new(),
    );

    let central = RoleClaim::Known(Role::CentralAdmin);
    let unit_admin = RoleClaim::Known(Role::UnitAdmin);
    assert!(!guard.check(Some(&central)));
    assert!(guard.check(Some(&unit_admin)));
    // check never navigates
    assert!(navigator.calls().is_empty());
    assert_eq!(guard.enforce(Some(&central)), GuardResult::Redirected { to: "/".to_string() });
}
