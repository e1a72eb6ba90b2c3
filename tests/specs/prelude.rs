//! Shared harness for the behavioral specs

#![allow(dead_code, unused_imports)]

pub use af_adapters::{FakeDataChannel, FakeNavigator, FakeSessionProvider};
pub use af_core::{
    Actor, Event, EventBus, EventReceiver, FakeClock, PortalConfig, Request, RequestCategory,
    RequestId, RequestStatus, Role, RoleClaim, UnitId, WorkflowAction,
};
pub use af_engine::{ApprovalDeps, ApprovalError, ApprovalService, OptimisticUpdater};
pub use std::time::Duration;

pub const DEFAULT_CONFIG: &str = r#"
[workflow]
central_approval_units = [1, 2, 3, 4, 5, 6, 7]

[retry]
max_retries = 2
base_delay = "100ms"
"#;

pub fn unit(id: u32) -> Option<UnitId> {
    UnitId::new(id).ok()
}

/// A portal wired to fakes
pub struct Portal {
    pub service: ApprovalService<FakeDataChannel, FakeSessionProvider, FakeClock>,
    pub channel: FakeDataChannel,
    pub session: FakeSessionProvider,
    pub clock: FakeClock,
    pub bus: EventBus,
}

impl Portal {
    pub fn new() -> Self {
        Self::with_config(DEFAULT_CONFIG)
    }

    pub fn with_config(toml: &str) -> Self {
        let config = PortalConfig::parse(toml).unwrap();
        let channel = FakeDataChannel::new();
        let session = FakeSessionProvider::new();
        let clock = FakeClock::new();
        let bus = EventBus::new();
        let service = ApprovalService::from_config(
            ApprovalDeps {
                channel: channel.clone(),
                session: session.clone(),
                bus: bus.clone(),
            },
            &config,
            clock.clone(),
        )
        .unwrap();
        Self {
            service,
            channel,
            session,
            clock,
            bus,
        }
    }

    pub fn events(&self) -> EventReceiver {
        self.bus.subscribe_all("spec")
    }

    pub fn sign_in(&self, role: Role, unit_id: Option<UnitId>) {
        self.session.sign_in(Actor::new(role, unit_id));
    }

    /// Seed a draft and load it
    pub async fn draft(&self, id: &str, unit_id: Option<UnitId>) -> OptimisticUpdater<Request> {
        self.channel.insert(Request::draft(
            id,
            RequestCategory::Leave,
            unit_id,
            serde_json::json!({ "days": 5 }),
            &self.clock,
        ));
        self.service.load(&RequestId::from(id)).await.unwrap()
    }

    /// Seed a draft and submit it as a member of its unit
    pub async fn submitted(&self, id: &str, unit_id: Option<UnitId>) -> OptimisticUpdater<Request> {
        let cell = self.draft(id, unit_id).await;
        self.sign_in(Role::UnitMember, unit_id);
        self.act(&cell, WorkflowAction::Submit).await.unwrap();
        cell
    }

    pub async fn act(
        &self,
        cell: &OptimisticUpdater<Request>,
        action: WorkflowAction,
    ) -> Result<RequestStatus, ApprovalError> {
        self.service.act(cell, action).await.map(|r| r.status())
    }

    pub fn stored_status(&self, id: &str) -> RequestStatus {
        self.channel.get(&RequestId::from(id)).unwrap().status()
    }
}

pub fn drain(rx: &mut EventReceiver) -> Vec<Event> {
    std::iter::from_fn(|| rx.try_recv().ok()).collect()
}
