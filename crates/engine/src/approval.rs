// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Approval service
//!
//! The path of a user action: resolve the actor, let the workflow engine
//! compute the transition, show it optimistically, save it through the
//! retrying executor, and roll back if every attempt fails.

use crate::error::ApprovalError;
use crate::optimistic::{OptimisticUpdater, UpdateError};
use crate::retry::{RetryError, RetryExecutor, RetryPolicy};
use af_adapters::{DataChannel, RequestChange, SessionProvider};
use af_core::{
    Clock, ConfigError, Event, EventBus, PortalConfig, Request, RequestId, WorkflowAction,
    WorkflowEngine,
};
use std::fmt::Display;
use tokio::task::JoinHandle;
use tracing::Instrument;

/// Service adapter dependencies
pub struct ApprovalDeps<C, P> {
    pub channel: C,
    pub session: P,
    pub bus: EventBus,
}

pub struct ApprovalService<C, P, K> {
    channel: C,
    session: P,
    bus: EventBus,
    engine: WorkflowEngine,
    retry: RetryPolicy,
    clock: K,
}

impl<C, P, K> ApprovalService<C, P, K>
where
    C: DataChannel,
    P: SessionProvider,
    K: Clock,
{
    pub fn new(
        deps: ApprovalDeps<C, P>,
        engine: WorkflowEngine,
        retry: RetryPolicy,
        clock: K,
    ) -> Self {
        Self {
            channel: deps.channel,
            session: deps.session,
            bus: deps.bus,
            engine,
            retry,
            clock,
        }
    }

    pub fn from_config(
        deps: ApprovalDeps<C, P>,
        config: &PortalConfig,
        clock: K,
    ) -> Result<Self, ConfigError> {
        let engine = config.workflow.engine()?;
        Ok(Self::new(deps, engine, RetryPolicy::from(&config.retry), clock))
    }

    pub fn engine(&self) -> &WorkflowEngine {
        &self.engine
    }

    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    /// Load a request into an observable cell
    pub async fn load(&self, id: &RequestId) -> Result<OptimisticUpdater<Request>, ApprovalError> {
        let span = tracing::info_span!("approval.load", request_id = %id);
        self.load_inner(id).instrument(span).await
    }

    /// Take `action` on the request held by `cell` as the signed-in user
    pub async fn act(
        &self,
        cell: &OptimisticUpdater<Request>,
        action: WorkflowAction,
    ) -> Result<Request, ApprovalError> {
        let span = tracing::info_span!(
            "approval.act",
            request_id = %cell.value().id,
            action = %action
        );
        self.act_inner(cell, action).instrument(span).await
    }

    /// Actions the signed-in user may take on `request`
    pub fn available_actions(&self, request: &Request) -> Vec<WorkflowAction> {
        match self.session.current() {
            Some(actor) => self.engine.available_actions(request, &actor),
            None => Vec::new(),
        }
    }

    /// Certificate gate for the signed-in user
    pub fn can_generate_certificate(&self, request: &Request) -> bool {
        let actor = self.session.current();
        self.engine.can_generate_certificate(
            request.unit_id,
            request.status(),
            actor.as_ref().map(|a| &a.role),
            actor.as_ref().and_then(|a| a.unit_id),
        )
    }

    /// Apply pushed changes for the cell's request until the channel closes.
    ///
    /// Changes arriving while an update is in flight are skipped; the
    /// update's own resolution wins.
    pub fn follow(&self, cell: &OptimisticUpdater<Request>) -> JoinHandle<()> {
        let mut changes = self.channel.subscribe();
        let cell = cell.clone();
        let id = cell.value().id;

        tokio::spawn(async move {
            while let Some(change) = changes.recv().await {
                match change {
                    RequestChange::Saved(request) if request.id == id => {
                        if !cell.set(request) {
                            tracing::debug!(request_id = %id, "change skipped, update in flight");
                        }
                    }
                    RequestChange::Removed(removed) if removed == id => {
                        tracing::info!(request_id = %id, "request removed remotely");
                        break;
                    }
                    _ => {}
                }
            }
        })
    }

    async fn load_inner(&self, id: &RequestId) -> Result<OptimisticUpdater<Request>, ApprovalError> {
        let executor = RetryExecutor::new(self.retry, self.bus.clone());
        let request = executor
            .execute(&format!("load {id}"), || self.channel.load_request(id))
            .await
            .map_err(|e| ApprovalError::Load {
                id: id.clone(),
                attempts: e.attempts(),
                message: describe(&e),
            })?;

        tracing::debug!(status = %request.status(), "loaded");
        Ok(OptimisticUpdater::new(
            format!("request {id}"),
            request,
            self.bus.clone(),
        ))
    }

    async fn act_inner(
        &self,
        cell: &OptimisticUpdater<Request>,
        action: WorkflowAction,
    ) -> Result<Request, ApprovalError> {
        let actor = self.session.current().ok_or(ApprovalError::Unauthenticated)?;
        let current = cell.value();
        let id = current.id.clone();
        if cell.is_updating() {
            return Err(ApprovalError::Busy(id));
        }

        let transition = self
            .engine
            .transition(&current, action, &actor, &self.clock)?;

        let executor = RetryExecutor::new(self.retry, self.bus.clone());
        let label = format!("{action} {id}");
        let channel = self.channel.clone();
        let result = cell
            .update(transition.request, |candidate| async move {
                executor
                    .execute(&label, || channel.save_request(&candidate))
                    .await
            })
            .await;

        match result {
            Ok(committed) => {
                self.bus.publish(Event::RequestTransitioned {
                    id,
                    action,
                    from: transition.from,
                    to: committed.status(),
                });
                Ok(committed)
            }
            Err(UpdateError::Busy) => Err(ApprovalError::Busy(id)),
            Err(UpdateError::Failed(failure)) => Err(ApprovalError::Commit {
                id,
                attempts: failure.error.attempts(),
                message: describe(&failure.error),
            }),
        }
    }
}

fn describe<E: Display>(error: &RetryError<E>) -> String {
    match error {
        RetryError::Exhausted { last_error, .. } => last_error.to_string(),
        RetryError::Cancelled { .. } => "cancelled".to_string(),
    }
}

#[cfg(test)]
#[path = "approval_tests.rs"]
mod tests;
