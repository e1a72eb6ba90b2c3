// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake data channel for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{ChannelError, DataChannel, RequestChange, RequestChanges};
use af_core::{Request, RequestId, RequestStatus};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;

/// Recorded channel call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelCall {
    Load { id: RequestId },
    Save { id: RequestId, status: RequestStatus },
}

#[derive(Default)]
struct Failures {
    loads: VecDeque<ChannelError>,
    saves: VecDeque<ChannelError>,
    every_save: Option<ChannelError>,
}

/// In-memory data channel with failure injection
#[derive(Clone, Default)]
pub struct FakeDataChannel {
    requests: Arc<Mutex<HashMap<RequestId, Request>>>,
    calls: Arc<Mutex<Vec<ChannelCall>>>,
    failures: Arc<Mutex<Failures>>,
    subscribers: Arc<Mutex<Vec<mpsc::UnboundedSender<RequestChange>>>>,
    save_delay: Arc<Mutex<Option<Duration>>>,
    server_time: Arc<Mutex<Option<DateTime<Utc>>>>,
}

impl FakeDataChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a request without recording a call
    pub fn insert(&self, request: Request) {
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(request.id.clone(), request);
    }

    /// Get the stored copy of a request
    pub fn get(&self, id: &RequestId) -> Option<Request> {
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(id)
            .cloned()
    }

    /// Remove a request and notify subscribers
    pub fn remove(&self, id: &RequestId) -> Option<Request> {
        let removed = self
            .requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(id);
        if removed.is_some() {
            self.notify(RequestChange::Removed(id.clone()));
        }
        removed
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<ChannelCall> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Number of save attempts, failed ones included
    pub fn save_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, ChannelCall::Save { .. }))
            .count()
    }

    /// Fail the next `count` saves with a remote error
    pub fn fail_next_saves(&self, count: usize, message: &str) {
        let mut failures = self.failures.lock().unwrap_or_else(|e| e.into_inner());
        for _ in 0..count {
            failures
                .saves
                .push_back(ChannelError::Remote(message.to_string()));
        }
    }

    /// Fail every save until `clear_failures`
    pub fn fail_all_saves(&self, message: &str) {
        self.failures
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .every_save = Some(ChannelError::Remote(message.to_string()));
    }

    /// Fail the next `count` loads with a remote error
    pub fn fail_next_loads(&self, count: usize, message: &str) {
        let mut failures = self.failures.lock().unwrap_or_else(|e| e.into_inner());
        for _ in 0..count {
            failures
                .loads
                .push_back(ChannelError::Remote(message.to_string()));
        }
    }

    pub fn clear_failures(&self) {
        *self.failures.lock().unwrap_or_else(|e| e.into_inner()) = Failures::default();
    }

    /// Hold each save for `delay` before answering
    pub fn set_save_delay(&self, delay: Option<Duration>) {
        *self.save_delay.lock().unwrap_or_else(|e| e.into_inner()) = delay;
    }

    /// Stamp saved requests with this modification time, as a server would
    pub fn set_server_time(&self, time: Option<DateTime<Utc>>) {
        *self.server_time.lock().unwrap_or_else(|e| e.into_inner()) = time;
    }

    fn record(&self, call: ChannelCall) {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(call);
    }

    fn notify(&self, change: RequestChange) {
        self.subscribers
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .retain(|tx| tx.send(change.clone()).is_ok());
    }
}

#[async_trait]
impl DataChannel for FakeDataChannel {
    async fn load_request(&self, id: &RequestId) -> Result<Request, ChannelError> {
        self.record(ChannelCall::Load { id: id.clone() });

        let injected = self
            .failures
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .loads
            .pop_front();
        if let Some(err) = injected {
            return Err(err);
        }

        self.get(id).ok_or_else(|| ChannelError::NotFound(id.clone()))
    }

    async fn save_request(&self, request: &Request) -> Result<Request, ChannelError> {
        self.record(ChannelCall::Save {
            id: request.id.clone(),
            status: request.status(),
        });

        let delay = *self.save_delay.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let injected = {
            let mut failures = self.failures.lock().unwrap_or_else(|e| e.into_inner());
            failures
                .saves
                .pop_front()
                .or_else(|| failures.every_save.clone())
        };
        if let Some(err) = injected {
            return Err(err);
        }

        let mut stored = request.clone();
        if let Some(time) = *self.server_time.lock().unwrap_or_else(|e| e.into_inner()) {
            stored.modified_at = time;
        }
        self.insert(stored.clone());
        self.notify(RequestChange::Saved(stored.clone()));
        Ok(stored)
    }

    fn subscribe(&self) -> RequestChanges {
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribers
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(tx);
        rx
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
