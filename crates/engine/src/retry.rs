// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Retrying executor with exponential backoff
//!
//! An operation is attempted up to `max_retries + 1` times. Between
//! attempts the executor waits `base_delay * 2^i` on the tokio timer, so
//! other work keeps running. Exhaustion is returned to the caller and
//! published once on the event bus.

use af_core::config::RetrySection;
use af_core::{Event, EventBus};
use std::fmt::Display;
use std::future::Future;
use std::sync::Mutex;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

/// Retry limits and backoff
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt
    pub max_retries: u32,
    pub base_delay: Duration,
    /// Ceiling on a single delay; `None` leaves backoff uncapped
    pub max_delay: Option<Duration>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from(&RetrySection::default())
    }
}

impl From<&RetrySection> for RetryPolicy {
    fn from(section: &RetrySection) -> Self {
        RetryPolicy {
            max_retries: section.max_retries,
            base_delay: section.base_delay,
            max_delay: section.max_delay,
        }
    }
}

impl RetryPolicy {
    pub fn new(max_retries: u32, base_delay: Duration) -> Self {
        Self {
            max_retries,
            base_delay,
            max_delay: None,
        }
    }

    pub fn with_max_delay(mut self, max_delay: Duration) -> Self {
        self.max_delay = Some(max_delay);
        self
    }

    /// Total attempts including the first
    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    /// Delay after the failure of attempt `attempt_index` (0-based)
    pub fn delay_for(&self, attempt_index: u32) -> Duration {
        let factor = 2u32.checked_pow(attempt_index).unwrap_or(u32::MAX);
        let delay = self.base_delay.saturating_mul(factor);
        match self.max_delay {
            Some(cap) => delay.min(cap),
            None => delay,
        }
    }
}

/// Observable state of an executor
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RetryState {
    pub in_flight: bool,
    pub last_error: Option<String>,
    /// Attempts made by the current or most recent run
    pub attempts: u32,
    /// True while waiting out a backoff delay
    pub retrying: bool,
}

#[derive(Debug, Error)]
pub enum RetryError<E> {
    #[error("gave up after {attempts} attempts: {last_error}")]
    Exhausted { attempts: u32, last_error: E },
    #[error("cancelled after {attempts} attempts")]
    Cancelled { attempts: u32 },
}

impl<E> RetryError<E> {
    pub fn attempts(&self) -> u32 {
        match self {
            RetryError::Exhausted { attempts, .. } | RetryError::Cancelled { attempts } => {
                *attempts
            }
        }
    }

    pub fn last_error(&self) -> Option<&E> {
        match self {
            RetryError::Exhausted { last_error, .. } => Some(last_error),
            RetryError::Cancelled { .. } => None,
        }
    }
}

/// Runs fallible async operations with retries
pub struct RetryExecutor {
    policy: RetryPolicy,
    bus: EventBus,
    state: watch::Sender<RetryState>,
    cancel: Mutex<CancellationToken>,
}

impl RetryExecutor {
    pub fn new(policy: RetryPolicy, bus: EventBus) -> Self {
        let (state, _) = watch::channel(RetryState::default());
        Self {
            policy,
            bus,
            state,
            cancel: Mutex::new(CancellationToken::new()),
        }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Snapshot of the current state
    pub fn state(&self) -> RetryState {
        self.state.borrow().clone()
    }

    /// Change stream of the state
    pub fn watch(&self) -> watch::Receiver<RetryState> {
        self.state.subscribe()
    }

    /// Abort a run waiting out a backoff delay.
    ///
    /// Later runs are unaffected. Dropping a run's future also ends it.
    pub fn cancel(&self) {
        let mut token = self.cancel.lock().unwrap_or_else(|e| e.into_inner());
        token.cancel();
        *token = CancellationToken::new();
    }

    /// Run `operation` until it succeeds or the policy is exhausted
    pub async fn execute<T, E, F, Fut>(
        &self,
        label: &str,
        mut operation: F,
    ) -> Result<T, RetryError<E>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Display,
    {
        let token = self
            .cancel
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone();

        if self.state.borrow().in_flight {
            tracing::warn!(label, "retry run started while another is in flight");
        }
        self.state.send_replace(RetryState {
            in_flight: true,
            ..RetryState::default()
        });
        let _run = RunGuard { state: &self.state };

        let max_attempts = self.policy.max_attempts();
        let mut attempts = 0;
        loop {
            let result = operation().await;
            attempts += 1;

            let err = match result {
                Ok(value) => {
                    self.state.send_modify(|s| {
                        s.in_flight = false;
                        s.attempts = attempts;
                        s.last_error = None;
                    });
                    if attempts > 1 {
                        tracing::info!(label, attempts, "operation recovered");
                        self.bus.publish(Event::RetryRecovered {
                            label: label.to_string(),
                            attempts,
                        });
                    }
                    return Ok(value);
                }
                Err(err) => err,
            };

            let message = err.to_string();
            self.state.send_modify(|s| {
                s.attempts = attempts;
                s.last_error = Some(message.clone());
            });

            if attempts >= max_attempts {
                tracing::error!(label, attempts, error = %message, "retries exhausted");
                self.bus.publish(Event::RetryExhausted {
                    label: label.to_string(),
                    attempts,
                    error: message,
                });
                return Err(RetryError::Exhausted {
                    attempts,
                    last_error: err,
                });
            }

            let delay = self.policy.delay_for(attempts - 1);
            tracing::warn!(
                label,
                attempt = attempts,
                delay_ms = delay.as_millis() as u64,
                error = %message,
                "attempt failed, backing off"
            );

            self.state.send_modify(|s| s.retrying = true);
            let cancelled = tokio::select! {
                _ = token.cancelled() => true,
                _ = tokio::time::sleep(delay) => false,
            };
            self.state.send_modify(|s| s.retrying = false);

            if cancelled {
                tracing::info!(label, attempts, "retry cancelled");
                return Err(RetryError::Cancelled { attempts });
            }
        }
    }
}

/// Clears the in-flight flags when a run ends, including when its future
/// is dropped mid-run
struct RunGuard<'a> {
    state: &'a watch::Sender<RetryState>,
}

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        self.state.send_if_modified(|s| {
            let changed = s.in_flight || s.retrying;
            s.in_flight = false;
            s.retrying = false;
            changed
        });
    }
}

#[cfg(test)]
#[path = "retry_tests.rs"]
mod tests;
