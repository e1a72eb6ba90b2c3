// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Debounce and throttle timers

use std::time::{Duration, Instant};
use tokio::sync::{mpsc, oneshot};
use tokio_util::sync::CancellationToken;

type Job = Box<dyn FnOnce() + Send>;

enum Command<T> {
    Push(T),
    Flush(oneshot::Sender<()>),
    Discard,
    /// Drop the pending value, then run the job on the timer task
    Clear(Job, oneshot::Sender<()>),
}

/// Hands the latest value to a sink once pushes stop for `interval`.
///
/// Owns a tokio task. Cancelling or dropping the debouncer stops the task
/// and drops any pending value without delivering it.
pub struct Debouncer<T> {
    commands: mpsc::UnboundedSender<Command<T>>,
    token: CancellationToken,
    interval: Duration,
}

impl<T: Send + 'static> Debouncer<T> {
    /// Must be called from within a tokio runtime
    pub fn spawn<F>(interval: Duration, mut sink: F) -> Self
    where
        F: FnMut(T) + Send + 'static,
    {
        let (commands, mut rx) = mpsc::unbounded_channel::<Command<T>>();
        let token = CancellationToken::new();
        let cancelled = token.clone();

        tokio::spawn(async move {
            let mut pending: Option<T> = None;
            let timer = tokio::time::sleep(interval);
            tokio::pin!(timer);

            loop {
                tokio::select! {
                    biased;
                    _ = cancelled.cancelled() => break,
                    command = rx.recv() => match command {
                        Some(Command::Push(value)) => {
                            pending = Some(value);
                            timer
                                .as_mut()
                                .reset(tokio::time::Instant::now() + interval);
                        }
                        Some(Command::Flush(done)) => {
                            if let Some(value) = pending.take() {
                                sink(value);
                            }
                            let _ = done.send(());
                        }
                        Some(Command::Discard) => pending = None,
                        Some(Command::Clear(job, done)) => {
                            pending = None;
                            job();
                            let _ = done.send(());
                        }
                        None => break,
                    },
                    _ = &mut timer, if pending.is_some() => {
                        if let Some(value) = pending.take() {
                            sink(value);
                        }
                    }
                }
            }

            if pending.is_some() {
                tracing::debug!("debouncer stopped with a pending value");
            }

            // Clears queued behind a cancel still run
            rx.close();
            while let Ok(command) = rx.try_recv() {
                if let Command::Clear(job, done) = command {
                    job();
                    let _ = done.send(());
                }
            }
        });

        Self {
            commands,
            token,
            interval,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Replace the pending value and restart the quiet window
    pub fn push(&self, value: T) {
        if self.commands.send(Command::Push(value)).is_err() {
            tracing::trace!("push after debouncer stopped");
        }
    }

    /// Deliver the pending value now, if there is one
    pub async fn flush(&self) {
        let (done, wait) = oneshot::channel();
        if self.commands.send(Command::Flush(done)).is_ok() {
            let _ = wait.await;
        }
    }

    /// Drop the pending value but keep accepting pushes
    pub fn discard(&self) {
        let _ = self.commands.send(Command::Discard);
    }

    /// Drop the pending value and run `job` once no sink call can follow it.
    ///
    /// Runs inline when the debouncer has already stopped.
    pub async fn clear_with<F>(&self, job: F)
    where
        F: FnOnce() + Send + 'static,
    {
        let (done, wait) = oneshot::channel();
        match self.commands.send(Command::Clear(Box::new(job), done)) {
            Ok(()) => {
                let _ = wait.await;
            }
            Err(mpsc::error::SendError(command)) => {
                if let Command::Clear(job, _) = command {
                    job();
                }
            }
        }
    }

    /// Stop the timer; the pending value is dropped
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

/// Leading-edge rate limiter: the first call passes, later calls within
/// `interval` of it are refused
#[derive(Debug, Clone)]
pub struct Throttle {
    interval: Duration,
    last: Option<Instant>,
}

impl Throttle {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: None,
        }
    }

    pub fn try_acquire(&mut self, now: Instant) -> bool {
        match self.last {
            Some(last) if now.saturating_duration_since(last) < self.interval => false,
            _ => {
                self.last = Some(now);
                true
            }
        }
    }

    pub fn reset(&mut self) {
        self.last = None;
    }
}

#[cfg(test)]
#[path = "debounce_tests.rs"]
mod tests;
