// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Traced adapter wrappers for consistent observability

use crate::channel::{ChannelError, DataChannel, RequestChanges};
use af_core::{Request, RequestId};
use async_trait::async_trait;
use tracing::Instrument;

/// Wrapper that adds tracing to any DataChannel
#[derive(Clone)]
pub struct TracedDataChannel<C> {
    inner: C,
}

impl<C> TracedDataChannel<C> {
    pub fn new(inner: C) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &C {
        &self.inner
    }
}

#[async_trait]
impl<C: DataChannel> DataChannel for TracedDataChannel<C> {
    async fn load_request(&self, id: &RequestId) -> Result<Request, ChannelError> {
        let span = tracing::info_span!("channel.load", request_id = %id);

        async {
            let start = std::time::Instant::now();
            let result = self.inner.load_request(id).await;
            let elapsed = start.elapsed();

            match &result {
                Ok(request) => tracing::debug!(
                    status = %request.status(),
                    elapsed_ms = elapsed.as_millis() as u64,
                    "loaded"
                ),
                Err(e) => tracing::warn!(
                    elapsed_ms = elapsed.as_millis() as u64,
                    error = %e,
                    "load failed"
                ),
            }

            result
        }
        .instrument(span)
        .await
    }

    async fn save_request(&self, request: &Request) -> Result<Request, ChannelError> {
        let span = tracing::info_span!("channel.save", request_id = %request.id);

        async {
            tracing::info!(status = %request.status(), "saving");

            let start = std::time::Instant::now();
            let result = self.inner.save_request(request).await;
            let elapsed = start.elapsed();

            match &result {
                Ok(_) => tracing::info!(elapsed_ms = elapsed.as_millis() as u64, "saved"),
                // Callers retry; terminal failures are logged by them
                Err(e) => tracing::warn!(
                    elapsed_ms = elapsed.as_millis() as u64,
                    error = %e,
                    "save failed"
                ),
            }

            result
        }
        .instrument(span)
        .await
    }

    fn subscribe(&self) -> RequestChanges {
        tracing::debug!("change subscription opened");
        self.inner.subscribe()
    }
}

#[cfg(test)]
#[path = "traced_tests.rs"]
mod tests;
