// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Remote data channel for requests
//!
//! Backends come in two shapes: ones that fail by returning an error and
//! ones that always answer with a `(value, error)` pair. `ChannelReply`
//! folds the second shape into a `Result` so callers only see the first.

use af_core::{Request, RequestId};
use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;

#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{ChannelCall, FakeDataChannel};

/// Errors from data channel operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChannelError {
    #[error("request not found: {0}")]
    NotFound(RequestId),
    #[error("remote error: {0}")]
    Remote(String),
    #[error("reply carried neither a value nor an error")]
    EmptyReply,
    #[error("channel closed")]
    Closed,
}

/// A `(value, error)` pair as returned by pair-style backends
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelReply<T> {
    pub value: Option<T>,
    pub error: Option<String>,
}

impl<T> ChannelReply<T> {
    pub fn ok(value: T) -> Self {
        Self {
            value: Some(value),
            error: None,
        }
    }

    pub fn err(message: impl Into<String>) -> Self {
        Self {
            value: None,
            error: Some(message.into()),
        }
    }

    /// An error wins over a value; a reply with neither is `EmptyReply`
    pub fn into_result(self) -> Result<T, ChannelError> {
        match (self.value, self.error) {
            (_, Some(message)) => Err(ChannelError::Remote(message)),
            (Some(value), None) => Ok(value),
            (None, None) => Err(ChannelError::EmptyReply),
        }
    }
}

/// Change notification pushed by the channel
#[derive(Debug, Clone, PartialEq)]
pub enum RequestChange {
    Saved(Request),
    Removed(RequestId),
}

impl RequestChange {
    pub fn request_id(&self) -> &RequestId {
        match self {
            RequestChange::Saved(request) => &request.id,
            RequestChange::Removed(id) => id,
        }
    }
}

/// Stream of change notifications; ends when the channel goes away
pub type RequestChanges = mpsc::UnboundedReceiver<RequestChange>;

/// Adapter for the remote store of requests
#[async_trait]
pub trait DataChannel: Clone + Send + Sync + 'static {
    /// Fetch a request by id
    async fn load_request(&self, id: &RequestId) -> Result<Request, ChannelError>;

    /// Persist a request, returning the stored value (which may carry
    /// server-assigned fields)
    async fn save_request(&self, request: &Request) -> Result<Request, ChannelError>;

    /// Subscribe to change notifications
    fn subscribe(&self) -> RequestChanges;
}
