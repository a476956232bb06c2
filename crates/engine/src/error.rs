// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use drv_adapters::AdapterError;
use drv_core::ErrorKind;
use thiserror::Error;

/// Scheduler-lifecycle errors (spec §7 `PoolClosed`, `PoolRunning`,
/// `DriverStopped`).
#[derive(Debug, Error, Clone)]
pub enum PoolError {
    /// The pool has been stopped and will not serve new requests (spec §4.4
    /// "Stop is idempotent from the client's view: subsequent calls return
    /// `ErrPoolClosed`").
    #[error("pool is closed")]
    Closed,

    /// `Start` called on an already-running pool.
    #[error("pool is already running")]
    AlreadyRunning,

    /// The caller's context was cancelled while waiting for or holding a
    /// worker (spec §5 "Cancellation and timeouts").
    #[error("request was cancelled")]
    Cancelled,

    /// The factory failed to produce a worker (spec §4.4 "Failure model").
    #[error("worker spawn failed: {0}")]
    Spawn(String),
}

impl PoolError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            PoolError::Closed => ErrorKind::PoolClosed,
            PoolError::AlreadyRunning => ErrorKind::PoolRunning,
            PoolError::Cancelled => ErrorKind::Unexpected,
            PoolError::Spawn(_) => ErrorKind::Runtime,
        }
    }
}

impl From<AdapterError> for PoolError {
    fn from(err: AdapterError) -> Self {
        PoolError::Spawn(err.to_string())
    }
}

/// Error from [`crate::DriverPool::execute`]: either the pool itself
/// couldn't hand over a worker, or the caller's closure failed while
/// holding one (spec §4.4 "`ExecuteCtx`... propagates `fn`'s error").
#[derive(Debug, Error)]
pub enum ExecuteError<E: std::fmt::Debug + std::fmt::Display> {
    #[error(transparent)]
    Pool(#[from] PoolError),

    #[error("{0}")]
    Fn(E),
}
