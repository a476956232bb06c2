// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! [`PoolWorker`]: the pool's view of a live driver instance (spec §3
//! "Worker", §4.4).
//!
//! The pool only needs identity, health, a kill switch, and a way to
//! forward one request — everything else about how a worker is actually
//! backed (a container-wrapped child process in `drv-adapters`, or an
//! in-memory echo fake in tests) is irrelevant to the scheduling logic.

use async_trait::async_trait;
use drv_adapters::{AdapterError, DriverWorker};
use drv_core::{WorkerId, WorkerStatus};
use drv_wire::{ClientRequest, ClientResponse};

/// The pool's abstraction over a live worker. `drv_adapters::DriverWorker`
/// is the production implementation (blanket-implemented below); fakes
/// under [`crate::test_support`] implement it directly for scheduler-only
/// tests that don't want a real container/process.
#[async_trait]
pub trait PoolWorker: Send + Sync + 'static {
    fn id(&self) -> WorkerId;

    /// Derived from container state; only `Running` workers are usable
    /// (spec §4.2 "Health").
    async fn status(&self) -> WorkerStatus;

    /// Terminates the worker. Idempotent.
    async fn kill(&self);

    /// Forwards one client-facing request to the worker.
    async fn call(&self, request: ClientRequest) -> Result<ClientResponse, AdapterError>;
}

#[async_trait]
impl PoolWorker for DriverWorker {
    fn id(&self) -> WorkerId {
        DriverWorker::id(self)
    }

    async fn status(&self) -> WorkerStatus {
        DriverWorker::status(self).await
    }

    async fn kill(&self) {
        if let Err(err) = DriverWorker::stop(self).await {
            tracing::warn!(%err, "error stopping worker during kill");
        }
    }

    async fn call(&self, request: ClientRequest) -> Result<ClientResponse, AdapterError> {
        DriverWorker::call(self, request).await
    }
}
