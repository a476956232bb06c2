// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Fakes exposed to other crates' dev-dependencies via the `test-support`
//! feature: an in-memory [`PoolWorker`] and [`WorkerFactory`] pair that
//! exercise the scheduler's own logic without a real container or socket
//! (spec §8's concrete scenarios are written against exactly this kind of
//! "mocked worker").

use crate::error::PoolError;
use crate::factory::WorkerFactory;
use crate::worker::PoolWorker;
use async_trait::async_trait;
use drv_adapters::AdapterError;
use drv_core::{WorkerId, WorkerStatus};
use drv_wire::{ClientRequest, ClientResponse, NativeParseResponse, ParseResponse, VersionInfo};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Echoes `content` back as the parse tree (spec §8 scenario 1), optionally
/// sleeping before replying so tests can hold a worker busy long enough to
/// observe scaling behavior.
pub struct FakeWorker {
    id: WorkerId,
    status: Mutex<WorkerStatus>,
    calls: AtomicUsize,
    call_delay: Duration,
}

impl FakeWorker {
    pub fn new() -> Arc<Self> {
        Self::with_delay(Duration::ZERO)
    }

    pub fn with_delay(call_delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            id: WorkerId::new(),
            status: Mutex::new(WorkerStatus::Running),
            calls: AtomicUsize::new(0),
            call_delay,
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Simulates a crash: the next health gate on check-in will evict it.
    pub fn mark_stopped(&self) {
        *self.status.lock() = WorkerStatus::Stopped;
    }
}

#[async_trait]
impl PoolWorker for FakeWorker {
    fn id(&self) -> WorkerId {
        self.id
    }

    async fn status(&self) -> WorkerStatus {
        *self.status.lock()
    }

    async fn kill(&self) {
        *self.status.lock() = WorkerStatus::Stopped;
    }

    async fn call(&self, request: ClientRequest) -> Result<ClientResponse, AdapterError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.call_delay.is_zero() {
            tokio::time::sleep(self.call_delay).await;
        }
        Ok(echo_response(request))
    }
}

fn echo_response(request: ClientRequest) -> ClientResponse {
    match request {
        ClientRequest::Parse(req) => ClientResponse::Parse(ParseResponse {
            tree: req.content,
            language: req.language.unwrap_or_default(),
            errors: Vec::new(),
            elapsed_ms: 0,
        }),
        ClientRequest::NativeParse(req) => ClientResponse::NativeParse(NativeParseResponse {
            ast: String::from_utf8_lossy(&req.content).into_owned(),
            language: req.language.unwrap_or_default(),
            errors: Vec::new(),
            elapsed_ms: 0,
        }),
        ClientRequest::Version => {
            ClientResponse::Version(VersionInfo { version: "0.0.0-fake".to_string(), build_time: "now".to_string() })
        }
        ClientRequest::SupportedLanguages => ClientResponse::SupportedLanguages(Vec::new()),
    }
}

/// Produces [`FakeWorker`]s, optionally failing the next `n` spawns (spec
/// §4.4 "Failure model": transient vs persistent factory failure).
pub struct FakeFactory {
    spawned: AtomicUsize,
    pending_failures: AtomicUsize,
    fail_forever: AtomicBool,
    call_delay: Duration,
}

impl FakeFactory {
    pub fn new() -> Arc<Self> {
        Self::with_delay(Duration::ZERO)
    }

    pub fn with_delay(call_delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            spawned: AtomicUsize::new(0),
            pending_failures: AtomicUsize::new(0),
            fail_forever: AtomicBool::new(false),
            call_delay,
        })
    }

    /// Always fails, for `Start`'s fail-fast path.
    pub fn always_failing() -> Arc<Self> {
        let factory = Self::new();
        factory.fail_forever.store(true, Ordering::SeqCst);
        factory
    }

    /// Fails the next `n` spawn attempts, then succeeds (exercises
    /// transient-failure backoff).
    pub fn fail_next(&self, n: usize) {
        self.pending_failures.store(n, Ordering::SeqCst);
    }

    pub fn spawned_count(&self) -> usize {
        self.spawned.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl WorkerFactory for FakeFactory {
    async fn spawn(&self) -> Result<Arc<dyn PoolWorker>, PoolError> {
        if self.fail_forever.load(Ordering::SeqCst) {
            return Err(PoolError::Spawn("FakeFactory configured to always fail".to_string()));
        }
        let pending = self.pending_failures.load(Ordering::SeqCst);
        if pending > 0 {
            self.pending_failures.fetch_sub(1, Ordering::SeqCst);
            return Err(PoolError::Spawn("FakeFactory configured to fail transiently".to_string()));
        }
        self.spawned.fetch_add(1, Ordering::SeqCst);
        Ok(FakeWorker::with_delay(self.call_delay))
    }
}
