// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Worker factories: the closure the pool calls to produce a fresh worker
//! (spec §3 "DriverPool... factory (closure that produces a Worker)").

use crate::error::PoolError;
use crate::worker::PoolWorker;
use async_trait::async_trait;
use drv_adapters::{ContainerRuntime, DriverWorker, WorkerOptions};
use drv_core::{DriverReference, WorkerId};
use std::path::PathBuf;
use std::sync::Arc;

/// Produces a ready-to-use [`PoolWorker`], or fails (spec §4.4 "Factory
/// failure").
#[async_trait]
pub trait WorkerFactory: Send + Sync + 'static {
    async fn spawn(&self) -> Result<Arc<dyn PoolWorker>, PoolError>;
}

/// The production factory: spawns a container-backed [`DriverWorker`] for
/// one already-installed image (spec §4.2 "Construction").
pub struct DriverWorkerFactory {
    image: DriverReference,
    rootfs: PathBuf,
    runtime: Arc<dyn ContainerRuntime>,
    tmp_root: PathBuf,
    options: WorkerOptions,
}

impl DriverWorkerFactory {
    pub fn new(
        image: DriverReference,
        rootfs: PathBuf,
        runtime: Arc<dyn ContainerRuntime>,
        tmp_root: PathBuf,
        options: WorkerOptions,
    ) -> Self {
        Self { image, rootfs, runtime, tmp_root, options }
    }
}

#[async_trait]
impl WorkerFactory for DriverWorkerFactory {
    async fn spawn(&self) -> Result<Arc<dyn PoolWorker>, PoolError> {
        let worker = DriverWorker::start(
            WorkerId::new(),
            self.image.clone(),
            self.rootfs.clone(),
            self.runtime.as_ref(),
            &self.tmp_root,
            self.options.clone(),
        )
        .await?;
        Ok(Arc::new(worker))
    }
}
