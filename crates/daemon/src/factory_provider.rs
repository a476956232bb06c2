// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Production [`PoolFactoryProvider`] (spec §4.5): resolves a language's
//! image reference, auto-installs it on first use if missing, and wires
//! a container-backed [`DriverWorkerFactory`] plus the default scaling
//! policy for a newly created pool.

use crate::error::DaemonError;
use crate::registry::PoolFactoryProvider;
use async_trait::async_trait;
use drv_adapters::{ContainerRuntime, WorkerOptions};
use drv_core::{DriverReference, Transport};
use drv_engine::{DriverWorkerFactory, WorkerFactory};
use drv_policy::ScalingPolicy;
use drv_storage::{ImageStore, StorageError};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Resolves images through [`ImageStore`], spawns workers through a
/// [`ContainerRuntime`], and hands out `drv_policy::default_policy()` for
/// every language (spec §4.3 "every pool runs the same composed policy
/// unless overridden").
pub struct DefaultPoolFactoryProvider {
    store: Arc<ImageStore>,
    runtime: Arc<dyn ContainerRuntime>,
    transport: Transport,
    overrides: HashMap<String, String>,
    tmp_root: PathBuf,
    worker_options: WorkerOptions,
    tick: Duration,
}

impl DefaultPoolFactoryProvider {
    pub fn new(
        store: Arc<ImageStore>,
        runtime: Arc<dyn ContainerRuntime>,
        transport: Transport,
        overrides: HashMap<String, String>,
        worker_options: WorkerOptions,
        tick: Duration,
    ) -> Self {
        let tmp_root = store.layout().tmp_dir();
        Self { store, runtime, transport, overrides, tmp_root, worker_options, tick }
    }

    /// Resolves `language`'s reference, installing it on the spot if this
    /// is the first request for it (spec §4.5 "if the image isn't
    /// installed yet, install the default reference for that language").
    async fn ensure_installed(&self, language: &str) -> Result<(PathBuf, DriverReference), DaemonError> {
        let reference = DriverReference::resolve(language, self.transport, &self.overrides);

        match self.store.root_fs(&reference) {
            Ok(rootfs) => Ok((rootfs, reference)),
            Err(StorageError::DriverNotInstalled { .. }) => {
                info!(%language, %reference, "no driver installed, auto-installing default reference");
                let store = Arc::clone(&self.store);
                let install_reference = reference.clone();
                tokio::task::spawn_blocking(move || store.install(&install_reference, false))
                    .await
                    .map_err(|err| DaemonError::Unexpected(format!("install task panicked: {err}")))?
                    .map_err(|err| match err {
                        StorageError::AlreadyInstalled { .. } => DaemonError::MissingDriver { language: language.to_string() },
                        other => DaemonError::Storage(other),
                    })?;
                let rootfs = self.store.root_fs(&reference)?;
                Ok((rootfs, reference))
            }
            Err(other) => Err(other.into()),
        }
    }
}

#[async_trait]
impl PoolFactoryProvider for DefaultPoolFactoryProvider {
    async fn factory_for(&self, language: &str) -> Result<Arc<dyn WorkerFactory>, DaemonError> {
        let (rootfs, reference) = self.ensure_installed(language).await?;
        Ok(Arc::new(DriverWorkerFactory::new(
            reference,
            rootfs,
            Arc::clone(&self.runtime),
            self.tmp_root.clone(),
            self.worker_options.clone(),
        )))
    }

    fn policy_for(&self, _language: &str) -> Box<dyn ScalingPolicy> {
        drv_policy::default_policy()
    }

    fn tick(&self) -> Duration {
        self.tick
    }
}

#[cfg(test)]
#[path = "factory_provider_tests.rs"]
mod tests;
