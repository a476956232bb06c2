// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Control surface (spec §4.6): install/remove drivers, report image,
//! pool, and worker state.

use crate::error::DaemonError;
use crate::recommended::RecommendedDrivers;
use crate::registry::Registry;
use drv_core::{normalize, DriverReference};
use drv_storage::{ImageStore, StorageError};
use drv_wire::{DriverInstanceStateEntry, DriverPoolStateEntry, DriverStateEntry, RecommendedInstallOutcome};
use std::sync::Arc;
use tracing::info;

pub struct ControlSurface {
    store: Arc<ImageStore>,
    registry: Arc<Registry>,
    recommended: Arc<dyn RecommendedDrivers>,
}

impl ControlSurface {
    pub fn new(store: Arc<ImageStore>, registry: Arc<Registry>, recommended: Arc<dyn RecommendedDrivers>) -> Self {
        Self { store, registry, recommended }
    }

    /// Installs `reference` under `language`; refuses a duplicate unless
    /// `update=true` (spec §4.6 `InstallDriver`).
    pub async fn install_driver(&self, language: &str, reference: &str, update: bool) -> Result<(), DaemonError> {
        let store = Arc::clone(&self.store);
        let driver_reference = DriverReference::new(reference);
        tokio::task::spawn_blocking(move || store.install(&driver_reference, update))
            .await
            .map_err(|err| DaemonError::Unexpected(format!("install task panicked: {err}")))??;
        info!(language = %normalize(language), reference, "driver installed via control surface");
        Ok(())
    }

    /// Resolves `language` to its installed reference by scanning stored
    /// manifests, then removes it (spec §4.6 `RemoveDriver(lang)`).
    pub async fn remove_driver(&self, language: &str) -> Result<(), DaemonError> {
        let target = normalize(language);
        let store = Arc::clone(&self.store);
        let lookup_target = target.clone();
        tokio::task::spawn_blocking(move || {
            let statuses = store.list()?;
            let reference = statuses
                .into_iter()
                .find(|status| normalize(&status.manifest.language) == lookup_target)
                .map(|status| status.reference)
                .ok_or_else(|| StorageError::DriverNotInstalled { reference: lookup_target.clone() })?;
            store.remove(&reference)
        })
        .await
        .map_err(|err| DaemonError::Unexpected(format!("remove task panicked: {err}")))??;
        info!(language = %target, "driver removed via control surface");
        Ok(())
    }

    pub async fn driver_states(&self) -> Result<Vec<DriverStateEntry>, DaemonError> {
        let store = Arc::clone(&self.store);
        let statuses = tokio::task::spawn_blocking(move || store.list())
            .await
            .map_err(|err| DaemonError::Unexpected(format!("list task panicked: {err}")))??;
        Ok(statuses
            .into_iter()
            .map(|status| DriverStateEntry {
                language: normalize(&status.manifest.language),
                reference: status.reference.as_str().to_string(),
                digest: status.digest,
                manifest: status.manifest,
            })
            .collect())
    }

    pub async fn driver_pool_states(&self) -> Vec<DriverPoolStateEntry> {
        self.registry
            .pool_states()
            .await
            .into_iter()
            .map(|(language, state)| DriverPoolStateEntry {
                language,
                wanted: state.wanted,
                running: state.running,
                waiting: state.waiting,
                successes: state.successes,
                failures: state.failures,
                exits: state.exits,
            })
            .collect()
    }

    pub async fn driver_instance_states(&self) -> Vec<DriverInstanceStateEntry> {
        let mut out = Vec::new();
        for (language, workers) in self.registry.instance_states().await {
            for worker in workers {
                let status = worker.status().await;
                out.push(DriverInstanceStateEntry {
                    language: language.clone(),
                    worker_id: worker.id().to_string(),
                    status: status.to_string(),
                });
            }
        }
        out
    }

    /// Installs the hard-coded recommended list sequentially, recording
    /// one outcome per language rather than stopping at the first
    /// failure (spec §4.6 "a separate 'install recommended' one-shot
    /// mode iterates a hard-coded recommended list").
    pub async fn install_recommended(&self) -> Vec<RecommendedInstallOutcome> {
        let mut outcomes = Vec::new();
        for driver in self.recommended.drivers() {
            let result = self.install_driver(&driver.language, &driver.reference, false).await;
            let outcome = match result {
                Ok(()) => RecommendedInstallOutcome { language: driver.language, ok: true, message: None },
                Err(DaemonError::Storage(StorageError::AlreadyInstalled { .. })) => RecommendedInstallOutcome {
                    language: driver.language,
                    ok: true,
                    message: Some("already installed".to_string()),
                },
                Err(err) => {
                    RecommendedInstallOutcome { language: driver.language, ok: false, message: Some(err.to_string()) }
                }
            };
            outcomes.push(outcome);
        }
        outcomes
    }
}

#[cfg(test)]
#[path = "control_tests.rs"]
mod tests;
