// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon registry: the per-language map of live [`DriverPool`]s (spec
//! §3 "DaemonRegistry", §4.5).
//!
//! Pools are created lazily on first use. Creating one means acquiring an
//! installed image (or installing the default reference for that
//! language) and handing a factory to [`DriverPool::start`] — the
//! mechanics of that live behind [`PoolFactoryProvider`] so this module
//! only has to know "give me a factory for this language or tell me why
//! not", not how storage and the container runtime are wired together.

use crate::error::DaemonError;
use async_trait::async_trait;
use drv_engine::{DriverPool, PoolHandle, PoolState, WorkerFactory};
use drv_policy::ScalingPolicy;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::info;

/// Produces the factory and scaling policy a newly created pool needs for
/// one language, resolving/installing the backing image along the way.
#[async_trait]
pub trait PoolFactoryProvider: Send + Sync {
    async fn factory_for(&self, language: &str) -> Result<Arc<dyn WorkerFactory>, DaemonError>;

    fn policy_for(&self, language: &str) -> Box<dyn ScalingPolicy>;

    fn tick(&self) -> Duration;
}

/// Per-language elastic-pool map (spec §4.5 "lazy pool creation").
pub struct Registry {
    pools: RwLock<HashMap<String, PoolHandle>>,
}

impl Registry {
    pub fn new() -> Self {
        Self { pools: RwLock::new(HashMap::new()) }
    }

    /// Returns the pool for `language`, creating it under a write lock if
    /// absent. Double-checks after acquiring the write lock so concurrent
    /// first-requests for the same language don't race two pools into
    /// existence (spec §4.5 "if missing... create a pool, register it").
    pub async fn get_or_create(
        &self,
        language: &str,
        provider: &dyn PoolFactoryProvider,
    ) -> Result<PoolHandle, DaemonError> {
        if let Some(pool) = self.pools.read().await.get(language) {
            return Ok(Arc::clone(pool));
        }

        let mut pools = self.pools.write().await;
        if let Some(pool) = pools.get(language) {
            return Ok(Arc::clone(pool));
        }

        let factory = provider.factory_for(language).await?;
        let policy = provider.policy_for(language);
        let pool = Arc::new(DriverPool::start(factory, policy, provider.tick()).await?);
        pools.insert(language.to_string(), Arc::clone(&pool));
        info!(%language, "driver pool created");
        Ok(pool)
    }

    pub async fn get(&self, language: &str) -> Option<PoolHandle> {
        self.pools.read().await.get(language).cloned()
    }

    pub async fn languages(&self) -> Vec<String> {
        self.pools.read().await.keys().cloned().collect()
    }

    pub async fn pool_states(&self) -> Vec<(String, PoolState)> {
        self.pools.read().await.iter().map(|(language, pool)| (language.clone(), pool.state())).collect()
    }

    pub async fn instance_states(&self) -> Vec<(String, Vec<Arc<dyn drv_engine::PoolWorker>>)> {
        self.pools.read().await.iter().map(|(language, pool)| (language.clone(), pool.current())).collect()
    }

    /// Stops every pool concurrently, waiting for all of them to drain
    /// before returning (spec §4.5 "Shutdown").
    pub async fn stop_all(&self) {
        let pools: Vec<PoolHandle> = self.pools.read().await.values().cloned().collect();
        let mut joins = tokio::task::JoinSet::new();
        for pool in pools {
            joins.spawn(async move {
                if let Err(err) = pool.stop().await {
                    tracing::warn!(%err, "error stopping pool during shutdown");
                }
            });
        }
        while joins.join_next().await.is_some() {}
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
