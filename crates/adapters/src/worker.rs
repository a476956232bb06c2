// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! A live driver instance: one container, one RPC channel (spec §4.2, §3
//! "Worker").

use crate::container::{BindMount, ContainerHandle, ContainerRuntime, ContainerSpec, ContainerState};
use crate::error::AdapterError;
use crate::rpc::RpcClient;
use drv_core::{DriverReference, WorkerId, WorkerStatus};
use drv_wire::{ClientRequest, ClientResponse, ProtocolVersion};
use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, instrument};

/// Per-worker tunables the daemon's config surface exposes (spec §6
/// `log-level`, `log-format`).
#[derive(Debug, Clone)]
pub struct WorkerOptions {
    pub log_level: String,
    pub log_format: String,
    /// Bound on how long `start` waits for the socket to appear (spec §4.2
    /// default 5s).
    pub socket_timeout: Duration,
}

impl Default for WorkerOptions {
    fn default() -> Self {
        Self { log_level: "info".to_string(), log_format: "text".to_string(), socket_timeout: Duration::from_secs(5) }
    }
}

/// Guest-side path of the worker's RPC socket, inside the bind-mounted
/// temporary directory (spec §6 "Worker ⇆ daemon channel").
const GUEST_SOCKET_DIR: &str = "/rpc";
const SOCKET_FILE_NAME: &str = "rpc.sock";

/// One live driver instance: container + child process + RPC channel
/// (spec §3 "Worker").
pub struct DriverWorker {
    id: WorkerId,
    image: DriverReference,
    container: Box<dyn ContainerHandle>,
    rpc: RpcClient,
    /// Host-side socket directory, torn down on stop.
    socket_dir: PathBuf,
    status: Mutex<WorkerStatus>,
}

impl DriverWorker {
    /// Builds the container spec, launches it, waits for the socket, and
    /// performs the version handshake (spec §4.2 "Construction", "Start").
    #[instrument(skip(runtime, options), fields(worker_id = %id, image = %image))]
    pub async fn start(
        id: WorkerId,
        image: DriverReference,
        rootfs: PathBuf,
        runtime: &dyn ContainerRuntime,
        tmp_root: &Path,
        options: WorkerOptions,
    ) -> Result<Self, AdapterError> {
        let socket_dir = tmp_root.join(id.as_str());
        std::fs::create_dir_all(&socket_dir)?;

        let guest_socket_path = PathBuf::from(GUEST_SOCKET_DIR).join(SOCKET_FILE_NAME);
        let spec = ContainerSpec {
            rootfs,
            args: vec![
                "--network=unix".to_string(),
                format!("--address={}", guest_socket_path.display()),
                format!("--log-level={}", options.log_level),
                format!("--log-format={}", options.log_format),
            ],
            env: Vec::new(),
            binds: vec![BindMount { host: socket_dir.clone(), guest: PathBuf::from(GUEST_SOCKET_DIR) }],
        };

        let container = runtime.start(spec).await?;

        let host_socket_path = socket_dir.join(SOCKET_FILE_NAME);
        let rpc = RpcClient::connect(&host_socket_path, options.socket_timeout).await.map_err(|err| {
            let _ = std::fs::remove_dir_all(&socket_dir);
            err
        })?;
        rpc.handshake().await.map_err(|err| {
            let _ = std::fs::remove_dir_all(&socket_dir);
            err
        })?;

        info!("driver worker started");
        Ok(Self { id, image, container, rpc, socket_dir, status: Mutex::new(WorkerStatus::Running) })
    }

    pub fn id(&self) -> WorkerId {
        self.id
    }

    pub fn image(&self) -> &DriverReference {
        &self.image
    }

    /// Derives status from the container's own state (spec §4.2 "Health").
    pub async fn status(&self) -> WorkerStatus {
        if *self.status.lock() == WorkerStatus::Stopped {
            return WorkerStatus::Stopped;
        }
        match self.container.state().await {
            ContainerState::Running => WorkerStatus::Running,
            ContainerState::Exited => {
                *self.status.lock() = WorkerStatus::Stopped;
                WorkerStatus::Stopped
            }
        }
    }

    /// Forwards one request over the worker's RPC channel.
    pub async fn call(&self, request: ClientRequest) -> Result<ClientResponse, AdapterError> {
        if *self.status.lock() != WorkerStatus::Running {
            return Err(AdapterError::NotRunning(format!("{:?}", *self.status.lock())));
        }
        self.rpc.call(ProtocolVersion::V2, &request).await
    }

    /// Terminates the container and releases the socket directory (spec
    /// §4.2 "Stop").
    #[instrument(skip(self), fields(worker_id = %self.id))]
    pub async fn stop(&self) -> Result<(), AdapterError> {
        {
            let mut status = self.status.lock();
            if *status == WorkerStatus::Stopped {
                return Ok(());
            }
            *status = WorkerStatus::Pausing;
        }
        self.container.kill().await?;
        let _ = std::fs::remove_dir_all(&self.socket_dir);
        *self.status.lock() = WorkerStatus::Stopped;
        info!("driver worker stopped");
        Ok(())
    }
}

#[cfg(test)]
#[path = "worker_tests.rs"]
mod tests;
