// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Narrow interface onto the (out-of-scope) container runtime primitives —
//! namespaces and cgroups (spec §1, §4.2).
//!
//! A [`ContainerRuntime`] turns a [`ContainerSpec`] into a running
//! [`ContainerHandle`]; the namespace/cgroup isolation itself is the
//! external collaborator's concern, not this crate's.

use crate::error::AdapterError;
use async_trait::async_trait;
use std::path::PathBuf;

/// A host directory bind-mounted into the container at a guest path.
///
/// Used for the per-worker temporary directory holding the RPC socket
/// (spec §4.2 "host-side bind-mount providing a per-worker temporary
/// directory that contains the worker's RPC socket").
#[derive(Debug, Clone)]
pub struct BindMount {
    pub host: PathBuf,
    pub guest: PathBuf,
}

/// Everything needed to start one worker's container (spec §4.2
/// "Construction").
#[derive(Debug, Clone)]
pub struct ContainerSpec {
    /// Root filesystem, extracted by `drv-storage` under its
    /// content-addressed layout.
    pub rootfs: PathBuf,
    /// Arguments to the driver binary, e.g. selecting the unix socket
    /// transport and the socket path inside the container.
    pub args: Vec<String>,
    pub env: Vec<(String, String)>,
    pub binds: Vec<BindMount>,
}

/// Lifecycle state of a container as reported by the runtime (spec §4.2
/// "Health").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerState {
    Running,
    Exited,
}

/// Spawns containers from a [`ContainerSpec`].
#[async_trait]
pub trait ContainerRuntime: Send + Sync {
    async fn start(&self, spec: ContainerSpec) -> Result<Box<dyn ContainerHandle>, AdapterError>;
}

/// A live container. Dropping a handle does not stop the container —
/// callers must call [`ContainerHandle::kill`] explicitly, mirroring the
/// pool's explicit stop/drain lifecycle (spec §4.4 "Draining").
#[async_trait]
pub trait ContainerHandle: Send + Sync {
    fn id(&self) -> &str;
    async fn state(&self) -> ContainerState;
    async fn kill(&self) -> Result<(), AdapterError>;
}
