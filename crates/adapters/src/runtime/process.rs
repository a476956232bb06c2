// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Real [`ContainerRuntime`](crate::container::ContainerRuntime) backed by a
//! plain child process rooted at the image's extracted rootfs.
//!
//! The namespace/cgroup isolation that would normally wrap this spawn is
//! the out-of-scope container runtime primitive (spec §1) — in production
//! this process is launched inside a container by the surrounding
//! infrastructure; this runtime only owns the process lifecycle (spawn,
//! poll, signal, reap).

use crate::container::{BindMount, ContainerHandle, ContainerRuntime, ContainerSpec, ContainerState};
use crate::error::AdapterError;
use async_trait::async_trait;
use nix::sys::signal::{self, Signal};
use nix::unistd::Pid;
use parking_lot::Mutex;
use tokio::process::{Child, Command};
use tracing::{info, instrument, warn};

/// Fixed relative path of the driver binary inside an extracted rootfs.
pub const DRIVER_BINARY_REL_PATH: &str = "bin/driver";

pub struct ProcessContainerRuntime;

impl Default for ProcessContainerRuntime {
    fn default() -> Self {
        Self
    }
}

#[async_trait]
impl ContainerRuntime for ProcessContainerRuntime {
    #[instrument(skip(self, spec), fields(rootfs = %spec.rootfs.display()))]
    async fn start(&self, spec: ContainerSpec) -> Result<Box<dyn ContainerHandle>, AdapterError> {
        for bind in &spec.binds {
            ensure_bind_ready(bind)?;
        }

        let binary = spec.rootfs.join(DRIVER_BINARY_REL_PATH);
        let mut command = Command::new(&binary);
        command.current_dir(&spec.rootfs).args(&spec.args);
        for (key, value) in &spec.env {
            command.env(key, value);
        }
        command.kill_on_drop(true);

        let child = command
            .spawn()
            .map_err(|e| AdapterError::Spawn(format!("{}: {e}", binary.display())))?;
        let id = child.id().map(|pid| pid.to_string()).unwrap_or_default();
        info!(pid = %id, "driver process started");

        Ok(Box::new(ProcessHandle { id, child: Mutex::new(child) }))
    }
}

/// Host side of a bind mount only needs to exist; the guest-side path is
/// resolved by the driver binary itself once it starts.
fn ensure_bind_ready(bind: &BindMount) -> Result<(), AdapterError> {
    std::fs::create_dir_all(&bind.host)?;
    Ok(())
}

struct ProcessHandle {
    id: String,
    child: Mutex<Child>,
}

#[async_trait]
impl ContainerHandle for ProcessHandle {
    fn id(&self) -> &str {
        &self.id
    }

    async fn state(&self) -> ContainerState {
        let mut child = self.child.lock();
        match child.try_wait() {
            Ok(Some(_)) => ContainerState::Exited,
            Ok(None) => ContainerState::Running,
            Err(_) => ContainerState::Exited,
        }
    }

    async fn kill(&self) -> Result<(), AdapterError> {
        let pid = {
            let child = self.child.lock();
            child.id()
        };
        let Some(pid) = pid else {
            return Ok(());
        };
        match signal::kill(Pid::from_raw(pid as i32), Signal::SIGTERM) {
            Ok(()) => {}
            Err(nix::errno::Errno::ESRCH) => return Ok(()),
            Err(e) => warn!(pid, %e, "SIGTERM delivery failed, falling back to kill()"),
        }
        let mut child = self.child.lock();
        let _ = child.start_kill();
        Ok(())
    }
}

#[cfg(test)]
#[path = "process_tests.rs"]
mod tests;
