// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Worker identifier and lifecycle status (spec §3).

use serde::{Deserialize, Serialize};
use std::fmt;
use ulid::Ulid;

/// Unique identifier for a live worker instance.
///
/// Backed by a ULID so ids sort lexicographically by creation time,
/// which makes `DriverInstanceStates` output naturally ordered without
/// an extra sort pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WorkerId(pub Ulid);

impl WorkerId {
    /// Generate a new random worker id.
    pub fn new() -> Self {
        Self(Ulid::new())
    }

    pub fn as_str(&self) -> String {
        self.0.to_string()
    }
}

impl Default for WorkerId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for WorkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle status of a worker, derived from its container state (spec §4.2).
///
/// A worker is only usable (can be put in the idle set) while `Running`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkerStatus {
    /// Container spec built, not yet started.
    Created,
    /// Container running, handshake complete, ready to serve requests.
    Running,
    /// Stop requested, container is being torn down.
    Pausing,
    /// Container process has been paused (signal sent, not yet reaped).
    Paused,
    /// Container has exited or been removed.
    Stopped,
}

impl WorkerStatus {
    /// Whether a worker in this status can be handed out to a caller.
    pub fn is_usable(&self) -> bool {
        matches!(self, WorkerStatus::Running)
    }
}

impl fmt::Display for WorkerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            WorkerStatus::Created => "created",
            WorkerStatus::Running => "running",
            WorkerStatus::Pausing => "pausing",
            WorkerStatus::Paused => "paused",
            WorkerStatus::Stopped => "stopped",
        };
        write!(f, "{s}")
    }
}

#[cfg(test)]
#[path = "worker_tests.rs"]
mod tests;
