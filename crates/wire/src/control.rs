// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Control-surface wire shapes (spec §4.6, §6 "Control RPC").

use drv_core::{DriverManifest, ErrorKind, ImageDigest};
use serde::{Deserialize, Serialize};

/// Control-transport requests (spec §4.6).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op")]
pub enum ControlRequest {
    InstallDriver { language: String, reference: String, #[serde(default)] update: bool },
    RemoveDriver { language: String },
    DriverStates,
    DriverPoolStates,
    DriverInstanceStates,
    /// One-shot mode: iterate a hard-coded recommended-driver list
    /// sequentially (spec §4.6).
    InstallRecommended,
}

/// One entry of `DriverStates()`: an installed image plus the language it
/// is registered under.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriverStateEntry {
    pub language: String,
    pub reference: String,
    pub digest: ImageDigest,
    pub manifest: DriverManifest,
}

/// One entry of `DriverPoolStates()`: per-language pool counters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriverPoolStateEntry {
    pub language: String,
    pub wanted: usize,
    pub running: usize,
    pub waiting: usize,
    pub successes: u64,
    pub failures: u64,
    pub exits: u64,
}

/// One entry of `DriverInstanceStates()`: a live worker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriverInstanceStateEntry {
    pub language: String,
    pub worker_id: String,
    pub status: String,
}

/// Control-transport responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ControlResponse {
    Ok,
    DriverStates(Vec<DriverStateEntry>),
    DriverPoolStates(Vec<DriverPoolStateEntry>),
    DriverInstanceStates(Vec<DriverInstanceStateEntry>),
    /// Results of an `InstallRecommended` pass, one outcome per attempted language.
    InstallRecommended(Vec<RecommendedInstallOutcome>),
    Error { kind: ErrorKind, message: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendedInstallOutcome {
    pub language: String,
    pub ok: bool,
    #[serde(default)]
    pub message: Option<String>,
}

#[cfg(test)]
#[path = "control_tests.rs"]
mod tests;
