// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Shared error kinds surfaced across crate boundaries (spec §7).
//!
//! Each crate keeps its own `thiserror` enum for the failures it can
//! produce locally (`AdapterError`, `PoolError`, `StorageError`, ...);
//! every one of those enums exposes a `kind(&self) -> ErrorKind` so the
//! control/client RPC layer can always attach a machine-recognizable
//! code to a response without string-matching a message.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Semantic error kind, independent of which crate raised it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorKind {
    /// Duplicate install without `update=true`.
    AlreadyInstalled,
    /// Image absent from storage.
    DriverNotInstalled,
    /// Manifest missing or invalid.
    MalformedDriver,
    /// Multiple digest directories for one reference (corrupted state).
    DirtyDriverStorage,
    /// No image installed for the requested language.
    MissingDriver,
    /// Detector returned "unknown".
    LanguageDetection,
    /// Content is not valid UTF-8.
    UnknownEncoding,
    /// The pool has been stopped and will not serve new requests.
    PoolClosed,
    /// Operation attempted while the pool is still running (e.g. double `Start`).
    PoolRunning,
    /// A worker failed its health check and was evicted.
    DriverStopped,
    /// Registry access denied.
    Unauthorized,
    /// Lower-level failure that doesn't map onto a semantic kind above.
    Unexpected,
    /// Wraps an adapter/runtime-level failure (I/O, process, transport).
    Runtime,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorKind::AlreadyInstalled => "already-installed",
            ErrorKind::DriverNotInstalled => "driver-not-installed",
            ErrorKind::MalformedDriver => "malformed-driver",
            ErrorKind::DirtyDriverStorage => "dirty-driver-storage",
            ErrorKind::MissingDriver => "missing-driver",
            ErrorKind::LanguageDetection => "language-detection",
            ErrorKind::UnknownEncoding => "unknown-encoding",
            ErrorKind::PoolClosed => "pool-closed",
            ErrorKind::PoolRunning => "pool-running",
            ErrorKind::DriverStopped => "driver-stopped",
            ErrorKind::Unauthorized => "unauthorized",
            ErrorKind::Unexpected => "unexpected",
            ErrorKind::Runtime => "runtime",
        };
        write!(f, "{s}")
    }
}

/// A generic error carrying a kind and a human-readable message.
///
/// Crate-local error enums convert into this at a boundary (e.g. when a
/// storage error crosses into the daemon's control-surface responses)
/// rather than every caller matching on crate-specific variants.
#[derive(Debug, Clone, thiserror::Error, Serialize, Deserialize)]
#[error("{message}")]
pub struct Error {
    pub kind: ErrorKind,
    pub message: String,
}

impl Error {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self { kind, message: message.into() }
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
