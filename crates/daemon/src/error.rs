// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon-level error type: wraps every lower crate's error plus the
//! failures that only make sense once requests are being dispatched
//! (missing driver, failed detection, bad encoding, unauthorized control
//! access). Every variant maps to a [`ErrorKind`] so [`crate::dispatcher`]
//! and [`crate::control`] can always attach a structured code to a wire
//! response instead of string-matching a message (spec §7).

use drv_adapters::AdapterError;
use drv_core::ErrorKind;
use drv_engine::{ExecuteError, PoolError};
use drv_storage::StorageError;
use drv_wire::ProtocolError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DaemonError {
    #[error("no driver installed for language {language:?}")]
    MissingDriver { language: String },

    #[error("could not detect a language for this content")]
    LanguageDetection,

    #[error("content is not valid UTF-8")]
    UnknownEncoding,

    #[error("unauthorized: {0}")]
    Unauthorized(String),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Pool(#[from] PoolError),

    #[error(transparent)]
    Adapter(#[from] AdapterError),

    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A worker answered with its own `ClientResponse::Error` (spec §6):
    /// carries the driver's reported kind through rather than collapsing
    /// it to `Unexpected`.
    #[error("{message}")]
    WireError { kind: ErrorKind, message: String },

    #[error("{0}")]
    Unexpected(String),
}

impl DaemonError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DaemonError::MissingDriver { .. } => ErrorKind::MissingDriver,
            DaemonError::LanguageDetection => ErrorKind::LanguageDetection,
            DaemonError::UnknownEncoding => ErrorKind::UnknownEncoding,
            DaemonError::Unauthorized(_) => ErrorKind::Unauthorized,
            DaemonError::Storage(e) => e.kind(),
            DaemonError::Pool(e) => e.kind(),
            DaemonError::Adapter(e) => e.kind(),
            DaemonError::Protocol(e) => e.kind(),
            DaemonError::WireError { kind, .. } => *kind,
            DaemonError::Unexpected(_) => ErrorKind::Unexpected,
        }
    }
}

/// `DriverPool::execute`'s error collapses the "couldn't get a worker" and
/// "worker call itself failed" cases into the same daemon-level error —
/// callers only care that the request failed and why, not which of the
/// two layers produced it.
impl From<ExecuteError<AdapterError>> for DaemonError {
    fn from(err: ExecuteError<AdapterError>) -> Self {
        match err {
            ExecuteError::Pool(e) => DaemonError::Pool(e),
            ExecuteError::Fn(e) => DaemonError::Adapter(e),
        }
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
