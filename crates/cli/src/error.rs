// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! CLI-local error type. Every variant maps to a process exit code so
//! `main` can turn any failure into `std::process::exit(code)` without
//! string-matching a message (mirrors `drv-daemon`'s `DaemonError::kind`
//! convention, one layer further down to a shell-visible number).

use drv_core::ErrorKind;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("could not reach drvd at {address}: {source}")]
    Connect { address: String, #[source] source: std::io::Error },

    #[error(transparent)]
    Protocol(#[from] drv_wire::ProtocolError),

    #[error("drvd rejected the request: {message}")]
    Remote { kind: ErrorKind, message: String },

    #[error("unexpected response shape from drvd")]
    UnexpectedResponse,

    #[error("{0}")]
    Usage(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Process exit code, grouped the way most admin CLIs split "your
    /// input was wrong" (2) from "we reached the daemon but it said no"
    /// (1) from "we never reached the daemon" (3).
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Usage(_) => 2,
            CliError::Connect { .. } => 3,
            CliError::Protocol(_) | CliError::Io(_) | CliError::UnexpectedResponse => 1,
            CliError::Remote { kind, .. } => match kind {
                ErrorKind::AlreadyInstalled
                | ErrorKind::DriverNotInstalled
                | ErrorKind::MalformedDriver
                | ErrorKind::DirtyDriverStorage
                | ErrorKind::MissingDriver => 4,
                ErrorKind::Unauthorized => 5,
                _ => 1,
            },
        }
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
