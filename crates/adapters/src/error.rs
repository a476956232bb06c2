// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use drv_core::ErrorKind;
use thiserror::Error;

/// Errors raised by the container-backed worker lifecycle (spec §4.2).
#[derive(Debug, Error)]
pub enum AdapterError {
    #[error("container failed to start: {0}")]
    Spawn(String),

    #[error("worker's rpc socket never appeared within {0:?}")]
    SocketTimeout(std::time::Duration),

    #[error("version handshake with worker failed: {0}")]
    Handshake(String),

    #[error("worker is not running (status: {0})")]
    NotRunning(String),

    #[error("wire protocol error: {0}")]
    Protocol(#[from] drv_wire::ProtocolError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to signal worker process: {0}")]
    Signal(String),
}

impl AdapterError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AdapterError::NotRunning(_) => ErrorKind::DriverStopped,
            AdapterError::Spawn(_)
            | AdapterError::SocketTimeout(_)
            | AdapterError::Handshake(_)
            | AdapterError::Protocol(_)
            | AdapterError::Io(_)
            | AdapterError::Signal(_) => ErrorKind::Runtime,
        }
    }
}
