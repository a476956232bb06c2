// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use drv_core::ErrorKind;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("driver already installed: {reference}")]
    AlreadyInstalled { reference: String },

    #[error("driver not installed: {reference}")]
    DriverNotInstalled { reference: String },

    #[error("malformed driver manifest for {reference}: {reason}")]
    MalformedDriver { reference: String, reason: String },

    #[error("dirty driver storage for {reference}: {count} digest directories present")]
    DirtyDriverStorage { reference: String, count: usize },

    #[error("transport failed to fetch {reference}: {reason}")]
    Transport { reference: String, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl StorageError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            StorageError::AlreadyInstalled { .. } => ErrorKind::AlreadyInstalled,
            StorageError::DriverNotInstalled { .. } => ErrorKind::DriverNotInstalled,
            StorageError::MalformedDriver { .. } => ErrorKind::MalformedDriver,
            StorageError::DirtyDriverStorage { .. } => ErrorKind::DirtyDriverStorage,
            StorageError::Transport { .. } => ErrorKind::Runtime,
            StorageError::Io(_) | StorageError::Json(_) => ErrorKind::Runtime,
        }
    }
}
