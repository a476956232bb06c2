// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use drv_core::ErrorKind;
use thiserror::Error;

/// Errors raised while framing or decoding a wire message (spec §6).
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported protocol version byte: {0}")]
    UnsupportedVersion(u8),

    #[error("message of {size} bytes exceeds the configured maximum of {max} bytes")]
    MessageTooLarge { size: u32, max: u32 },
}

impl ProtocolError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ProtocolError::Io(_) => ErrorKind::Runtime,
            ProtocolError::Json(_) => ErrorKind::Unexpected,
            ProtocolError::UnsupportedVersion(_) => ErrorKind::Unexpected,
            ProtocolError::MessageTooLarge { .. } => ErrorKind::Unexpected,
        }
    }
}
