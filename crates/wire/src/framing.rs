// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Wire framing: 4-byte big-endian length prefix + JSON payload, optionally
//! preceded by a single protocol-version byte (spec §6, SPEC_FULL.md "two
//! wire-compatible protocol versions").
//!
//! The RPC transport and codec proper are out-of-scope external
//! collaborators (spec §1); this module is the narrow framing interface
//! the daemon and CLI both build on.

use crate::error::ProtocolError;
use serde::{de::DeserializeOwned, Serialize};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// Protocol version distinguishing the two wire-compatible client APIs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ProtocolVersion {
    /// `(filename, language, content)` only.
    V1 = 1,
    /// Adds `mode` and `timeout` to `Parse`.
    V2 = 2,
}

impl ProtocolVersion {
    pub fn from_byte(byte: u8) -> Result<Self, ProtocolError> {
        match byte {
            1 => Ok(ProtocolVersion::V1),
            2 => Ok(ProtocolVersion::V2),
            other => Err(ProtocolError::UnsupportedVersion(other)),
        }
    }

    pub fn as_byte(self) -> u8 {
        self as u8
    }
}

/// Serialize `value` to JSON. No length prefix; callers combine this with
/// [`write_message`] or [`write_versioned_message`].
pub fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>, ProtocolError> {
    Ok(serde_json::to_vec(value)?)
}

/// Deserialize a JSON payload.
pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, ProtocolError> {
    Ok(serde_json::from_slice(bytes)?)
}

/// Write `payload` prefixed with its length as a 4-byte big-endian `u32`.
pub async fn write_message<W: AsyncWrite + Unpin>(
    writer: &mut W,
    payload: &[u8],
) -> Result<(), ProtocolError> {
    let len = payload.len() as u32;
    writer.write_all(&len.to_be_bytes()).await?;
    writer.write_all(payload).await?;
    writer.flush().await?;
    Ok(())
}

/// Read a length-prefixed payload. Rejects frames over `max_bytes` before
/// allocating, so an oversized frame never results in an unbounded
/// allocation (spec §4.5 "Requests that exceed the configured maximum
/// message size are rejected at the transport").
pub async fn read_message<R: AsyncRead + Unpin>(
    reader: &mut R,
    max_bytes: u32,
) -> Result<Vec<u8>, ProtocolError> {
    let mut len_buf = [0u8; 4];
    reader.read_exact(&mut len_buf).await?;
    let len = u32::from_be_bytes(len_buf);
    if len > max_bytes {
        return Err(ProtocolError::MessageTooLarge { size: len, max: max_bytes });
    }
    let mut buf = vec![0u8; len as usize];
    reader.read_exact(&mut buf).await?;
    Ok(buf)
}

/// Write a version byte followed by a length-prefixed JSON payload.
pub async fn write_versioned_message<W: AsyncWrite + Unpin, T: Serialize>(
    writer: &mut W,
    version: ProtocolVersion,
    value: &T,
) -> Result<(), ProtocolError> {
    writer.write_u8(version.as_byte()).await?;
    let payload = encode(value)?;
    write_message(writer, &payload).await
}

/// Read a version byte followed by a length-prefixed JSON payload.
pub async fn read_versioned_message<R: AsyncRead + Unpin, T: DeserializeOwned>(
    reader: &mut R,
    max_bytes: u32,
) -> Result<(ProtocolVersion, T), ProtocolError> {
    let version = ProtocolVersion::from_byte(reader.read_u8().await?)?;
    let payload = read_message(reader, max_bytes).await?;
    Ok((version, decode(&payload)?))
}

#[cfg(test)]
#[path = "framing_tests.rs"]
mod tests;
