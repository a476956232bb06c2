// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Local-socket RPC client a [`crate::worker::DriverWorker`] uses to reach
//! the driver process running inside its container (spec §4.2, §6 "Worker
//! ⇆ daemon channel").
//!
//! The worker and the daemon speak the same client-facing wire shapes
//! (`ClientRequest`/`ClientResponse`) the external transport exposes to
//! callers — a driver IS a parser that answers `Parse`/`Version` the same
//! way the daemon answers its own clients, just over a unix socket instead
//! of the public transport.

use crate::error::AdapterError;
use drv_wire::{
    read_versioned_message, write_versioned_message, ClientRequest, ClientResponse,
    ProtocolVersion,
};
use std::path::Path;
use std::time::{Duration, Instant};
use tokio::net::UnixStream;
use tokio::sync::Mutex;
use tracing::debug;

/// Requests above this size are never expected on the worker channel; it
/// only ever carries one file's content at a time.
const MAX_MESSAGE_BYTES: u32 = 256 * 1024 * 1024;

const CONNECT_RETRY_INTERVAL: Duration = Duration::from_millis(25);

/// One request/response pair at a time: the socket is a single stream, so
/// concurrent calls would otherwise interleave frames. The pool's own
/// at-most-one-request-per-worker invariant (spec §4.4) means this lock is
/// never contended in practice; it exists to make that invariant safe even
/// if violated.
pub struct RpcClient {
    stream: Mutex<UnixStream>,
}

impl RpcClient {
    /// Connects to `path`, retrying until it appears or `timeout` elapses
    /// (spec §4.2 "Start": "block until the socket is reachable (bounded
    /// timeout, default 5s)").
    pub async fn connect(path: &Path, timeout: Duration) -> Result<Self, AdapterError> {
        let deadline = Instant::now() + timeout;
        loop {
            match UnixStream::connect(path).await {
                Ok(stream) => return Ok(Self { stream: Mutex::new(stream) }),
                Err(err) => {
                    if Instant::now() >= deadline {
                        debug!(%err, path = %path.display(), "socket never became reachable");
                        return Err(AdapterError::SocketTimeout(timeout));
                    }
                    tokio::time::sleep(CONNECT_RETRY_INTERVAL).await;
                }
            }
        }
    }

    /// Issues one request and awaits the matching response.
    pub async fn call(
        &self,
        version: ProtocolVersion,
        request: &ClientRequest,
    ) -> Result<ClientResponse, AdapterError> {
        let mut stream = self.stream.lock().await;
        write_versioned_message(&mut *stream, version, request).await?;
        let (_, response) = read_versioned_message(&mut *stream, MAX_MESSAGE_BYTES).await?;
        Ok(response)
    }

    /// Version handshake performed once at worker startup (spec §4.2
    /// "issue a version handshake; fail fast on any step").
    pub async fn handshake(&self) -> Result<(), AdapterError> {
        match self.call(ProtocolVersion::V2, &ClientRequest::Version).await? {
            ClientResponse::Version(_) => Ok(()),
            ClientResponse::Error { kind, message } => {
                Err(AdapterError::Handshake(format!("{kind}: {message}")))
            }
            other => Err(AdapterError::Handshake(format!("unexpected response: {other:?}"))),
        }
    }
}

#[cfg(test)]
#[path = "rpc_tests.rs"]
mod tests;
