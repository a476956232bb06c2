// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Thin wire-protocol client: `drv` carries no business logic of its own,
//! only `drv-wire` shapes over whichever transport `drvd` is listening on
//! (spec §4.6, §6). Mirrors `drv-adapters::rpc::RpcClient`'s connect/call
//! split, generalized to both unix and tcp since the control and client
//! surfaces may be bound to either (spec §6 "Configuration surface").

use crate::error::CliError;
use drv_wire::{
    read_message, read_versioned_message, write_message, write_versioned_message, ClientRequest,
    ClientResponse, ControlRequest, ControlResponse, ProtocolVersion,
};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::{TcpStream, UnixStream};

/// Frames above this size are never expected on an admin CLI round trip;
/// large enough for any realistic file plus its tree.
pub(crate) const MAX_MESSAGE_BYTES: u32 = 256 * 1024 * 1024;

/// Same unix-or-tcp split `drv-daemon::server::BoundListener` uses on the
/// accept side; each branch is dispatched to the same generic round-trip
/// function rather than hand-rolling `AsyncRead`/`AsyncWrite` over an enum.
async fn dial(network: &str, address: &str) -> Result<Dialed, CliError> {
    match network {
        "unix" => UnixStream::connect(address)
            .await
            .map(Dialed::Unix)
            .map_err(|source| CliError::Connect { address: address.to_string(), source }),
        "tcp" => TcpStream::connect(address)
            .await
            .map(Dialed::Tcp)
            .map_err(|source| CliError::Connect { address: address.to_string(), source }),
        other => Err(CliError::Usage(format!("unknown network {other:?}, expected \"unix\" or \"tcp\""))),
    }
}

enum Dialed {
    Unix(UnixStream),
    Tcp(TcpStream),
}

/// One request/response round trip against the control transport
/// (`ctl-network`/`ctl-address`, spec §6).
pub async fn call_control(
    network: &str,
    address: &str,
    request: &ControlRequest,
) -> Result<ControlResponse, CliError> {
    match dial(network, address).await? {
        Dialed::Unix(stream) => control_round_trip(stream, request).await,
        Dialed::Tcp(stream) => control_round_trip(stream, request).await,
    }
}

async fn control_round_trip<S: AsyncRead + AsyncWrite + Unpin>(
    mut stream: S,
    request: &ControlRequest,
) -> Result<ControlResponse, CliError> {
    let payload = drv_wire::encode(request)?;
    write_message(&mut stream, &payload).await?;
    let response_bytes = read_message(&mut stream, MAX_MESSAGE_BYTES).await?;
    Ok(drv_wire::decode(&response_bytes)?)
}

/// One request/response round trip against the client transport
/// (`network`/`address`, spec §6), for the convenience commands (`drv
/// version`, `drv parse`, `drv languages`) that exercise the same RPC a
/// language client would.
pub async fn call_client(
    network: &str,
    address: &str,
    request: &ClientRequest,
) -> Result<ClientResponse, CliError> {
    match dial(network, address).await? {
        Dialed::Unix(stream) => client_round_trip(stream, request).await,
        Dialed::Tcp(stream) => client_round_trip(stream, request).await,
    }
}

async fn client_round_trip<S: AsyncRead + AsyncWrite + Unpin>(
    mut stream: S,
    request: &ClientRequest,
) -> Result<ClientResponse, CliError> {
    write_versioned_message(&mut stream, ProtocolVersion::V2, request).await?;
    let (_, response) = read_versioned_message(&mut stream, MAX_MESSAGE_BYTES).await?;
    Ok(response)
}

/// Turns a `ControlResponse::Error` into a [`CliError::Remote`]; every
/// other variant passes through for the caller to match on.
pub fn reject_control_error(response: ControlResponse) -> Result<ControlResponse, CliError> {
    match response {
        ControlResponse::Error { kind, message } => Err(CliError::Remote { kind, message }),
        other => Ok(other),
    }
}

/// Same as [`reject_control_error`] for the client transport.
pub fn reject_client_error(response: ClientResponse) -> Result<ClientResponse, CliError> {
    match response {
        ClientResponse::Error { kind, message } => Err(CliError::Remote { kind, message }),
        other => Ok(other),
    }
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
