// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! RPC listeners (spec §6 "wire protocol"): accept connections on the
//! client and control transports and dispatch each request onto
//! [`Dispatcher`]/[`ControlSurface`].
//!
//! Both servers share the same shape: bind, accept in a loop, spawn a
//! per-connection task that reads one framed request, dispatches it, and
//! writes one framed response. Shutdown is graceful (spec §4.5, DESIGN.md
//! Open Question b): cancelling the token stops the accept loop;
//! in-flight connections are left to finish on their own, and the caller
//! drains pools separately via `Registry::stop_all` only after every
//! server task has returned.

use crate::control::ControlSurface;
use crate::dispatcher::Dispatcher;
use drv_wire::{
    read_message, read_versioned_message, write_message, write_versioned_message, ClientRequest,
    ClientResponse, ControlRequest, ControlResponse,
};
use std::io;
use std::path::Path;
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream, UnixListener, UnixStream};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// A listening socket on one of the two transports `network`/`address`
/// (spec §6) can name. The daemon's own worker⇆daemon channel is unix
/// only (spec §4.2); this abstraction is for the client- and
/// control-facing surfaces, which a deployment may want reachable over
/// TCP.
pub enum BoundListener {
    Unix(UnixListener),
    Tcp(TcpListener),
}

impl BoundListener {
    /// Binds `network` ("unix" or "tcp") at `address`. For unix sockets,
    /// creates the parent directory and removes a stale socket file left
    /// behind by a previous, uncleanly stopped daemon.
    pub async fn bind(network: &str, address: &str) -> io::Result<Self> {
        match network {
            "unix" => {
                if let Some(parent) = Path::new(address).parent() {
                    std::fs::create_dir_all(parent)?;
                }
                match std::fs::remove_file(address) {
                    Ok(()) => {}
                    Err(err) if err.kind() == io::ErrorKind::NotFound => {}
                    Err(err) => return Err(err),
                }
                Ok(BoundListener::Unix(UnixListener::bind(address)?))
            }
            "tcp" => Ok(BoundListener::Tcp(TcpListener::bind(address).await?)),
            other => Err(io::Error::new(io::ErrorKind::InvalidInput, format!("unknown network {other:?}"))),
        }
    }
}

enum AcceptedStream {
    Unix(UnixStream),
    Tcp(TcpStream),
}

async fn accept_one(listener: &BoundListener) -> io::Result<AcceptedStream> {
    match listener {
        BoundListener::Unix(unix) => unix.accept().await.map(|(stream, _)| AcceptedStream::Unix(stream)),
        BoundListener::Tcp(tcp) => tcp.accept().await.map(|(stream, _)| AcceptedStream::Tcp(stream)),
    }
}

/// Client-facing RPC server: versioned framing over [`ClientRequest`]/[`ClientResponse`]
/// (spec §6 "two wire-compatible protocol versions").
pub struct ClientServer {
    listener: BoundListener,
    dispatcher: Arc<Dispatcher>,
    max_message_bytes: u32,
}

impl ClientServer {
    pub fn new(listener: BoundListener, dispatcher: Arc<Dispatcher>, max_message_bytes: u32) -> Self {
        Self { listener, dispatcher, max_message_bytes }
    }

    /// Accepts connections until `cancel` fires. Does not wait for
    /// in-flight connections to finish; callers drain pools separately
    /// once every server has returned.
    pub async fn run(self, cancel: CancellationToken) {
        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    info!("client server no longer accepting connections");
                    return;
                }
                result = accept_one(&self.listener) => {
                    match result {
                        Ok(AcceptedStream::Unix(stream)) => {
                            let dispatcher = Arc::clone(&self.dispatcher);
                            let max_bytes = self.max_message_bytes;
                            tokio::spawn(async move {
                                let (reader, writer) = stream.into_split();
                                if let Err(err) = handle_client_connection(reader, writer, &dispatcher, max_bytes).await {
                                    log_io_error("client", err);
                                }
                            });
                        }
                        Ok(AcceptedStream::Tcp(stream)) => {
                            let dispatcher = Arc::clone(&self.dispatcher);
                            let max_bytes = self.max_message_bytes;
                            tokio::spawn(async move {
                                let (reader, writer) = stream.into_split();
                                if let Err(err) = handle_client_connection(reader, writer, &dispatcher, max_bytes).await {
                                    log_io_error("client", err);
                                }
                            });
                        }
                        Err(err) => error!(%err, "client accept error"),
                    }
                }
            }
        }
    }
}

async fn handle_client_connection<R, W>(
    mut reader: R,
    mut writer: W,
    dispatcher: &Dispatcher,
    max_bytes: u32,
) -> Result<(), io::Error>
where
    R: AsyncRead + AsyncReadExt + Unpin + Send + 'static,
    W: AsyncWrite + AsyncWriteExt + Unpin + Send + 'static,
{
    loop {
        let (version, request) = match read_versioned_message::<_, ClientRequest>(&mut reader, max_bytes).await {
            Ok(pair) => pair,
            Err(_) => {
                debug!("client disconnected");
                return Ok(());
            }
        };

        let response = dispatch_client_request(dispatcher, request).await;
        write_versioned_message(&mut writer, version, &response)
            .await
            .map_err(|err| io::Error::new(io::ErrorKind::Other, err))?;
    }
}

async fn dispatch_client_request(dispatcher: &Dispatcher, request: ClientRequest) -> ClientResponse {
    match request {
        ClientRequest::Parse(req) => match dispatcher.parse(req).await {
            Ok(response) => ClientResponse::Parse(response),
            Err(err) => ClientResponse::Error { kind: err.kind(), message: err.to_string() },
        },
        ClientRequest::NativeParse(req) => match dispatcher.native_parse(req).await {
            Ok(response) => ClientResponse::NativeParse(response),
            Err(err) => ClientResponse::Error { kind: err.kind(), message: err.to_string() },
        },
        ClientRequest::Version => ClientResponse::Version(dispatcher.version()),
        ClientRequest::SupportedLanguages => match dispatcher.supported_languages().await {
            Ok(languages) => ClientResponse::SupportedLanguages(languages),
            Err(err) => ClientResponse::Error { kind: err.kind(), message: err.to_string() },
        },
    }
}

/// Control-facing RPC server: plain framing over [`ControlRequest`]/[`ControlResponse`]
/// (spec §4.6). Unversioned — the control surface has no client-visible
/// API evolution story the way the parse API does.
pub struct ControlServer {
    listener: BoundListener,
    control: Arc<ControlSurface>,
    max_message_bytes: u32,
}

impl ControlServer {
    pub fn new(listener: BoundListener, control: Arc<ControlSurface>, max_message_bytes: u32) -> Self {
        Self { listener, control, max_message_bytes }
    }

    pub async fn run(self, cancel: CancellationToken) {
        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    info!("control server no longer accepting connections");
                    return;
                }
                result = accept_one(&self.listener) => {
                    match result {
                        Ok(AcceptedStream::Unix(stream)) => {
                            let control = Arc::clone(&self.control);
                            let max_bytes = self.max_message_bytes;
                            tokio::spawn(async move {
                                let (reader, writer) = stream.into_split();
                                if let Err(err) = handle_control_connection(reader, writer, &control, max_bytes).await {
                                    log_io_error("control", err);
                                }
                            });
                        }
                        Ok(AcceptedStream::Tcp(stream)) => {
                            let control = Arc::clone(&self.control);
                            let max_bytes = self.max_message_bytes;
                            tokio::spawn(async move {
                                let (reader, writer) = stream.into_split();
                                if let Err(err) = handle_control_connection(reader, writer, &control, max_bytes).await {
                                    log_io_error("control", err);
                                }
                            });
                        }
                        Err(err) => error!(%err, "control accept error"),
                    }
                }
            }
        }
    }
}

async fn handle_control_connection<R, W>(
    mut reader: R,
    mut writer: W,
    control: &ControlSurface,
    max_bytes: u32,
) -> Result<(), io::Error>
where
    R: AsyncRead + AsyncReadExt + Unpin + Send + 'static,
    W: AsyncWrite + AsyncWriteExt + Unpin + Send + 'static,
{
    loop {
        let payload = match read_message(&mut reader, max_bytes).await {
            Ok(payload) => payload,
            Err(_) => {
                debug!("control client disconnected");
                return Ok(());
            }
        };
        let request: ControlRequest = match drv_wire::decode(&payload) {
            Ok(request) => request,
            Err(err) => {
                warn!(%err, "malformed control request");
                let response =
                    ControlResponse::Error { kind: drv_core::ErrorKind::Unexpected, message: err.to_string() };
                write_control_response(&mut writer, &response).await?;
                continue;
            }
        };

        let response = dispatch_control_request(control, request).await;
        write_control_response(&mut writer, &response).await?;
    }
}

async fn write_control_response<W: AsyncWrite + AsyncWriteExt + Unpin>(
    writer: &mut W,
    response: &ControlResponse,
) -> Result<(), io::Error> {
    let encoded = drv_wire::encode(response).map_err(|err| io::Error::new(io::ErrorKind::Other, err))?;
    write_message(writer, &encoded).await.map_err(|err| io::Error::new(io::ErrorKind::Other, err))
}

async fn dispatch_control_request(control: &ControlSurface, request: ControlRequest) -> ControlResponse {
    match request {
        ControlRequest::InstallDriver { language, reference, update } => {
            match control.install_driver(&language, &reference, update).await {
                Ok(()) => ControlResponse::Ok,
                Err(err) => ControlResponse::Error { kind: err.kind(), message: err.to_string() },
            }
        }
        ControlRequest::RemoveDriver { language } => match control.remove_driver(&language).await {
            Ok(()) => ControlResponse::Ok,
            Err(err) => ControlResponse::Error { kind: err.kind(), message: err.to_string() },
        },
        ControlRequest::DriverStates => match control.driver_states().await {
            Ok(states) => ControlResponse::DriverStates(states),
            Err(err) => ControlResponse::Error { kind: err.kind(), message: err.to_string() },
        },
        ControlRequest::DriverPoolStates => ControlResponse::DriverPoolStates(control.driver_pool_states().await),
        ControlRequest::DriverInstanceStates => {
            ControlResponse::DriverInstanceStates(control.driver_instance_states().await)
        }
        ControlRequest::InstallRecommended => ControlResponse::InstallRecommended(control.install_recommended().await),
    }
}

fn log_io_error(surface: &str, err: io::Error) {
    debug!(surface, %err, "connection handler exited with an I/O error");
}

#[cfg(test)]
#[path = "server_tests.rs"]
mod tests;
