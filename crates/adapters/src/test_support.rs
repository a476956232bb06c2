// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Fakes exposed to other crates' dev-dependencies via the `test-support`
//! feature: a [`ContainerRuntime`] that never touches a real container
//! runtime, backed by an in-process "echo" driver that answers `Parse`
//! with the sent content as its tree (spec §8 concrete scenario 1).

use crate::container::{BindMount, ContainerHandle, ContainerRuntime, ContainerSpec, ContainerState};
use crate::error::AdapterError;
use async_trait::async_trait;
use drv_wire::{
    read_versioned_message, write_versioned_message, ClientRequest, ClientResponse, NativeParseResponse,
    ParseResponse, VersionInfo,
};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::net::{UnixListener, UnixStream};

const MAX_MESSAGE_BYTES: u32 = 64 * 1024 * 1024;

/// A [`ContainerRuntime`] whose "container" is an in-process task serving
/// the worker RPC protocol over the bind-mounted socket directory, so
/// [`crate::worker::DriverWorker::start`] can be exercised end to end
/// without a real container runtime.
#[derive(Default)]
pub struct FakeContainerRuntime {
    /// When set, `start` fails immediately instead of spawning — used to
    /// exercise the pool's spawn-failure/backoff paths.
    pub fail_start: AtomicBool,
}

impl FakeContainerRuntime {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self { fail_start: AtomicBool::new(true) }
    }
}

#[async_trait]
impl ContainerRuntime for FakeContainerRuntime {
    async fn start(&self, spec: ContainerSpec) -> Result<Box<dyn ContainerHandle>, AdapterError> {
        if self.fail_start.load(Ordering::SeqCst) {
            return Err(AdapterError::Spawn("FakeContainerRuntime configured to fail".to_string()));
        }

        let bind = spec
            .binds
            .iter()
            .find(|b| b.guest == PathBuf::from("/rpc"))
            .ok_or_else(|| AdapterError::Spawn("no /rpc bind mount in spec".to_string()))?;
        std::fs::create_dir_all(&bind.host)?;
        let socket_path = bind.host.join("rpc.sock");
        let _ = std::fs::remove_file(&socket_path);
        let listener = UnixListener::bind(&socket_path)?;

        let alive = Arc::new(AtomicBool::new(true));
        let accept_alive = Arc::clone(&alive);
        tokio::spawn(async move {
            loop {
                match listener.accept().await {
                    Ok((stream, _)) => {
                        let alive = Arc::clone(&accept_alive);
                        tokio::spawn(serve_connection(stream, alive));
                    }
                    Err(_) => return,
                }
            }
        });

        static NEXT_ID: std::sync::atomic::AtomicU64 = std::sync::atomic::AtomicU64::new(0);
        let id = NEXT_ID.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(FakeContainerHandle { id: format!("fake-{id}"), alive }))
    }
}

async fn serve_connection(mut stream: UnixStream, alive: Arc<AtomicBool>) {
    while alive.load(Ordering::SeqCst) {
        let (version, request) =
            match read_versioned_message::<_, ClientRequest>(&mut stream, MAX_MESSAGE_BYTES).await {
                Ok(pair) => pair,
                Err(_) => return,
            };
        let response = echo_response(request);
        if write_versioned_message(&mut stream, version, &response).await.is_err() {
            return;
        }
    }
}

/// Echoes `content` back verbatim as the tree/ast (spec §8 scenario 1).
fn echo_response(request: ClientRequest) -> ClientResponse {
    match request {
        ClientRequest::Parse(req) => ClientResponse::Parse(ParseResponse {
            tree: req.content,
            language: req.language.unwrap_or_default(),
            errors: Vec::new(),
            elapsed_ms: 0,
        }),
        ClientRequest::NativeParse(req) => ClientResponse::NativeParse(NativeParseResponse {
            ast: String::from_utf8_lossy(&req.content).into_owned(),
            language: req.language.unwrap_or_default(),
            errors: Vec::new(),
            elapsed_ms: 0,
        }),
        ClientRequest::Version => {
            ClientResponse::Version(VersionInfo { version: "0.0.0-fake".to_string(), build_time: "now".to_string() })
        }
        ClientRequest::SupportedLanguages => ClientResponse::SupportedLanguages(Vec::new()),
    }
}

struct FakeContainerHandle {
    id: String,
    alive: Arc<AtomicBool>,
}

#[async_trait]
impl ContainerHandle for FakeContainerHandle {
    fn id(&self) -> &str {
        &self.id
    }

    async fn state(&self) -> ContainerState {
        if self.alive.load(Ordering::SeqCst) {
            ContainerState::Running
        } else {
            ContainerState::Exited
        }
    }

    async fn kill(&self) -> Result<(), AdapterError> {
        self.alive.store(false, Ordering::SeqCst);
        Ok(())
    }
}

/// A [`BindMount`] pointing at a fresh temp directory, for tests that need
/// to build a [`ContainerSpec`] by hand.
pub fn fake_bind_mount(host: PathBuf) -> BindMount {
    BindMount { host, guest: PathBuf::from("/rpc") }
}
