// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! drvd: the driver pool scheduler daemon.
//!
//! Wires together image storage, the container-backed worker lifecycle,
//! the per-language pool registry, and the client/control RPC surfaces
//! (spec §4.5, §4.6). Shutdown is graceful (DESIGN.md Open Question b):
//! SIGTERM/SIGINT stop both servers from accepting new connections first,
//! then every pool is drained so a worker mid-request gets to finish.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod config;
mod control;
mod detect;
mod dispatcher;
mod error;
mod factory_provider;
mod recommended;
mod registry;
mod server;

use clap::Parser;
use config::{DaemonArgs, DaemonConfig};
use control::ControlSurface;
use detect::ExtensionDetector;
use dispatcher::Dispatcher;
use drv_adapters::runtime::ProcessContainerRuntime;
use drv_adapters::WorkerOptions;
use drv_storage::{DockerTransport, ImageStore};
use recommended::StaticRecommendedDrivers;
use registry::Registry;
use server::{BoundListener, ClientServer, ControlServer};
use std::sync::Arc;
use tokio::signal::unix::{signal, SignalKind};
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = DaemonArgs::parse();
    let config = DaemonConfig::load(args)?;

    setup_logging(&config);
    info!(version = env!("CARGO_PKG_VERSION"), "starting drvd");

    let store = Arc::new(ImageStore::new(config.storage_dir.clone(), Arc::new(DockerTransport::new())));
    let runtime: Arc<dyn drv_adapters::ContainerRuntime> = Arc::new(ProcessContainerRuntime::default());
    let worker_options = WorkerOptions {
        log_level: config.log_level.clone(),
        log_format: config.log_format.clone(),
        socket_timeout: config.worker_socket_timeout,
    };
    let provider = Arc::new(factory_provider::DefaultPoolFactoryProvider::new(
        Arc::clone(&store),
        runtime,
        config.transport,
        config.image_overrides.clone(),
        worker_options,
        config.policy_tick,
    ));
    let registry = Arc::new(Registry::new());
    let dispatcher = Arc::new(Dispatcher::new(
        Arc::clone(&registry),
        provider as Arc<dyn registry::PoolFactoryProvider>,
        Arc::new(ExtensionDetector::new()),
        Arc::clone(&store),
    ));
    let control = Arc::new(ControlSurface::new(Arc::clone(&store), Arc::clone(&registry), Arc::new(StaticRecommendedDrivers)));

    let client_listener = BoundListener::bind(&config.client_network, &config.client_address).await?;
    let ctl_listener = BoundListener::bind(&config.ctl_network, &config.ctl_address).await?;
    // The control socket is permissioned world-writable on creation (spec
    // §6): any local user can administer the daemon, matching bblfsh's
    // historical trust model for its control RPC.
    set_world_writable_if_unix(&config.ctl_network, &config.ctl_address);

    let client_server = ClientServer::new(client_listener, Arc::clone(&dispatcher), config.grpc_max_message_bytes);
    let ctl_server = ControlServer::new(ctl_listener, Arc::clone(&control), config.grpc_max_message_bytes);

    let cancel = CancellationToken::new();
    let client_handle = tokio::spawn(client_server.run(cancel.child_token()));
    let ctl_handle = tokio::spawn(ctl_server.run(cancel.child_token()));

    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;

    info!(client = %config.client_address, control = %config.ctl_address, "drvd ready");

    tokio::select! {
        _ = sigterm.recv() => info!("received SIGTERM, shutting down"),
        _ = sigint.recv() => info!("received SIGINT, shutting down"),
    }

    // Phase one: stop accepting new connections.
    cancel.cancel();
    let _ = client_handle.await;
    let _ = ctl_handle.await;

    // Phase two: drain in-flight pools now that no new work can arrive.
    registry.stop_all().await;

    info!("drvd stopped");
    Ok(())
}

fn setup_logging(config: &DaemonConfig) {
    let filter = EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(filter);
    if config.log_format == "json" {
        registry.with(fmt::layer().json().with_current_span(false)).init();
    } else {
        registry.with(fmt::layer()).init();
    }
}

#[cfg(unix)]
fn set_world_writable_if_unix(network: &str, address: &str) {
    if network != "unix" {
        return;
    }
    use std::os::unix::fs::PermissionsExt;
    if let Err(err) = std::fs::set_permissions(address, std::fs::Permissions::from_mode(0o777)) {
        error!(%err, "failed to relax permissions on control socket");
    }
}

#[cfg(not(unix))]
fn set_world_writable_if_unix(_network: &str, _address: &str) {}
