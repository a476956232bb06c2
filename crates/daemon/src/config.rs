// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon configuration (spec §6 "Configuration surface"): defaults, then
//! an optional TOML file, then CLI flags/environment variables (`clap`'s
//! `env` feature folds the two together). Built once at startup and
//! handed out as `Arc<DaemonConfig>`; nothing mutates it afterward (spec
//! §9 design note).

use crate::error::DaemonError;
use clap::Parser;
use drv_core::Transport;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

const DEFAULT_CLIENT_ADDRESS: &str = "/var/run/drvd/drvd.sock";
const DEFAULT_CTL_ADDRESS: &str = "/var/run/drvd/drvd-ctl.sock";
const DEFAULT_STORAGE_DIR: &str = "/var/lib/drvd";
const DEFAULT_GRPC_MAX_MESSAGE_MB: u32 = 100;
const GRPC_MAX_MESSAGE_HARD_CEILING_MB: u32 = 2048;
/// Mirrors `drv_policy`'s own default tick (`drv-policy/src/default.rs`):
/// that module's `env` submodule is private, so the daemon reads
/// `BBLFSHD_POLICY_TICK` itself to size `DriverPool::start`'s tick
/// argument independent of the policy the pool happens to be running.
const DEFAULT_POLICY_TICK: Duration = Duration::from_millis(500);
const DEFAULT_WORKER_SOCKET_TIMEOUT: Duration = Duration::from_secs(5);

/// Command-line surface for `drvd` (spec §6 recognized options).
#[derive(Debug, Default, Parser)]
#[command(name = "drvd", about = "Driver pool scheduler daemon")]
pub struct DaemonArgs {
    /// Optional TOML file layered under the built-in defaults and under CLI/env overrides.
    #[arg(long, env = "DRVD_CONFIG")]
    pub config: Option<PathBuf>,

    #[arg(long, env = "DRVD_NETWORK")]
    pub network: Option<String>,
    #[arg(long, env = "DRVD_ADDRESS")]
    pub address: Option<String>,
    #[arg(long = "ctl-network", env = "DRVD_CTL_NETWORK")]
    pub ctl_network: Option<String>,
    #[arg(long = "ctl-address", env = "DRVD_CTL_ADDRESS")]
    pub ctl_address: Option<String>,
    #[arg(long, env = "DRVD_STORAGE")]
    pub storage: Option<PathBuf>,
    #[arg(long, env = "DRVD_TRANSPORT")]
    pub transport: Option<String>,
    #[arg(long = "grpc-max-message-size", env = "DRVD_GRPC_MAX_MESSAGE_SIZE")]
    pub grpc_max_message_size: Option<u32>,
    #[arg(long = "log-level", env = "DRVD_LOG_LEVEL")]
    pub log_level: Option<String>,
    #[arg(long = "log-format", env = "DRVD_LOG_FORMAT")]
    pub log_format: Option<String>,
    /// Comma-separated `k=v` pairs attached to every log event.
    #[arg(long = "log-fields", env = "DRVD_LOG_FIELDS")]
    pub log_fields: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct FileConfig {
    network: Option<String>,
    address: Option<String>,
    ctl_network: Option<String>,
    ctl_address: Option<String>,
    storage: Option<PathBuf>,
    transport: Option<String>,
    grpc_max_message_size: Option<u32>,
    log_level: Option<String>,
    log_format: Option<String>,
    log_fields: Option<String>,
    /// Per-language reference overrides (spec §3 "language normalization",
    /// §8 concrete scenario 4), seeded at startup; `ControlRequest::InstallDriver`
    /// extends this set at runtime via the registry, not this struct.
    #[serde(default)]
    image_overrides: HashMap<String, String>,
}

/// Immutable, fully-resolved daemon configuration.
#[derive(Debug, Clone)]
pub struct DaemonConfig {
    pub client_network: String,
    pub client_address: String,
    pub ctl_network: String,
    pub ctl_address: String,
    pub storage_dir: PathBuf,
    pub transport: Transport,
    pub grpc_max_message_bytes: u32,
    pub log_level: String,
    pub log_format: String,
    pub log_fields: Vec<(String, String)>,
    pub image_overrides: HashMap<String, String>,
    pub policy_tick: Duration,
    pub worker_socket_timeout: Duration,
}

impl DaemonConfig {
    /// Resolves defaults, an optional TOML file, then CLI/env overrides
    /// (`clap` already folds CLI flags and their `env` fallbacks
    /// together, so by the time `args` reaches here CLI/env are already
    /// one layer).
    pub fn load(args: DaemonArgs) -> Result<Self, DaemonError> {
        let file = match &args.config {
            Some(path) => read_file_config(path)?,
            None => FileConfig::default(),
        };

        let transport_name = args.transport.or(file.transport).unwrap_or_else(|| "docker".to_string());
        let transport = Transport::from_str(&transport_name)
            .map_err(|reason| DaemonError::Unexpected(format!("invalid transport {transport_name:?}: {reason}")))?;

        let grpc_max_message_size =
            args.grpc_max_message_size.or(file.grpc_max_message_size).unwrap_or(DEFAULT_GRPC_MAX_MESSAGE_MB);
        if grpc_max_message_size >= GRPC_MAX_MESSAGE_HARD_CEILING_MB {
            return Err(DaemonError::Unexpected(format!(
                "grpc-max-message-size must be below {GRPC_MAX_MESSAGE_HARD_CEILING_MB} MB, got {grpc_max_message_size}"
            )));
        }

        Ok(Self {
            client_network: args.network.or(file.network).unwrap_or_else(|| "unix".to_string()),
            client_address: args.address.or(file.address).unwrap_or_else(|| DEFAULT_CLIENT_ADDRESS.to_string()),
            ctl_network: args.ctl_network.or(file.ctl_network).unwrap_or_else(|| "unix".to_string()),
            ctl_address: args.ctl_address.or(file.ctl_address).unwrap_or_else(|| DEFAULT_CTL_ADDRESS.to_string()),
            storage_dir: args.storage.or(file.storage).unwrap_or_else(|| PathBuf::from(DEFAULT_STORAGE_DIR)),
            transport,
            grpc_max_message_bytes: grpc_max_message_size * 1024 * 1024,
            log_level: args.log_level.or(file.log_level).unwrap_or_else(|| "info".to_string()),
            log_format: args.log_format.or(file.log_format).unwrap_or_else(|| "text".to_string()),
            log_fields: parse_fields(args.log_fields.or(file.log_fields).as_deref().unwrap_or("")),
            image_overrides: file.image_overrides,
            policy_tick: policy_tick_from_env().unwrap_or(DEFAULT_POLICY_TICK),
            worker_socket_timeout: DEFAULT_WORKER_SOCKET_TIMEOUT,
        })
    }
}

fn read_file_config(path: &std::path::Path) -> Result<FileConfig, DaemonError> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| DaemonError::Unexpected(format!("reading config file {}: {e}", path.display())))?;
    toml::from_str(&text)
        .map_err(|e| DaemonError::Unexpected(format!("parsing config file {}: {e}", path.display())))
}

fn parse_fields(raw: &str) -> Vec<(String, String)> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .filter_map(|kv| kv.split_once('='))
        .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
        .collect()
}

fn policy_tick_from_env() -> Option<Duration> {
    std::env::var("BBLFSHD_POLICY_TICK").ok().and_then(|s| s.parse::<u64>().ok()).map(Duration::from_millis)
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
