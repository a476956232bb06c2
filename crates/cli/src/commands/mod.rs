// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! `drv` subcommand implementations, one module per control-surface
//! operation or convenience client call (spec §4.6, §6).

pub mod client_ops;
pub mod driver;
pub mod pool;
pub mod recommended;

/// Control-transport endpoint a command connects to, resolved once in
/// `main` from the CLI flags (spec §6 `ctl-network`/`ctl-address`).
#[derive(Debug, Clone)]
pub struct ControlEndpoint {
    pub network: String,
    pub address: String,
}

/// Client-transport endpoint for the convenience commands that exercise
/// the same RPC a language client would (spec §6 `network`/`address`).
#[derive(Debug, Clone)]
pub struct ClientEndpoint {
    pub network: String,
    pub address: String,
}
