// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! `drv`: thin wire-protocol client for `drvd` (spec §4.6 "Control
//! Surface", §6 "Control RPC"). Carries no scheduling or storage logic of
//! its own — every subcommand is one request/response round trip against
//! either the control transport or, for the convenience parse commands,
//! the client transport a language library would otherwise use.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod client;
mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use commands::{ClientEndpoint, ControlEndpoint};
use commands::{client_ops, driver, pool, recommended};
use error::CliError;
use output::OutputFormat;
use std::path::PathBuf;

/// Mirrors `drvd`'s own defaults (`drv-daemon/src/config.rs`) so a bare
/// `drv <subcommand>` reaches a default-configured daemon with no flags.
const DEFAULT_CLIENT_NETWORK: &str = "unix";
const DEFAULT_CLIENT_ADDRESS: &str = "/var/run/drvd/drvd.sock";
const DEFAULT_CTL_NETWORK: &str = "unix";
const DEFAULT_CTL_ADDRESS: &str = "/var/run/drvd/drvd-ctl.sock";

#[derive(Parser)]
#[command(
    name = "drv",
    about = "Control client for the drvd driver pool scheduler daemon",
    version = concat!(env!("CARGO_PKG_VERSION"), "+", env!("BUILD_GIT_HASH"))
)]
struct Cli {
    /// Client-transport network ("unix" or "tcp").
    #[arg(long, global = true, default_value = DEFAULT_CLIENT_NETWORK)]
    network: String,
    /// Client-transport address.
    #[arg(long, global = true, default_value = DEFAULT_CLIENT_ADDRESS)]
    address: String,
    /// Control-transport network ("unix" or "tcp").
    #[arg(long = "ctl-network", global = true, default_value = DEFAULT_CTL_NETWORK)]
    ctl_network: String,
    /// Control-transport address.
    #[arg(long = "ctl-address", global = true, default_value = DEFAULT_CTL_ADDRESS)]
    ctl_address: String,
    /// Output format for commands that print structured state.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Install a driver image under a language (spec §4.6 `InstallDriver`).
    Install {
        /// Normalized language name the driver is registered under.
        language: String,
        /// Transport-prefixed image reference, e.g. `docker://bblfsh/python-driver:latest`.
        reference: String,
        /// Replace an already-installed digest instead of failing.
        #[arg(long)]
        update: bool,
    },
    /// Remove the driver installed for a language (spec §4.6 `RemoveDriver`).
    Remove {
        language: String,
    },
    /// List installed driver images (spec §4.6 `DriverStates`).
    #[command(alias = "states")]
    List,
    /// Install the hard-coded recommended driver list (spec §4.6 "install recommended").
    InstallRecommended,
    /// Report per-language pool counters (spec §4.6 `DriverPoolStates`).
    #[command(alias = "pool")]
    Pools,
    /// Report live worker state (spec §4.6 `DriverInstanceStates`).
    #[command(alias = "worker")]
    Instances,
    /// Query the daemon's own version over the client transport.
    Version,
    /// List languages the daemon can currently serve (spec §6 `SupportedLanguages`).
    Languages,
    /// Parse a file through the daemon (spec §6 `Parse`).
    Parse {
        file: PathBuf,
        /// Language override; detected from the filename/content when omitted.
        #[arg(long)]
        language: Option<String>,
        #[arg(long, value_enum)]
        mode: Option<client_ops::ParseModeArg>,
        #[arg(long = "timeout-ms")]
        timeout_ms: Option<u64>,
    },
    /// Parse a file and return the driver's own native AST (spec §6 `NativeParse`).
    NativeParse {
        file: PathBuf,
        #[arg(long)]
        language: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let ctl = ControlEndpoint { network: cli.ctl_network.clone(), address: cli.ctl_address.clone() };
    let client_ep = ClientEndpoint { network: cli.network.clone(), address: cli.address.clone() };

    let result = run(cli.command, &ctl, &client_ep, cli.format).await;
    if let Err(err) = result {
        eprintln!("drv: {err}");
        std::process::exit(err.exit_code());
    }
}

async fn run(
    command: Command,
    ctl: &ControlEndpoint,
    client_ep: &ClientEndpoint,
    format: OutputFormat,
) -> Result<(), CliError> {
    match command {
        Command::Install { language, reference, update } => driver::install(ctl, &language, &reference, update).await,
        Command::Remove { language } => driver::remove(ctl, &language).await,
        Command::List => driver::list(ctl, format).await,
        Command::InstallRecommended => recommended::install_recommended(ctl, format).await,
        Command::Pools => pool::pool_states(ctl, format).await,
        Command::Instances => pool::instance_states(ctl, format).await,
        Command::Version => client_ops::version(client_ep).await,
        Command::Languages => client_ops::supported_languages(client_ep, format).await,
        Command::Parse { file, language, mode, timeout_ms } => {
            client_ops::parse(client_ep, &file, language, mode, timeout_ms).await
        }
        Command::NativeParse { file, language } => client_ops::native_parse(client_ep, &file, language).await,
    }
}
