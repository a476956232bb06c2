// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! `drv driver install|remove|list` (spec §4.6 `InstallDriver`,
//! `RemoveDriver`, `DriverStates`).

use super::ControlEndpoint;
use crate::client::{call_control, reject_control_error};
use crate::error::CliError;
use crate::output::{print_driver_states, OutputFormat};
use drv_wire::ControlRequest;

pub async fn install(endpoint: &ControlEndpoint, language: &str, reference: &str, update: bool) -> Result<(), CliError> {
    let request = ControlRequest::InstallDriver { language: language.to_string(), reference: reference.to_string(), update };
    let response = call_control(&endpoint.network, &endpoint.address, &request).await?;
    reject_control_error(response)?;
    println!("installed {reference} for {language}");
    Ok(())
}

pub async fn remove(endpoint: &ControlEndpoint, language: &str) -> Result<(), CliError> {
    let request = ControlRequest::RemoveDriver { language: language.to_string() };
    let response = call_control(&endpoint.network, &endpoint.address, &request).await?;
    reject_control_error(response)?;
    println!("removed driver for {language}");
    Ok(())
}

pub async fn list(endpoint: &ControlEndpoint, format: OutputFormat) -> Result<(), CliError> {
    let response = call_control(&endpoint.network, &endpoint.address, &ControlRequest::DriverStates).await?;
    match reject_control_error(response)? {
        drv_wire::ControlResponse::DriverStates(entries) => {
            print_driver_states(&entries, format);
            Ok(())
        }
        _ => Err(CliError::UnexpectedResponse),
    }
}

#[cfg(test)]
#[path = "driver_tests.rs"]
mod tests;
