// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! `drv pool list` / `drv worker list` (spec §4.6 `DriverPoolStates`,
//! `DriverInstanceStates`).

use super::ControlEndpoint;
use crate::client::{call_control, reject_control_error};
use crate::error::CliError;
use crate::output::{print_instance_states, print_pool_states, OutputFormat};
use drv_wire::{ControlRequest, ControlResponse};

pub async fn pool_states(endpoint: &ControlEndpoint, format: OutputFormat) -> Result<(), CliError> {
    let response = call_control(&endpoint.network, &endpoint.address, &ControlRequest::DriverPoolStates).await?;
    match reject_control_error(response)? {
        ControlResponse::DriverPoolStates(entries) => {
            print_pool_states(&entries, format);
            Ok(())
        }
        _ => Err(CliError::UnexpectedResponse),
    }
}

pub async fn instance_states(endpoint: &ControlEndpoint, format: OutputFormat) -> Result<(), CliError> {
    let response = call_control(&endpoint.network, &endpoint.address, &ControlRequest::DriverInstanceStates).await?;
    match reject_control_error(response)? {
        ControlResponse::DriverInstanceStates(entries) => {
            print_instance_states(&entries, format);
            Ok(())
        }
        _ => Err(CliError::UnexpectedResponse),
    }
}

#[cfg(test)]
#[path = "pool_tests.rs"]
mod tests;
