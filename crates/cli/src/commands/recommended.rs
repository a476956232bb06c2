// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! `drv install-recommended` (spec §4.6 "a separate 'install recommended'
//! one-shot mode iterates a hard-coded recommended list and installs them
//! sequentially").

use super::ControlEndpoint;
use crate::client::{call_control, reject_control_error};
use crate::error::CliError;
use crate::output::{print_recommended_outcomes, OutputFormat};
use drv_wire::{ControlRequest, ControlResponse};

pub async fn install_recommended(endpoint: &ControlEndpoint, format: OutputFormat) -> Result<(), CliError> {
    let response = call_control(&endpoint.network, &endpoint.address, &ControlRequest::InstallRecommended).await?;
    match reject_control_error(response)? {
        ControlResponse::InstallRecommended(outcomes) => {
            let failed = outcomes.iter().filter(|o| !o.ok).count();
            print_recommended_outcomes(&outcomes, format);
            if failed > 0 {
                return Err(CliError::Remote {
                    kind: drv_core::ErrorKind::Unexpected,
                    message: format!("{failed} of {} recommended drivers failed to install", outcomes.len()),
                });
            }
            Ok(())
        }
        _ => Err(CliError::UnexpectedResponse),
    }
}

#[cfg(test)]
#[path = "recommended_tests.rs"]
mod tests;
