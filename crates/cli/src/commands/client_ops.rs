// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Convenience commands that exercise the client transport directly
//! (spec §6 `Parse`, `NativeParse`, `Version`, `SupportedLanguages`) —
//! useful for poking at a running `drvd` without a language-specific
//! client library.

use super::ClientEndpoint;
use crate::client::{call_client, reject_client_error};
use crate::error::CliError;
use crate::output::{print_supported_languages, OutputFormat};
use clap::ValueEnum;
use drv_wire::{ClientRequest, ClientResponse, NativeParseRequest, ParseMode, ParseRequest};
use std::path::Path;

/// CLI-facing mirror of [`drv_wire::ParseMode`]; kept separate so the
/// wire enum doesn't need to derive `clap::ValueEnum`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ParseModeArg {
    Semantic,
    Annotated,
    Native,
}

impl From<ParseModeArg> for ParseMode {
    fn from(arg: ParseModeArg) -> Self {
        match arg {
            ParseModeArg::Semantic => ParseMode::Semantic,
            ParseModeArg::Annotated => ParseMode::Annotated,
            ParseModeArg::Native => ParseMode::Native,
        }
    }
}

pub async fn version(endpoint: &ClientEndpoint) -> Result<(), CliError> {
    let response = call_client(&endpoint.network, &endpoint.address, &ClientRequest::Version).await?;
    match reject_client_error(response)? {
        ClientResponse::Version(info) => {
            println!("{} (built {})", info.version, info.build_time);
            Ok(())
        }
        _ => Err(CliError::UnexpectedResponse),
    }
}

pub async fn supported_languages(endpoint: &ClientEndpoint, format: OutputFormat) -> Result<(), CliError> {
    let response = call_client(&endpoint.network, &endpoint.address, &ClientRequest::SupportedLanguages).await?;
    match reject_client_error(response)? {
        ClientResponse::SupportedLanguages(languages) => {
            print_supported_languages(&languages, format);
            Ok(())
        }
        _ => Err(CliError::UnexpectedResponse),
    }
}

pub async fn parse(
    endpoint: &ClientEndpoint,
    file: &Path,
    language: Option<String>,
    mode: Option<ParseModeArg>,
    timeout_ms: Option<u64>,
) -> Result<(), CliError> {
    let content = std::fs::read(file)?;
    let filename = file.to_string_lossy().into_owned();
    let request = ClientRequest::Parse(ParseRequest {
        filename,
        language,
        content,
        mode: mode.map(ParseMode::from),
        timeout_ms,
    });
    let response = call_client(&endpoint.network, &endpoint.address, &request).await?;
    match reject_client_error(response)? {
        ClientResponse::Parse(parsed) => {
            println!("language: {}", parsed.language);
            println!("elapsed: {}ms", parsed.elapsed_ms);
            if !parsed.errors.is_empty() {
                println!("errors:");
                for error in &parsed.errors {
                    println!("  - {error}");
                }
            }
            println!("tree: {} bytes", parsed.tree.len());
            Ok(())
        }
        _ => Err(CliError::UnexpectedResponse),
    }
}

pub async fn native_parse(endpoint: &ClientEndpoint, file: &Path, language: Option<String>) -> Result<(), CliError> {
    let content = std::fs::read(file)?;
    let filename = file.to_string_lossy().into_owned();
    let request = ClientRequest::NativeParse(NativeParseRequest { filename, language, content });
    let response = call_client(&endpoint.network, &endpoint.address, &request).await?;
    match reject_client_error(response)? {
        ClientResponse::NativeParse(parsed) => {
            println!("language: {}", parsed.language);
            println!("elapsed: {}ms", parsed.elapsed_ms);
            println!("{}", parsed.ast);
            Ok(())
        }
        _ => Err(CliError::UnexpectedResponse),
    }
}

#[cfg(test)]
#[path = "client_ops_tests.rs"]
mod tests;
