// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Client-facing response shapes (spec §6).

use drv_core::ErrorKind;
use serde::{Deserialize, Serialize};

/// `Parse` result: a tree (opaque bytes from the driver's own encoding),
/// the resolved language, any parse errors, and elapsed time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParseResponse {
    pub tree: Vec<u8>,
    pub language: String,
    #[serde(default)]
    pub errors: Vec<String>,
    pub elapsed_ms: u64,
}

/// `NativeParse` result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NativeParseResponse {
    pub ast: String,
    pub language: String,
    #[serde(default)]
    pub errors: Vec<String>,
    pub elapsed_ms: u64,
}

/// `Version()` result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VersionInfo {
    pub version: String,
    pub build_time: String,
}

/// One entry of `SupportedLanguages()`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LanguageInfo {
    pub name: String,
    pub language: String,
    pub version: String,
    pub status: String,
    pub features: Vec<String>,
    pub runtime: String,
}

/// Client-transport responses (spec §6).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ClientResponse {
    Parse(ParseResponse),
    NativeParse(NativeParseResponse),
    Version(VersionInfo),
    SupportedLanguages(Vec<LanguageInfo>),
    Error { kind: ErrorKind, message: String },
}

#[cfg(test)]
#[path = "response_tests.rs"]
mod tests;
