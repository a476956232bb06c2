// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Client-facing request shapes (spec §6).
//!
//! `mode` and `timeout_ms` are v2-only fields (SPEC_FULL.md "two
//! wire-compatible protocol versions"); v1 clients always send `None` and
//! the dispatcher applies its own defaults.

use serde::{Deserialize, Serialize};

/// Parse representation requested, mirroring bblfsh's historical modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParseMode {
    /// Language-agnostic semantic UAST (the default).
    Semantic,
    /// Semantic tree annotated with native-AST provenance.
    Annotated,
    /// Driver's own native AST shape, not normalized.
    Native,
}

impl Default for ParseMode {
    fn default() -> Self {
        ParseMode::Semantic
    }
}

/// `Parse(filename, language, content[, mode, timeout])` (spec §6).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParseRequest {
    pub filename: String,
    #[serde(default)]
    pub language: Option<String>,
    pub content: Vec<u8>,
    #[serde(default)]
    pub mode: Option<ParseMode>,
    #[serde(default)]
    pub timeout_ms: Option<u64>,
}

/// `NativeParse(filename, language, content)` (spec §6).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NativeParseRequest {
    pub filename: String,
    #[serde(default)]
    pub language: Option<String>,
    pub content: Vec<u8>,
}

/// Client-transport requests the core consumes (spec §6).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op")]
pub enum ClientRequest {
    Parse(ParseRequest),
    NativeParse(NativeParseRequest),
    Version,
    SupportedLanguages,
}

#[cfg(test)]
#[path = "request_tests.rs"]
mod tests;
