// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Driver image data model (spec §3, §4.1).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Transport used to resolve a driver image reference (spec §6 `transport` option).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Transport {
    Docker,
    DockerDaemon,
}

impl Default for Transport {
    fn default() -> Self {
        Transport::Docker
    }
}

impl fmt::Display for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Transport::Docker => write!(f, "docker"),
            Transport::DockerDaemon => write!(f, "docker-daemon"),
        }
    }
}

impl std::str::FromStr for Transport {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "docker" => Ok(Transport::Docker),
            "docker-daemon" => Ok(Transport::DockerDaemon),
            other => Err(format!("unknown transport: {other}")),
        }
    }
}

/// The origin URI for a driver image, transport-prefixed
/// (e.g. `docker://bblfsh/python-driver:latest`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DriverReference(pub String);

impl DriverReference {
    pub fn new(uri: impl Into<String>) -> Self {
        Self(uri.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Default image reference for a language (spec §4.5, concrete scenario 4):
    ///
    /// - `docker` transport: `docker://bblfsh/<lang>-driver:latest`
    /// - `docker-daemon` transport: `docker-daemon:bblfsh/<lang>-driver:latest`
    /// - unless `overrides` names an explicit reference for the language.
    pub fn resolve(language: &str, transport: Transport, overrides: &HashMap<String, String>) -> Self {
        if let Some(custom) = overrides.get(language) {
            return Self(custom.clone());
        }
        let image = format!("bblfsh/{language}-driver:latest");
        match transport {
            Transport::Docker => Self(format!("docker://{image}")),
            Transport::DockerDaemon => Self(format!("docker-daemon:{image}")),
        }
    }
}

impl fmt::Display for DriverReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Content hash of a driver image's layer set, used as the on-disk directory name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageDigest(pub String);

impl fmt::Display for ImageDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Development maturity recorded in a driver's manifest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DevelopmentStatus {
    Alpha,
    Beta,
    Stable,
    Deprecated,
}

impl fmt::Display for DevelopmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DevelopmentStatus::Alpha => "alpha",
            DevelopmentStatus::Beta => "beta",
            DevelopmentStatus::Stable => "stable",
            DevelopmentStatus::Deprecated => "deprecated",
        };
        write!(f, "{s}")
    }
}

/// Parsed `manifest.toml` shipped inside a driver's rootfs (spec §4.1).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriverManifest {
    pub language: String,
    pub version: String,
    pub build_time: DateTime<Utc>,
    pub status: DevelopmentStatus,
    #[serde(default)]
    pub features: Vec<String>,
    /// Native runtime the driver embeds (e.g. "python3.11", "openjdk17").
    pub runtime: String,
}

/// One installed image as reported by `List`/`DriverStates`/`SupportedLanguages`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageStatus {
    pub reference: DriverReference,
    pub digest: ImageDigest,
    pub manifest: DriverManifest,
}

#[cfg(test)]
#[path = "image_tests.rs"]
mod tests;
