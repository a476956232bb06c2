// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test fixtures, exposed to other crates via the `test-support` feature.

use crate::image::{DevelopmentStatus, DriverManifest};
use chrono::{TimeZone, Utc};

/// A minimal, valid manifest for a fake "noop" language driver.
pub fn fake_manifest(language: &str) -> DriverManifest {
    DriverManifest {
        language: language.to_string(),
        version: "0.1.0".to_string(),
        build_time: Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap(),
        status: DevelopmentStatus::Beta,
        features: vec!["ast".to_string()],
        runtime: "fake-runtime".to_string(),
    }
}
