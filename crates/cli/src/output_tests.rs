// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use chrono::Utc;
use drv_core::{DevelopmentStatus, DriverManifest, ImageDigest};

fn manifest() -> DriverManifest {
    DriverManifest {
        language: "python".into(),
        version: "1.2.3".into(),
        build_time: Utc::now(),
        status: DevelopmentStatus::Stable,
        features: vec!["ast".into()],
        runtime: "python3.11".into(),
    }
}

#[test]
fn print_driver_states_handles_empty_and_populated_text() {
    print_driver_states(&[], OutputFormat::Text);
    let entries = vec![DriverStateEntry {
        language: "python".into(),
        reference: "docker://bblfsh/python-driver:latest".into(),
        digest: ImageDigest("abc123".into()),
        manifest: manifest(),
    }];
    print_driver_states(&entries, OutputFormat::Text);
    print_driver_states(&entries, OutputFormat::Json);
}

#[test]
fn print_pool_states_handles_empty_and_populated() {
    print_pool_states(&[], OutputFormat::Text);
    let entries = vec![DriverPoolStateEntry {
        language: "python".into(),
        wanted: 2,
        running: 2,
        waiting: 0,
        successes: 10,
        failures: 1,
        exits: 1,
    }];
    print_pool_states(&entries, OutputFormat::Text);
    print_pool_states(&entries, OutputFormat::Json);
}

#[test]
fn print_instance_states_handles_empty_and_populated() {
    print_instance_states(&[], OutputFormat::Text);
    let entries =
        vec![DriverInstanceStateEntry { language: "python".into(), worker_id: "01ARZ3".into(), status: "Running".into() }];
    print_instance_states(&entries, OutputFormat::Text);
    print_instance_states(&entries, OutputFormat::Json);
}

#[test]
fn print_recommended_outcomes_renders_success_and_failure() {
    let outcomes = vec![
        RecommendedInstallOutcome { language: "python".into(), ok: true, message: None },
        RecommendedInstallOutcome { language: "ruby".into(), ok: false, message: Some("timed out".into()) },
    ];
    print_recommended_outcomes(&outcomes, OutputFormat::Text);
    print_recommended_outcomes(&outcomes, OutputFormat::Json);
}

#[test]
fn print_supported_languages_handles_empty_and_populated() {
    print_supported_languages(&[], OutputFormat::Text);
    let languages = vec![LanguageInfo {
        name: "Python".into(),
        language: "python".into(),
        version: "1.2.3".into(),
        status: "stable".into(),
        features: vec!["ast".into(), "uast".into()],
        runtime: "python3.11".into(),
    }];
    print_supported_languages(&languages, OutputFormat::Text);
    print_supported_languages(&languages, OutputFormat::Json);
}
