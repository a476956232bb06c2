// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Text/JSON rendering for the control-surface responses (spec §4.6).
//! Mirrors the teacher CLI's `OutputFormat` split (text table for a
//! human, `serde_json::to_string_pretty` for scripts).

use clap::ValueEnum;
use drv_wire::{DriverInstanceStateEntry, DriverPoolStateEntry, DriverStateEntry, LanguageInfo, RecommendedInstallOutcome};
use serde::Serialize;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{text}"),
        Err(err) => eprintln!("failed to render JSON: {err}"),
    }
}

pub fn print_driver_states(entries: &[DriverStateEntry], format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(entries),
        OutputFormat::Text => {
            if entries.is_empty() {
                println!("no drivers installed");
                return;
            }
            println!("{:<16} {:<40} {:<12} {:<10} {}", "LANGUAGE", "REFERENCE", "VERSION", "STATUS", "DIGEST");
            for entry in entries {
                println!(
                    "{:<16} {:<40} {:<12} {:<10} {}",
                    entry.language,
                    entry.reference,
                    entry.manifest.version,
                    entry.manifest.status.to_string(),
                    entry.digest,
                );
            }
        }
    }
}

pub fn print_pool_states(entries: &[DriverPoolStateEntry], format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(entries),
        OutputFormat::Text => {
            if entries.is_empty() {
                println!("no pools registered");
                return;
            }
            println!(
                "{:<16} {:>7} {:>7} {:>7} {:>10} {:>10} {:>7}",
                "LANGUAGE", "WANTED", "RUNNING", "WAITING", "SUCCESSES", "FAILURES", "EXITS"
            );
            for entry in entries {
                println!(
                    "{:<16} {:>7} {:>7} {:>7} {:>10} {:>10} {:>7}",
                    entry.language,
                    entry.wanted,
                    entry.running,
                    entry.waiting,
                    entry.successes,
                    entry.failures,
                    entry.exits,
                );
            }
        }
    }
}

pub fn print_instance_states(entries: &[DriverInstanceStateEntry], format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(entries),
        OutputFormat::Text => {
            if entries.is_empty() {
                println!("no workers running");
                return;
            }
            println!("{:<16} {:<30} {}", "LANGUAGE", "WORKER", "STATUS");
            for entry in entries {
                println!("{:<16} {:<30} {}", entry.language, entry.worker_id, entry.status);
            }
        }
    }
}

pub fn print_recommended_outcomes(outcomes: &[RecommendedInstallOutcome], format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(outcomes),
        OutputFormat::Text => {
            for outcome in outcomes {
                let marker = if outcome.ok { "ok" } else { "FAILED" };
                match &outcome.message {
                    Some(message) => println!("{:<8} {:<16} {message}", marker, outcome.language),
                    None => println!("{:<8} {:<16}", marker, outcome.language),
                }
            }
        }
    }
}

pub fn print_supported_languages(languages: &[LanguageInfo], format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(languages),
        OutputFormat::Text => {
            if languages.is_empty() {
                println!("no languages supported");
                return;
            }
            println!("{:<16} {:<12} {:<10} {}", "LANGUAGE", "VERSION", "STATUS", "FEATURES");
            for lang in languages {
                println!("{:<16} {:<12} {:<10} {}", lang.language, lang.version, lang.status, lang.features.join(","));
            }
        }
    }
}

#[cfg(test)]
#[path = "output_tests.rs"]
mod tests;
