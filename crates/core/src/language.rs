// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Language name normalization (spec §3).
//!
//! The same rule is applied both when a client names a language
//! explicitly and when the detection collaborator resolves one from
//! file content, so pool lookups never split on casing or punctuation.

/// Normalize a language name: lowercase, spaces to `-`, `+` to `p`, `#` to `sharp`.
///
/// Idempotent: `normalize(normalize(x)) == normalize(x)`.
pub fn normalize(input: &str) -> String {
    input
        .chars()
        .flat_map(|c| match c {
            ' ' => vec!['-'],
            '+' => vec!['p'],
            '#' => "sharp".chars().collect(),
            other => other.to_lowercase().collect(),
        })
        .collect()
}

#[cfg(test)]
#[path = "language_tests.rs"]
mod tests;
