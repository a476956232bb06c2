// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Recommended-driver list consumed by `InstallRecommended` (spec §4.6):
//! process-wide, read-mostly data exposed through an injected interface
//! rather than a package-level global (spec §9 "Global registries").

/// One entry of the recommended-driver list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecommendedDriver {
    pub language: String,
    pub reference: String,
}

/// Supplies the recommended-driver list. Tests inject a short or
/// deliberately-failing list; `StaticRecommendedDrivers` is the real one.
pub trait RecommendedDrivers: Send + Sync {
    fn drivers(&self) -> Vec<RecommendedDriver>;
}

const RECOMMENDED: &[(&str, &str)] = &[
    ("python", "docker://bblfsh/python-driver:latest"),
    ("go", "docker://bblfsh/go-driver:latest"),
    ("javascript", "docker://bblfsh/javascript-driver:latest"),
    ("typescript", "docker://bblfsh/typescript-driver:latest"),
    ("java", "docker://bblfsh/java-driver:latest"),
    ("ruby", "docker://bblfsh/ruby-driver:latest"),
    ("php", "docker://bblfsh/php-driver:latest"),
    ("bash", "docker://bblfsh/bash-driver:latest"),
];

/// The fixed set of languages this daemon ships official images for.
pub struct StaticRecommendedDrivers;

impl RecommendedDrivers for StaticRecommendedDrivers {
    fn drivers(&self) -> Vec<RecommendedDriver> {
        RECOMMENDED
            .iter()
            .map(|(language, reference)| RecommendedDriver {
                language: (*language).to_string(),
                reference: (*reference).to_string(),
            })
            .collect()
    }
}

#[cfg(test)]
#[path = "recommended_tests.rs"]
mod tests;
