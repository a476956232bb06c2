// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Language detection collaborator (spec §4.5 "invoke the detection
//! collaborator on `(filename, content)`").
//!
//! The real detector (enry or similar, keyed off file content heuristics
//! and extension tables) is an out-of-scope external collaborator (spec
//! §1); [`LanguageDetector`] is the narrow interface the dispatcher calls
//! through, with [`ExtensionDetector`] as a small, real, extension-keyed
//! stand-in so the daemon is runnable without that collaborator present.

use std::collections::HashMap;

/// Resolves a language from a filename and its content. Returns `None`
/// when detection can't determine a language at all (spec §4.5: "if
/// detection returns 'unknown', fail with `ErrLanguageDetection`").
pub trait LanguageDetector: Send + Sync {
    fn detect(&self, filename: &str, content: &[u8]) -> Option<String>;
}

/// Detects by file extension against a fixed table. Content is unused;
/// kept in the signature so a future content-sniffing detector is a
/// drop-in replacement.
pub struct ExtensionDetector {
    by_extension: HashMap<&'static str, &'static str>,
}

impl ExtensionDetector {
    pub fn new() -> Self {
        let by_extension = HashMap::from([
            ("py", "python"),
            ("go", "go"),
            ("rs", "rust"),
            ("java", "java"),
            ("rb", "ruby"),
            ("js", "javascript"),
            ("ts", "typescript"),
            ("c", "c"),
            ("h", "c"),
            ("cpp", "cpp"),
            ("cc", "cpp"),
            ("hpp", "cpp"),
            ("cs", "csharp"),
            ("php", "php"),
            ("sh", "bash"),
            ("kt", "kotlin"),
            ("scala", "scala"),
        ]);
        Self { by_extension }
    }
}

impl Default for ExtensionDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl LanguageDetector for ExtensionDetector {
    fn detect(&self, filename: &str, _content: &[u8]) -> Option<String> {
        let extension = std::path::Path::new(filename).extension()?.to_str()?.to_lowercase();
        self.by_extension.get(extension.as_str()).map(|lang| lang.to_string())
    }
}

#[cfg(test)]
#[path = "detect_tests.rs"]
mod tests;
