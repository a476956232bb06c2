// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[yare::parameterized(
    python = { "main.py", Some("python") },
    go = { "server.go", Some("go") },
    uppercase_extension = { "Main.PY", Some("python") },
    no_extension = { "Makefile", None },
    unknown_extension = { "notes.txt", None },
    dotfile_with_known_extension = { ".hidden.rb", Some("ruby") },
)]
fn detects_by_extension(filename: &str, expected: Option<&str>) {
    let detector = ExtensionDetector::new();
    assert_eq!(detector.detect(filename, b""), expected.map(str::to_string));
}
