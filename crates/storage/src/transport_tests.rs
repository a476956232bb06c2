// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use crate::test_support::FakeTransport;
use crate::transport::ImageTransport;
use drv_core::test_support::fake_manifest;
use drv_core::DriverReference;
use tempfile::tempdir;

#[test]
fn fetch_without_registered_manifest_fails() {
    let transport = FakeTransport::new();
    let reference = DriverReference::new("docker://bblfsh/python-driver:latest");
    let dest = tempdir().unwrap();

    let err = transport.fetch(&reference, dest.path()).unwrap_err();
    assert!(matches!(err, crate::error::StorageError::Transport { .. }));
}

#[test]
fn fetch_writes_manifest_and_returns_digest() {
    let transport = FakeTransport::new();
    let reference = DriverReference::new("docker://bblfsh/python-driver:latest");
    transport.set_manifest(&reference, fake_manifest("python"));
    let dest = tempdir().unwrap();

    let (digest, manifest) = transport.fetch(&reference, dest.path()).unwrap();
    assert!(digest.0.starts_with("sha256:"));
    assert_eq!(manifest.language, "python");
    assert!(dest.path().join(crate::layout::MANIFEST_REL_PATH).exists());
}

#[test]
fn fetch_is_deterministic_for_unchanged_manifest() {
    let transport = FakeTransport::new();
    let reference = DriverReference::new("docker://bblfsh/python-driver:latest");
    transport.set_manifest(&reference, fake_manifest("python"));

    let dest_a = tempdir().unwrap();
    let dest_b = tempdir().unwrap();
    let (digest_a, _) = transport.fetch(&reference, dest_a.path()).unwrap();
    let (digest_b, _) = transport.fetch(&reference, dest_b.path()).unwrap();
    assert_eq!(digest_a.0, digest_b.0);
}
