// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Fakes exposed to other crates' dev-dependencies via `test-support`.

use crate::error::StorageError;
use crate::layout::MANIFEST_REL_PATH;
use crate::transport::ImageTransport;
use drv_core::{DriverManifest, DriverReference, ImageDigest};
use sha2::{Digest as _, Sha256};
use std::fs;
use std::path::Path;
use std::sync::Mutex;

/// An in-memory transport that "installs" a manifest the caller hands it,
/// without talking to any real registry. Digest is derived from the
/// serialized manifest so reinstalling an unchanged manifest keeps the
/// same digest.
#[derive(Default)]
pub struct FakeTransport {
    /// Keyed by reference URI; `None` means "fail the fetch".
    manifests: Mutex<std::collections::HashMap<String, DriverManifest>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_manifest(&self, reference: &DriverReference, manifest: DriverManifest) {
        self.manifests.lock().unwrap().insert(reference.as_str().to_string(), manifest);
    }
}

impl ImageTransport for FakeTransport {
    fn fetch(
        &self,
        reference: &DriverReference,
        dest: &Path,
    ) -> Result<(ImageDigest, DriverManifest), StorageError> {
        let manifest = self
            .manifests
            .lock()
            .unwrap()
            .get(reference.as_str())
            .cloned()
            .ok_or_else(|| StorageError::Transport {
                reference: reference.as_str().to_string(),
                reason: "no manifest registered with FakeTransport".to_string(),
            })?;

        let manifest_toml = toml::to_string(&manifest)
            .map_err(|e| StorageError::Transport { reference: reference.as_str().to_string(), reason: e.to_string() })?;

        let manifest_path = dest.join(MANIFEST_REL_PATH);
        if let Some(parent) = manifest_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&manifest_path, &manifest_toml)?;

        let mut hasher = Sha256::new();
        hasher.update(manifest_toml.as_bytes());
        let digest = format!("sha256:{:x}", hasher.finalize());

        Ok((ImageDigest(digest), manifest))
    }
}
