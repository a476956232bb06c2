// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! The store itself (spec §4.1): `Install`/`Remove`/`RootFS`/`List` over the
//! content-addressed layout, with install done via stage-then-rename so a
//! crash mid-fetch never leaves a partially-written canonical path.

use crate::error::StorageError;
use crate::layout::{Layout, MANIFEST_REL_PATH};
use crate::transport::ImageTransport;
use drv_core::{DriverManifest, DriverReference, ImageDigest, ImageStatus};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, instrument, warn};

pub struct ImageStore {
    layout: Layout,
    transport: Arc<dyn ImageTransport>,
}

impl ImageStore {
    pub fn new(root: impl Into<PathBuf>, transport: Arc<dyn ImageTransport>) -> Self {
        Self { layout: Layout::new(root), transport }
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Resolves `reference`'s digest via the transport; if a digest is
    /// already installed and `update` is false, fails with
    /// [`StorageError::AlreadyInstalled`]. Otherwise stages the fetch in a
    /// scratch directory, validates the manifest landed at
    /// [`MANIFEST_REL_PATH`], then renames the staged rootfs into place and
    /// removes any prior digest directory for this reference.
    #[instrument(skip(self), fields(reference = %reference))]
    pub fn install(&self, reference: &DriverReference, update: bool) -> Result<ImageStatus, StorageError> {
        let existing = self.current_digest(reference)?;

        let staging = self.layout.new_staging_dir();
        fs::create_dir_all(&staging)?;
        let (digest, manifest) = self.transport.fetch(reference, &staging).map_err(|e| {
            let _ = fs::remove_dir_all(&staging);
            e
        })?;

        if let Some(existing_digest) = &existing {
            if !update {
                let _ = fs::remove_dir_all(&staging);
                return Err(StorageError::AlreadyInstalled { reference: reference.as_str().to_string() });
            }
            if existing_digest == &digest {
                let _ = fs::remove_dir_all(&staging);
                return Ok(ImageStatus { reference: reference.clone(), digest, manifest });
            }
        }

        if !staging.join(MANIFEST_REL_PATH).is_file() {
            let _ = fs::remove_dir_all(&staging);
            return Err(StorageError::MalformedDriver {
                reference: reference.as_str().to_string(),
                reason: format!("missing {MANIFEST_REL_PATH}"),
            });
        }

        let ref_dir = self.layout.ref_dir(reference);
        fs::create_dir_all(&ref_dir)?;
        let rootfs_dir = self.layout.rootfs_dir(reference, &digest.0);
        fs::rename(&staging, &rootfs_dir)?;

        let sidecar = self.layout.sidecar_path(reference, &digest.0);
        let status = ImageStatus { reference: reference.clone(), digest: digest.clone(), manifest };
        fs::write(&sidecar, serde_json::to_vec_pretty(&status)?)?;

        if let Some(existing_digest) = existing {
            if existing_digest != digest {
                self.remove_digest(reference, &existing_digest)?;
            }
        }

        info!(digest = %digest, "driver installed");
        Ok(status)
    }

    /// Deletes rootfs and sidecar; fails with [`StorageError::DriverNotInstalled`] if absent.
    #[instrument(skip(self), fields(reference = %reference))]
    pub fn remove(&self, reference: &DriverReference) -> Result<(), StorageError> {
        let digest = self
            .current_digest(reference)?
            .ok_or_else(|| StorageError::DriverNotInstalled { reference: reference.as_str().to_string() })?;
        self.remove_digest(reference, &digest)?;
        info!("driver removed");
        Ok(())
    }

    /// Returns the single digest directory for `reference`.
    pub fn root_fs(&self, reference: &DriverReference) -> Result<PathBuf, StorageError> {
        let digests = self.digest_dirs(reference)?;
        match digests.len() {
            0 => Err(StorageError::DriverNotInstalled { reference: reference.as_str().to_string() }),
            1 => Ok(self.layout.rootfs_dir(reference, &digests[0])),
            count => Err(StorageError::DirtyDriverStorage { reference: reference.as_str().to_string(), count }),
        }
    }

    /// Walks sidecars under `images/` and returns all image statuses.
    pub fn list(&self) -> Result<Vec<ImageStatus>, StorageError> {
        let mut out = Vec::new();
        let images_dir = self.layout.images_dir();
        if !images_dir.is_dir() {
            return Ok(out);
        }
        for ref_entry in fs::read_dir(&images_dir)? {
            let ref_entry = ref_entry?;
            if !ref_entry.file_type()?.is_dir() {
                continue;
            }
            for sidecar_entry in fs::read_dir(ref_entry.path())? {
                let sidecar_entry = sidecar_entry?;
                let path = sidecar_entry.path();
                if path.extension().and_then(|e| e.to_str()) != Some("json") {
                    continue;
                }
                let bytes = fs::read(&path)?;
                match serde_json::from_slice::<ImageStatus>(&bytes) {
                    Ok(status) => out.push(status),
                    Err(err) => warn!(path = %path.display(), %err, "skipping unreadable sidecar"),
                }
            }
        }
        Ok(out)
    }

    fn current_digest(&self, reference: &DriverReference) -> Result<Option<ImageDigest>, StorageError> {
        let digests = self.digest_dirs(reference)?;
        match digests.len() {
            0 => Ok(None),
            1 => Ok(Some(ImageDigest(digests.into_iter().next().unwrap()))),
            count => Err(StorageError::DirtyDriverStorage { reference: reference.as_str().to_string(), count }),
        }
    }

    fn digest_dirs(&self, reference: &DriverReference) -> Result<Vec<String>, StorageError> {
        let ref_dir = self.layout.ref_dir(reference);
        if !ref_dir.is_dir() {
            return Ok(Vec::new());
        }
        let mut out = Vec::new();
        for entry in fs::read_dir(&ref_dir)? {
            let entry = entry?;
            if entry.file_type()?.is_dir() {
                if let Some(name) = entry.file_name().to_str() {
                    out.push(name.to_string());
                }
            }
        }
        Ok(out)
    }

    fn remove_digest(&self, reference: &DriverReference, digest: &ImageDigest) -> Result<(), StorageError> {
        let rootfs_dir = self.layout.rootfs_dir(reference, &digest.0);
        if rootfs_dir.is_dir() {
            fs::remove_dir_all(&rootfs_dir)?;
        }
        let sidecar = self.layout.sidecar_path(reference, &digest.0);
        if sidecar.is_file() {
            fs::remove_file(&sidecar)?;
        }
        Ok(())
    }

    /// Reads and parses the manifest for an already-installed reference.
    pub fn manifest(&self, reference: &DriverReference) -> Result<DriverManifest, StorageError> {
        let root = self.root_fs(reference)?;
        let bytes = fs::read(root.join(MANIFEST_REL_PATH))?;
        let text = String::from_utf8(bytes).map_err(|e| StorageError::MalformedDriver {
            reference: reference.as_str().to_string(),
            reason: e.to_string(),
        })?;
        toml::from_str(&text).map_err(|e| StorageError::MalformedDriver {
            reference: reference.as_str().to_string(),
            reason: e.to_string(),
        })
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
