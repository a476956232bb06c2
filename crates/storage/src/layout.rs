// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Path layout under the storage root (spec §4.1, §6 "Filesystem layout").
//!
//! ```text
//! <root>/images/<ref-hash>/<digest>/        extracted rootfs
//! <root>/images/<ref-hash>/<digest>.json    image-config sidecar
//! <root>/containers/...                     container runtime state (owned by drv-adapters)
//! <root>/tmp/...                            atomic-install staging directories
//! ```

use drv_core::DriverReference;
use sha2::{Digest as _, Sha256};
use std::path::{Path, PathBuf};

/// Fixed path, relative to a rootfs, where a driver's manifest lives.
pub const MANIFEST_REL_PATH: &str = "etc/driver-manifest.toml";

#[derive(Debug, Clone)]
pub struct Layout {
    root: PathBuf,
}

impl Layout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn images_dir(&self) -> PathBuf {
        self.root.join("images")
    }

    pub fn containers_dir(&self) -> PathBuf {
        self.root.join("containers")
    }

    pub fn tmp_dir(&self) -> PathBuf {
        self.root.join("tmp")
    }

    /// Stable hash of a reference's origin URI, used as the per-image directory name.
    pub fn ref_hash(reference: &DriverReference) -> String {
        let mut hasher = Sha256::new();
        hasher.update(reference.as_str().as_bytes());
        let digest = hasher.finalize();
        hex::encode(&digest[..16])
    }

    pub fn ref_dir(&self, reference: &DriverReference) -> PathBuf {
        self.images_dir().join(Self::ref_hash(reference))
    }

    pub fn rootfs_dir(&self, reference: &DriverReference, digest: &str) -> PathBuf {
        self.ref_dir(reference).join(digest)
    }

    pub fn sidecar_path(&self, reference: &DriverReference, digest: &str) -> PathBuf {
        self.ref_dir(reference).join(format!("{digest}.json"))
    }

    /// A fresh, unique staging directory under `tmp/` for one install call.
    pub fn new_staging_dir(&self) -> PathBuf {
        self.tmp_dir().join(nanoid::nanoid!(21))
    }
}

// A tiny local hex encoder keeps the dependency list matching the teacher's
// (sha2 without also pulling in the `hex` crate, which nothing else here needs).
mod hex {
    pub fn encode(bytes: &[u8]) -> String {
        let mut s = String::with_capacity(bytes.len() * 2);
        for b in bytes {
            s.push_str(&format!("{b:02x}"));
        }
        s
    }
}

#[cfg(test)]
#[path = "layout_tests.rs"]
mod tests;
