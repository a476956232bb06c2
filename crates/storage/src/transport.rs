// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Narrow interface onto the (out-of-scope) image-format/transport
//! collaborator: resolving a reference means writing an extracted
//! rootfs to a destination directory and returning its digest and
//! parsed manifest. Tar/OCI layer parsing itself is not this crate's
//! concern (spec §1 "OUT OF SCOPE").

use crate::error::StorageError;
use drv_core::{DriverManifest, DriverReference, ImageDigest};
use std::path::Path;

/// Fetches a driver image and extracts it into `dest`.
pub trait ImageTransport: Send + Sync {
    /// Resolve `reference`, extract its rootfs into `dest`, and return the
    /// content digest plus the manifest found inside it.
    fn fetch(
        &self,
        reference: &DriverReference,
        dest: &Path,
    ) -> Result<(ImageDigest, DriverManifest), StorageError>;
}

#[cfg(test)]
#[path = "transport_tests.rs"]
mod tests;
