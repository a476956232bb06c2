// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Production [`ImageTransport`](crate::ImageTransport) that shells out to
//! the `docker` CLI. This is the one place the out-of-scope image-format
//! collaborator (spec §1) is actually reached: everything past "run these
//! three docker subcommands and untar the result" is docker's problem, not
//! ours.

use crate::error::StorageError;
use crate::layout::MANIFEST_REL_PATH;
use drv_core::{DriverManifest, DriverReference, ImageDigest};
use std::path::Path;
use std::process::{Command, Stdio};

/// Fetches driver images via the local `docker` binary: `pull` (skipped for
/// the `docker-daemon:` transport, which names an image already present),
/// `create`, `export | tar -x`, then `rm` the scratch container.
pub struct DockerTransport {
    docker_bin: String,
    tar_bin: String,
}

impl DockerTransport {
    pub fn new() -> Self {
        Self { docker_bin: "docker".to_string(), tar_bin: "tar".to_string() }
    }

    /// Overrides the `docker`/`tar` binaries to invoke, for environments
    /// where they are not on `PATH` under their usual names.
    pub fn with_binaries(docker_bin: impl Into<String>, tar_bin: impl Into<String>) -> Self {
        Self { docker_bin: docker_bin.into(), tar_bin: tar_bin.into() }
    }

    fn run(&self, reference: &DriverReference, args: &[&str]) -> Result<String, StorageError> {
        let output = Command::new(&self.docker_bin).args(args).output().map_err(|err| {
            StorageError::Transport { reference: reference.as_str().to_string(), reason: err.to_string() }
        })?;
        if !output.status.success() {
            return Err(StorageError::Transport {
                reference: reference.as_str().to_string(),
                reason: format!(
                    "`docker {}` failed: {}",
                    args.join(" "),
                    String::from_utf8_lossy(&output.stderr).trim()
                ),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    fn image_name(reference: &DriverReference) -> (&str, bool) {
        let raw = reference.as_str();
        if let Some(image) = raw.strip_prefix("docker://") {
            (image, true)
        } else if let Some(image) = raw.strip_prefix("docker-daemon:") {
            (image, false)
        } else {
            (raw, true)
        }
    }
}

impl Default for DockerTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl crate::ImageTransport for DockerTransport {
    fn fetch(
        &self,
        reference: &DriverReference,
        dest: &Path,
    ) -> Result<(ImageDigest, DriverManifest), StorageError> {
        let (image, needs_pull) = Self::image_name(reference);

        if needs_pull {
            self.run(reference, &["pull", image])?;
        }

        let digest = self.run(reference, &["inspect", "--format", "{{.Id}}", image])?;
        let container_id = self.run(reference, &["create", image])?;

        std::fs::create_dir_all(dest)?;
        let extract_result = self.export_and_extract(reference, &container_id, dest);
        let _ = self.run(reference, &["rm", "-f", &container_id]);
        extract_result?;

        let manifest_path = dest.join(MANIFEST_REL_PATH);
        let raw = std::fs::read_to_string(&manifest_path).map_err(|err| {
            if err.kind() == std::io::ErrorKind::NotFound {
                StorageError::MalformedDriver {
                    reference: reference.as_str().to_string(),
                    reason: format!("no manifest at {}", manifest_path.display()),
                }
            } else {
                StorageError::Io(err)
            }
        })?;
        let manifest: DriverManifest = toml::from_str(&raw).map_err(|err| StorageError::MalformedDriver {
            reference: reference.as_str().to_string(),
            reason: err.to_string(),
        })?;

        Ok((ImageDigest(digest), manifest))
    }
}

impl DockerTransport {
    fn export_and_extract(
        &self,
        reference: &DriverReference,
        container_id: &str,
        dest: &Path,
    ) -> Result<(), StorageError> {
        let mut export = Command::new(&self.docker_bin)
            .args(["export", container_id])
            .stdout(Stdio::piped())
            .spawn()
            .map_err(|err| StorageError::Transport {
                reference: reference.as_str().to_string(),
                reason: err.to_string(),
            })?;
        let export_stdout = export.stdout.take().ok_or_else(|| StorageError::Transport {
            reference: reference.as_str().to_string(),
            reason: "docker export produced no stdout pipe".to_string(),
        })?;

        let tar_status = Command::new(&self.tar_bin)
            .args(["-x", "-C"])
            .arg(dest)
            .stdin(Stdio::from(export_stdout))
            .status()
            .map_err(|err| StorageError::Transport {
                reference: reference.as_str().to_string(),
                reason: err.to_string(),
            })?;

        let export_status = export.wait().map_err(|err| StorageError::Transport {
            reference: reference.as_str().to_string(),
            reason: err.to_string(),
        })?;

        if !export_status.success() {
            return Err(StorageError::Transport {
                reference: reference.as_str().to_string(),
                reason: "docker export failed".to_string(),
            });
        }
        if !tar_status.success() {
            return Err(StorageError::Transport {
                reference: reference.as_str().to_string(),
                reason: "tar extraction failed".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "docker_transport_tests.rs"]
mod tests;
