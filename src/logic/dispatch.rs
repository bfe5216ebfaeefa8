// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Delivery of exported cards: native share with a download fallback.

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::logic::export::{ExportAction, ExportArtifact, ExportError, SharePayload};

/// Result of offering an artifact to the platform share capability.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShareOutcome {
    Succeeded,
    /// The user dismissed the share sheet.
    Cancelled,
    /// No share capability, or it refused the payload.
    Unsupported,
}

/// Platform share capability. Queried on every call, never cached.
pub trait ShareTarget: Send + Sync {
    fn try_share(&self, artifact: &ExportArtifact, payload: &SharePayload) -> ShareOutcome;
}

/// Share target for platforms without a native share sheet.
pub struct NoNativeShare;

impl ShareTarget for NoNativeShare {
    fn try_share(&self, _artifact: &ExportArtifact, _payload: &SharePayload) -> ShareOutcome {
        ShareOutcome::Unsupported
    }
}

/// Direct file download.
pub trait Downloader: Send + Sync {
    /// Persist the artifact and return where it landed.
    fn save(&self, artifact: &ExportArtifact) -> Result<PathBuf>;
}

/// Writes artifacts into a folder, never overwriting an existing file.
pub struct FolderDownloader {
    dir: PathBuf,
}

impl FolderDownloader {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// The user's download folder, or the working directory when there is none.
    pub fn user_downloads() -> Self {
        let dir = dirs::download_dir()
            .or_else(|| std::env::current_dir().ok())
            .unwrap_or_else(|| PathBuf::from("."));
        Self::new(dir)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl Downloader for FolderDownloader {
    fn save(&self, artifact: &ExportArtifact) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create download folder {:?}", self.dir))?;
        for path in candidate_paths(&self.dir, &artifact.file_name) {
            let mut file = match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(file) => file,
                Err(err) if err.kind() == ErrorKind::AlreadyExists => continue,
                Err(err) => {
                    return Err(err).with_context(|| format!("Failed to create image {:?}", path));
                }
            };
            file.write_all(&artifact.png)
                .with_context(|| format!("Failed to write image {:?}", path))?;
            return Ok(path);
        }
        anyhow::bail!("No free file name for {:?} in {:?}", artifact.file_name, self.dir)
    }
}

const MAX_SUFFIX: u32 = 10_000;

/// `name`, `name (1)`, `name (2)`, … inside `dir`.
fn candidate_paths<'a>(dir: &'a Path, file_name: &'a str) -> impl Iterator<Item = PathBuf> + 'a {
    let (stem, ext) = match file_name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => (stem, Some(ext)),
        _ => (file_name, None),
    };
    std::iter::once(dir.join(file_name)).chain((1..=MAX_SUFFIX).map(move |n| match ext {
        Some(ext) => dir.join(format!("{stem} ({n}).{ext}")),
        None => dir.join(format!("{stem} ({n})")),
    }))
}

/// How an export was delivered.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DispatchOutcome {
    Shared,
    Downloaded(PathBuf),
    /// Share sheet dismissed; not an error.
    Cancelled,
}

/// Dispatch stage: share when asked and available, otherwise download.
pub fn dispatch(
    action: ExportAction,
    artifact: &ExportArtifact,
    payload: &SharePayload,
    share: &dyn ShareTarget,
    downloader: &dyn Downloader,
) -> Result<DispatchOutcome, ExportError> {
    if action == ExportAction::Share {
        match share.try_share(artifact, payload) {
            ShareOutcome::Succeeded => return Ok(DispatchOutcome::Shared),
            ShareOutcome::Cancelled => return Ok(DispatchOutcome::Cancelled),
            ShareOutcome::Unsupported => {
                log::debug!("Native share unavailable, falling back to download");
            }
        }
    }

    downloader
        .save(artifact)
        .map(DispatchOutcome::Downloaded)
        .map_err(|err| ExportError::Download(format!("{err:#}")))
}
