use std::cmp::Reverse;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use log::{debug, info, warn};

use super::player::{PlayerLauncher, recent_flags};
use super::playlist::{ArtifactPolicy, PlaylistArtifact};
use crate::error::{InputKind, PlayError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RecentFile {
    pub(crate) path: PathBuf,
    pub(crate) modified: SystemTime,
}

#[derive(Debug, Clone)]
pub(crate) struct RecentOptions {
    pub(crate) playlist_path: PathBuf,
    pub(crate) artifact_policy: ArtifactPolicy,
    pub(crate) partial_extensions: Vec<String>,
    pub(crate) flags: Vec<String>,
}

impl RecentOptions {
    pub(crate) fn new(
        playlist_path: PathBuf,
        artifact_policy: ArtifactPolicy,
        partial_extensions: Vec<String>,
    ) -> Self {
        Self {
            playlist_path,
            artifact_policy,
            partial_extensions,
            flags: recent_flags(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum RecentOutcome {
    Empty,
    Played { files: usize, success: bool },
}

pub(crate) fn is_partial_download(path: &Path, partial_extensions: &[String]) -> bool {
    let Some(ext) = path.extension().and_then(|ext| ext.to_str()) else {
        return false;
    };
    partial_extensions
        .iter()
        .any(|partial| partial.trim_start_matches('.').eq_ignore_ascii_case(ext))
}

/// Regular files directly inside `dir`, newest first. `exclude` (usually our
/// own playlist file) is left out even if it lives in `dir`.
pub(crate) fn collect_recent_files(
    dir: &Path,
    partial_extensions: &[String],
    exclude: Option<&Path>,
) -> Result<Vec<RecentFile>> {
    if !dir.is_dir() {
        return Err(PlayError::MissingInput {
            path: dir.to_path_buf(),
            kind: InputKind::Directory,
        }
        .into());
    }

    let excluded = exclude.and_then(|path| fs::canonicalize(path).ok());
    let mut files = Vec::new();
    let entries =
        fs::read_dir(dir).with_context(|| format!("failed to list {}", dir.display()))?;
    for entry in entries {
        let entry = entry.with_context(|| format!("failed to list {}", dir.display()))?;
        let path = entry.path();
        let meta = match entry.metadata() {
            Ok(meta) => meta,
            Err(err) => {
                warn!("Skipping {}: {err}", path.display());
                continue;
            }
        };
        if !meta.is_file() || is_partial_download(&path, partial_extensions) {
            continue;
        }
        if excluded.is_some() && fs::canonicalize(&path).ok() == excluded {
            debug!("Skipping playlist file {}", path.display());
            continue;
        }
        let modified = meta.modified().unwrap_or(SystemTime::UNIX_EPOCH);
        files.push(RecentFile { path, modified });
    }

    // Ties fall back to name order so the playlist is stable across runs.
    files.sort_by(|a, b| {
        Reverse(a.modified)
            .cmp(&Reverse(b.modified))
            .then_with(|| a.path.cmp(&b.path))
    });
    Ok(files)
}

pub(crate) fn format_modified(modified: SystemTime) -> String {
    DateTime::<Local>::from(modified)
        .format("%Y-%m-%d %H:%M:%S")
        .to_string()
}

/// `make_launcher` runs only once there is something to play.
pub(crate) fn run_recent<F, L>(
    dir: &Path,
    options: &RecentOptions,
    make_launcher: F,
) -> Result<RecentOutcome>
where
    F: FnOnce() -> Result<L>,
    L: PlayerLauncher,
{
    let files = collect_recent_files(
        dir,
        &options.partial_extensions,
        Some(&options.playlist_path),
    )?;
    let (Some(first), Some(last)) = (files.first(), files.last()) else {
        let empty = PlayError::EmptyDirectory {
            path: dir.to_path_buf(),
        };
        warn!("{empty}");
        return Ok(RecentOutcome::Empty);
    };

    let launcher = make_launcher()?;
    info!(
        "Newest: {} ({})",
        first.path.display(),
        format_modified(first.modified)
    );
    info!(
        "Oldest: {} ({})",
        last.path.display(),
        format_modified(last.modified)
    );

    let artifact = PlaylistArtifact::write_at(
        options.playlist_path.clone(),
        files.iter().map(|file| &file.path),
        options.artifact_policy,
    )?;
    info!(
        "Playing {} file(s) from {}",
        files.len(),
        artifact.path().display()
    );

    let success = match launcher.launch(artifact.path(), &options.flags) {
        Ok(outcome) => {
            if let Some(detail) = outcome.failure_detail.as_deref() {
                warn!("Player {detail}");
            }
            outcome.success
        }
        Err(err) => {
            warn!("{err:#}");
            false
        }
    };
    Ok(RecentOutcome::Played {
        files: files.len(),
        success,
    })
}
