use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use anyhow::{Context, Result};
use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::error::PlayError;

/// On disk this is the number of completed sections, which is also the
/// 0-based index of the section to play next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct Checkpoint {
    #[serde(rename = "CurrentPlaylist")]
    pub(crate) next_index: usize,
}

pub(crate) fn load_checkpoint(path: &Path) -> Result<Option<Checkpoint>, PlayError> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
        Err(err) => {
            return Err(PlayError::CorruptCheckpoint {
                path: path.to_path_buf(),
                reason: err.to_string(),
            });
        }
    };

    serde_json::from_str(&raw)
        .map(Some)
        .map_err(|err| PlayError::CorruptCheckpoint {
            path: path.to_path_buf(),
            reason: err.to_string(),
        })
}

pub(crate) fn save_checkpoint(path: &Path, checkpoint: Checkpoint) -> Result<()> {
    let raw = serde_json::to_string(&checkpoint).context("failed to encode checkpoint")?;
    fs::write(path, raw)
        .with_context(|| format!("failed writing checkpoint at {}", path.display()))
}

pub(crate) fn clear_checkpoint(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
        Err(err) => {
            Err(err).with_context(|| format!("failed removing checkpoint {}", path.display()))
        }
    }
}

/// Where playback starts. Unreadable or stale checkpoints restart from the top.
pub(crate) fn resume_index(path: &Path, total: usize) -> usize {
    match load_checkpoint(path) {
        Ok(None) => 0,
        Ok(Some(checkpoint)) if checkpoint.next_index >= total => {
            let stale = PlayError::CheckpointOutOfRange {
                index: checkpoint.next_index,
                total,
            };
            info!("{stale}; starting from the first section");
            0
        }
        Ok(Some(checkpoint)) => checkpoint.next_index,
        Err(err) => {
            warn!("{err}; starting from the first section");
            0
        }
    }
}
