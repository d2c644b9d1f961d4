use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    Listing,
    Directory,
    HashIndex,
}

impl fmt::Display for InputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Listing => f.write_str("listing file"),
            Self::Directory => f.write_str("directory"),
            Self::HashIndex => f.write_str("hash index"),
        }
    }
}

/// Failure kinds callers match on. Everything else travels as `anyhow::Error`.
#[derive(Debug, Error)]
pub enum PlayError {
    #[error("{kind} not found: {}", .path.display())]
    MissingInput { path: PathBuf, kind: InputKind },

    #[error("unreadable checkpoint {}: {reason}", .path.display())]
    CorruptCheckpoint { path: PathBuf, reason: String },

    #[error("checkpoint points at section {index} but the listing only has {total}")]
    CheckpointOutOfRange { index: usize, total: usize },

    #[error("failed to launch {}", .player.display())]
    PlayerLaunch {
        player: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("player not found (tried: {})", .tried.join(", "))]
    PlayerNotFound { tried: Vec<String> },

    #[error("no playable files in {}", .path.display())]
    EmptyDirectory { path: PathBuf },
}
