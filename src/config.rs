use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::Deserialize;

use crate::paths::config_file_path;

pub const DEFAULT_SEPARATOR: &str = "---";
pub const PLAYER_ENV_VAR: &str = "PLAYSEQ_PLAYER";
pub const LOG_LEVEL_ENV_VAR: &str = "PLAYSEQ_LOG";

/// Optional settings read from `config.json`. Every field may be omitted.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Extra player locations tried after the built-in lookup.
    pub player_candidates: Vec<PathBuf>,
    /// Extensions (without the dot) of unfinished downloads.
    pub partial_extensions: Vec<String>,
    pub keep_group_playlists: bool,
    pub keep_recent_playlist: bool,
    pub separator: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            player_candidates: Vec::new(),
            partial_extensions: vec!["part".to_string()],
            keep_group_playlists: false,
            keep_recent_playlist: true,
            separator: DEFAULT_SEPARATOR.to_string(),
        }
    }
}

impl Config {
    /// An explicit path must exist; the default location is optional.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => match config_file_path() {
                Ok(path) if path.exists() => path,
                _ => return Ok(Self::default()),
            },
        };

        let raw = fs::read_to_string(&path)
            .with_context(|| format!("failed to read config at {}", path.display()))?;
        Self::from_json(&raw).with_context(|| format!("invalid config at {}", path.display()))
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(raw)?;
        if config.separator.trim().is_empty() {
            bail!("separator must not be empty");
        }
        Ok(config)
    }
}
