use std::env;
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use std::process::{Command as ProcessCommand, Stdio};

use anyhow::Result;
use log::debug;

use crate::config::Config;
use crate::error::PlayError;

pub(crate) const DEFAULT_PLAYER_NAME: &str = "mpv";

#[cfg(windows)]
pub(crate) const FALLBACK_PLAYER_PATH: &str = r"d:\mpv\mpv.exe";
#[cfg(not(windows))]
pub(crate) const FALLBACK_PLAYER_PATH: &str = "/usr/bin/mpv";

pub(crate) fn section_flags() -> Vec<String> {
    vec![
        "--fullscreen".to_string(),
        "--script-opts-append=osc-visibility=always".to_string(),
    ]
}

pub(crate) fn recent_flags() -> Vec<String> {
    vec![
        "--fullscreen".to_string(),
        "--force-window".to_string(),
        "--idle".to_string(),
    ]
}

#[derive(Debug, Clone)]
pub(crate) struct LaunchOutcome {
    pub(crate) success: bool,
    pub(crate) failure_detail: Option<String>,
}

pub(crate) trait PlayerLauncher {
    /// Runs the player on `playlist` and blocks until it exits.
    fn launch(&self, playlist: &Path, flags: &[String]) -> Result<LaunchOutcome>;
}

impl<T: PlayerLauncher + ?Sized> PlayerLauncher for &T {
    fn launch(&self, playlist: &Path, flags: &[String]) -> Result<LaunchOutcome> {
        (**self).launch(playlist, flags)
    }
}

#[derive(Debug, Clone)]
pub(crate) struct ProcessLauncher {
    program: PathBuf,
}

impl ProcessLauncher {
    pub(crate) fn new(program: PathBuf) -> Self {
        Self { program }
    }
}

impl PlayerLauncher for ProcessLauncher {
    fn launch(&self, playlist: &Path, flags: &[String]) -> Result<LaunchOutcome> {
        let mut playlist_arg = OsString::from("--playlist=");
        playlist_arg.push(playlist.as_os_str());

        debug!("Launching {} on {}", self.program.display(), playlist.display());
        let status = ProcessCommand::new(&self.program)
            .arg(playlist_arg)
            .args(flags)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .map_err(|source| PlayError::PlayerLaunch {
                player: self.program.clone(),
                source,
            })?;

        Ok(LaunchOutcome {
            success: status.success(),
            failure_detail: (!status.success()).then(|| format!("exited with status: {status}")),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum PlayerCandidate {
    /// A path given by the user. A bare name is looked up on `PATH`.
    Explicit(PathBuf),
    OnPath(String),
    Fixed(PathBuf),
}

impl PlayerCandidate {
    fn resolve(&self, search_path: Option<&OsStr>) -> Option<PathBuf> {
        match self {
            Self::Explicit(path) => {
                if path.is_file() {
                    Some(path.clone())
                } else if path.components().count() == 1 {
                    find_on_path(path.as_os_str(), search_path)
                } else {
                    None
                }
            }
            Self::OnPath(name) => find_on_path(OsStr::new(name), search_path),
            Self::Fixed(path) => path.is_file().then(|| path.clone()),
        }
    }

    fn describe(&self) -> String {
        match self {
            Self::Explicit(path) | Self::Fixed(path) => path.display().to_string(),
            Self::OnPath(name) => format!("{name} on PATH"),
        }
    }
}

fn find_on_path(name: &OsStr, search_path: Option<&OsStr>) -> Option<PathBuf> {
    let search_path = search_path?;
    for dir in env::split_paths(search_path) {
        let candidate = dir.join(name);
        if candidate.is_file() {
            return Some(candidate);
        }
        if cfg!(windows) && candidate.extension().is_none() {
            let exe = candidate.with_extension("exe");
            if exe.is_file() {
                return Some(exe);
            }
        }
    }
    None
}

/// Ordered player lookup; the first candidate that resolves wins.
#[derive(Debug, Clone)]
pub(crate) struct PlayerResolver {
    candidates: Vec<PlayerCandidate>,
    search_path: Option<OsString>,
}

impl PlayerResolver {
    pub(crate) fn new(candidates: Vec<PlayerCandidate>, search_path: Option<OsString>) -> Self {
        Self {
            candidates,
            search_path,
        }
    }

    pub(crate) fn from_env(cli_player: Option<PathBuf>, config: &Config) -> Self {
        Self::from_sources(
            cli_player,
            env::var_os(crate::config::PLAYER_ENV_VAR),
            config,
            env::var_os("PATH"),
        )
    }

    pub(crate) fn from_sources(
        cli_player: Option<PathBuf>,
        env_player: Option<OsString>,
        config: &Config,
        search_path: Option<OsString>,
    ) -> Self {
        let mut candidates = Vec::new();
        if let Some(path) = cli_player {
            candidates.push(PlayerCandidate::Explicit(path));
        }
        match env_player {
            Some(value) if !value.is_empty() => {
                candidates.push(PlayerCandidate::Explicit(PathBuf::from(value)));
            }
            _ => {}
        }
        candidates.push(PlayerCandidate::OnPath(DEFAULT_PLAYER_NAME.to_string()));
        candidates.push(PlayerCandidate::Fixed(PathBuf::from(FALLBACK_PLAYER_PATH)));
        candidates.extend(
            config
                .player_candidates
                .iter()
                .cloned()
                .map(PlayerCandidate::Fixed),
        );
        Self::new(candidates, search_path)
    }

    #[cfg(test)]
    pub(crate) fn candidates(&self) -> &[PlayerCandidate] {
        &self.candidates
    }

    pub(crate) fn resolve(&self) -> Result<PathBuf, PlayError> {
        for candidate in &self.candidates {
            if let Some(path) = candidate.resolve(self.search_path.as_deref()) {
                debug!("Using player {}", path.display());
                return Ok(path);
            }
            debug!("Player candidate {} did not resolve", candidate.describe());
        }
        Err(PlayError::PlayerNotFound {
            tried: self.candidates.iter().map(PlayerCandidate::describe).collect(),
        })
    }
}
