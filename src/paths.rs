use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

pub const RECENT_PLAYLIST_FILE: &str = "playlist.txt";

pub fn config_file_path() -> Result<PathBuf> {
    let base = dirs::config_dir().context("unable to resolve config directory")?;
    Ok(base.join("playseq").join("config.json"))
}

pub fn checkpoint_file_path(listing: &Path) -> PathBuf {
    let derived = listing.with_extension("state");
    if derived == listing {
        // Never let the checkpoint overwrite a listing that already ends in `.state`.
        let mut name = listing.as_os_str().to_owned();
        name.push(".state");
        return PathBuf::from(name);
    }
    derived
}
