use std::ffi::OsStr;
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result, anyhow};
use log::debug;

/// What happens to a playlist file once the player is done with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ArtifactPolicy {
    Delete,
    Keep,
}

impl ArtifactPolicy {
    pub(crate) fn keep_if(keep: bool) -> Self {
        if keep { Self::Keep } else { Self::Delete }
    }
}

static SEQUENCE: AtomicU32 = AtomicU32::new(0);

/// A written playlist file. Under `ArtifactPolicy::Delete` the file is removed on drop.
#[derive(Debug)]
pub(crate) struct PlaylistArtifact {
    path: PathBuf,
    policy: ArtifactPolicy,
}

impl PlaylistArtifact {
    pub(crate) fn write_temp<I, S>(dir: &Path, entries: I, policy: ArtifactPolicy) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let body = render_playlist(entries);
        for _ in 0..8 {
            let path = dir.join(unique_name());
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(mut file) => {
                    // Guard first so a failed write still cleans up.
                    let artifact = Self { path, policy };
                    file.write_all(&body).with_context(|| {
                        format!("failed writing playlist {}", artifact.path.display())
                    })?;
                    debug!("Wrote playlist {}", artifact.path.display());
                    return Ok(artifact);
                }
                Err(err) if err.kind() == ErrorKind::AlreadyExists => continue,
                Err(err) => {
                    return Err(err)
                        .with_context(|| format!("failed creating playlist {}", path.display()));
                }
            }
        }
        Err(anyhow!(
            "could not find a free playlist name in {}",
            dir.display()
        ))
    }

    pub(crate) fn write_at<I, S>(path: PathBuf, entries: I, policy: ArtifactPolicy) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        fs::write(&path, render_playlist(entries))
            .with_context(|| format!("failed writing playlist {}", path.display()))?;
        debug!("Wrote playlist {}", path.display());
        Ok(Self { path, policy })
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for PlaylistArtifact {
    fn drop(&mut self) {
        if self.policy == ArtifactPolicy::Delete {
            let _ = fs::remove_file(&self.path);
        }
    }
}

/// One entry per line, written as the raw OS bytes so non-UTF-8 names survive.
pub(crate) fn render_playlist<I, S>(entries: I) -> Vec<u8>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let mut out = Vec::new();
    for entry in entries {
        out.extend_from_slice(entry.as_ref().as_encoded_bytes());
        out.push(b'\n');
    }
    out
}

fn unique_name() -> String {
    let ts = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0);
    let seq = SEQUENCE.fetch_add(1, Ordering::Relaxed);
    format!("playseq-{}-{ts}-{seq}.txt", std::process::id())
}
