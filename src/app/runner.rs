use std::path::{Path, PathBuf};

use anyhow::{Result, bail};
use log::{debug, info, warn};

use super::checkpoint::{Checkpoint, clear_checkpoint, resume_index, save_checkpoint};
use super::player::{PlayerLauncher, section_flags};
use super::playlist::{ArtifactPolicy, PlaylistArtifact};
use super::sections::{Section, resolve_entry};

#[derive(Debug, Clone)]
pub(crate) struct SectionRunOptions {
    pub(crate) temp_dir: PathBuf,
    pub(crate) artifact_policy: ArtifactPolicy,
    pub(crate) flags: Vec<String>,
    /// Directory relative listing entries are resolved against. The playlist
    /// lives in `temp_dir`, and the player would otherwise resolve them there.
    pub(crate) base_dir: Option<PathBuf>,
    /// When false the first failed player run aborts and leaves the checkpoint on that section.
    pub(crate) continue_on_failure: bool,
}

impl SectionRunOptions {
    pub(crate) fn new(temp_dir: PathBuf, artifact_policy: ArtifactPolicy) -> Self {
        Self {
            temp_dir,
            artifact_policy,
            flags: section_flags(),
            base_dir: None,
            continue_on_failure: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct RunSummary {
    pub(crate) total: usize,
    pub(crate) start_index: usize,
    pub(crate) played: usize,
    pub(crate) failed: usize,
    pub(crate) skipped: usize,
}

pub(crate) fn run_sections(
    sections: &[Section],
    checkpoint_path: &Path,
    launcher: &dyn PlayerLauncher,
    options: &SectionRunOptions,
) -> Result<RunSummary> {
    let total = sections.len();
    let start_index = resume_index(checkpoint_path, total);
    if start_index > 0 {
        info!("Resuming at section {} of {total}", start_index + 1);
    }

    let mut summary = RunSummary {
        total,
        start_index,
        ..RunSummary::default()
    };

    for (index, section) in sections.iter().enumerate().skip(start_index) {
        if section.is_empty() {
            debug!("Section {} is empty, skipping", index + 1);
            summary.skipped += 1;
            continue;
        }

        let entries = section
            .paths
            .iter()
            .map(|entry| resolve_entry(options.base_dir.as_deref(), entry));
        let artifact =
            PlaylistArtifact::write_temp(&options.temp_dir, entries, options.artifact_policy)?;
        save_checkpoint(checkpoint_path, Checkpoint { next_index: index })?;

        info!(
            "Playing section {} of {total} ({} file(s))",
            index + 1,
            section.paths.len()
        );
        let failure = match launcher.launch(artifact.path(), &options.flags) {
            Ok(outcome) if outcome.success => None,
            Ok(outcome) => Some(
                outcome
                    .failure_detail
                    .unwrap_or_else(|| "player reported failure".to_string()),
            ),
            Err(err) => Some(format!("{err:#}")),
        };
        drop(artifact);

        match failure {
            None => summary.played += 1,
            Some(detail) => {
                summary.failed += 1;
                warn!("Section {} of {total} failed: {detail}", index + 1);
                if !options.continue_on_failure {
                    bail!("stopped at section {} of {total}: {detail}", index + 1);
                }
            }
        }
    }

    clear_checkpoint(checkpoint_path)?;
    Ok(summary)
}
