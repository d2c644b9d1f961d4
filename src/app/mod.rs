mod checkpoint;
mod player;
mod playlist;
mod recent;
mod runner;
mod sections;
mod similarity;


use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::{LevelFilter, warn};
use simple_logger::SimpleLogger;

use crate::cli::{Cli, Command};
use crate::config::{Config, LOG_LEVEL_ENV_VAR};
use crate::error::{InputKind, PlayError};
use crate::paths::{RECENT_PLAYLIST_FILE, checkpoint_file_path};

use self::checkpoint::clear_checkpoint;
use self::player::{PlayerResolver, ProcessLauncher};
use self::playlist::ArtifactPolicy;
use self::recent::{RecentOptions, RecentOutcome, run_recent};
use self::runner::{RunSummary, SectionRunOptions, run_sections};
use self::sections::split_sections;
use self::similarity::{group_similar, parse_hash_index, render_listing};

pub fn run(cli: Cli) -> Result<()> {
    setup_log(cli.log_level);
    let config = Config::load(cli.config.as_deref())?;
    let resolver = PlayerResolver::from_env(cli.player, &config);

    match cli.command {
        Command::Sections {
            listing,
            keep_playlists,
        } => run_sections_command(&listing, keep_playlists, &config, &resolver)?,
        Command::Recent { dir, playlist_out } => {
            run_recent_command(&dir, playlist_out, &config, &resolver)?
        }
        Command::Group {
            hashes,
            threshold,
            max_matches,
            output,
        } => run_group_command(&hashes, threshold, max_matches, output.as_deref(), &config)?,
    }

    Ok(())
}

fn setup_log(cli_level: LevelFilter) {
    let level = env::var(LOG_LEVEL_ENV_VAR)
        .ok()
        .and_then(|raw| raw.trim().parse::<LevelFilter>().ok())
        .unwrap_or(cli_level);

    SimpleLogger::new()
        .with_level(level)
        .init()
        .unwrap_or_else(|_| eprintln!("Warning: Logger already initialized"));
}

fn run_sections_command(
    listing: &Path,
    keep_playlists: bool,
    config: &Config,
    resolver: &PlayerResolver,
) -> Result<()> {
    if !listing.is_file() {
        return Err(PlayError::MissingInput {
            path: listing.to_path_buf(),
            kind: InputKind::Listing,
        }
        .into());
    }

    let raw = fs::read_to_string(listing)
        .with_context(|| format!("failed to read listing {}", listing.display()))?;
    let sections = split_sections(&raw, &config.separator);
    let checkpoint_path = checkpoint_file_path(listing);
    if sections.is_empty() {
        warn!("No media paths found in {}", listing.display());
        clear_checkpoint(&checkpoint_path)?;
        return Ok(());
    }

    let launcher = ProcessLauncher::new(resolver.resolve()?);
    let policy = ArtifactPolicy::keep_if(keep_playlists || config.keep_group_playlists);
    let listing_dir = std::path::absolute(listing)
        .with_context(|| format!("failed to resolve {}", listing.display()))?
        .parent()
        .map(Path::to_path_buf);
    let mut options = SectionRunOptions::new(env::temp_dir(), policy);
    options.base_dir = listing_dir;
    let summary = run_sections(&sections, &checkpoint_path, &launcher, &options)?;
    println!("{}", sections_summary_message(&summary));
    Ok(())
}

fn run_recent_command(
    dir: &Path,
    playlist_out: Option<PathBuf>,
    config: &Config,
    resolver: &PlayerResolver,
) -> Result<()> {
    let options = RecentOptions::new(
        playlist_out.unwrap_or_else(|| PathBuf::from(RECENT_PLAYLIST_FILE)),
        ArtifactPolicy::keep_if(config.keep_recent_playlist),
        config.partial_extensions.clone(),
    );
    let outcome = run_recent(dir, &options, || {
        Ok(ProcessLauncher::new(resolver.resolve()?))
    })?;
    println!("{}", recent_summary_message(&outcome, dir));
    Ok(())
}

fn run_group_command(
    hashes: &Path,
    threshold: u32,
    max_matches: usize,
    output: Option<&Path>,
    config: &Config,
) -> Result<()> {
    if !hashes.is_file() {
        return Err(PlayError::MissingInput {
            path: hashes.to_path_buf(),
            kind: InputKind::HashIndex,
        }
        .into());
    }

    let raw = fs::read_to_string(hashes)
        .with_context(|| format!("failed to read hash index {}", hashes.display()))?;
    let files = parse_hash_index(&raw)
        .with_context(|| format!("invalid hash index {}", hashes.display()))?;
    let groups = group_similar(&files, threshold, max_matches);
    let listing = render_listing(&groups, &config.separator);

    match output {
        Some(path) => {
            fs::write(path, listing)
                .with_context(|| format!("failed writing listing {}", path.display()))?;
            println!(
                "Wrote {} group(s) from {} hashed file(s) to {}.",
                groups.len(),
                files.len(),
                path.display()
            );
        }
        None => print!("{listing}"),
    }
    Ok(())
}

fn sections_summary_message(summary: &RunSummary) -> String {
    let mut message = format!(
        "Finished {} section(s): {} played",
        summary.total, summary.played
    );
    if summary.failed > 0 {
        message.push_str(&format!(", {} failed", summary.failed));
    }
    if summary.skipped > 0 {
        message.push_str(&format!(", {} empty", summary.skipped));
    }
    if summary.start_index > 0 {
        message.push_str(&format!(
            " (resumed at section {})",
            summary.start_index + 1
        ));
    }
    message.push_str(". Checkpoint cleared.");
    message
}

fn recent_summary_message(outcome: &RecentOutcome, dir: &Path) -> String {
    match outcome {
        RecentOutcome::Empty => format!("Nothing to play in {}.", dir.display()),
        RecentOutcome::Played {
            files,
            success: true,
        } => format!("Played {files} file(s) from {}.", dir.display()),
        RecentOutcome::Played {
            files,
            success: false,
        } => format!(
            "Player did not finish cleanly on {files} file(s) from {}.",
            dir.display()
        ),
    }
}
