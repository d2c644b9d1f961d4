use std::path::PathBuf;

use clap::{Parser, Subcommand};
use log::LevelFilter;

#[derive(Debug, Parser)]
#[command(
    name = "playseq",
    version,
    about = "Play media listings through mpv, resuming where the last run stopped"
)]
pub struct Cli {
    /// Log level
    #[arg(long, value_name = "LEVEL", global = true, default_value_t = LevelFilter::Info)]
    pub log_level: LevelFilter,

    /// Player executable, tried before any other lookup
    #[arg(long, value_name = "PATH", global = true)]
    pub player: Option<PathBuf>,

    /// Settings file (defaults to <config dir>/playseq/config.json)
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Play each `---` separated block of a listing as its own playlist
    Sections {
        /// Text file with one media path per line
        listing: PathBuf,

        /// Leave the per-block playlist files in the temp directory
        #[arg(long)]
        keep_playlists: bool,
    },
    /// Play every file of a directory as one playlist, newest first
    Recent {
        /// Directory to scan (not recursive)
        dir: PathBuf,

        /// Where to write the playlist file
        #[arg(long, value_name = "PATH")]
        playlist_out: Option<PathBuf>,
    },    /// Group near-duplicate videos from a hash index into a `---` separated listing
    Group {
        /// JSON object mapping each video path to a record with a hex `hash`
        hashes: PathBuf,

        /// Files whose hashes differ in fewer bits than this are grouped
        #[arg(short, long, default_value_t = 5)]
        threshold: u32,

        /// Most neighbours listed under one reference file
        #[arg(long, default_value_t = 10)]
        max_matches: usize,

        /// Write the listing here instead of stdout
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
}
