use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "loopcast")]
#[command(about = "Loops a directory of videos to an RTMP live endpoint", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Stream the playlist on repeat until stopped
    Stream {
        /// Directory of videos (defaults to config)
        directory: Option<PathBuf>,

        /// Stream key; falls back to the LOOPCAST_STREAM_KEY environment variable
        #[arg(long)]
        key: Option<String>,

        /// Rescale output for vertical (9:16) playback
        #[arg(long)]
        portrait: bool,
    },

    /// List the playlist in the order the next pass would play it
    Scan {
        /// Directory to scan (defaults to config)
        directory: Option<PathBuf>,
    },

    /// Show encoder commands without spawning anything (stream key masked)
    DryRun {
        /// Directory to scan (defaults to config)
        directory: Option<PathBuf>,

        /// Rescale output for vertical (9:16) playback
        #[arg(long)]
        portrait: bool,
    },

    /// Check if the encoder binary is installed
    CheckFfmpeg,

    /// Show config status and location, or create default config if missing
    InitConfig,
}

pub fn parse() -> Cli {
    Cli::parse()
}
