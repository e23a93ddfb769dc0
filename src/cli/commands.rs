use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// `smilegen` - random illustrations that learn what makes you smile.
#[derive(Parser, Debug)]
#[command(name = "smilegen")]
#[command(version)]
#[command(about = "Rate-driven random illustration service.", long_about = None)]
pub struct Cli {
    /// Config file (default: ~/.smilegen/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the web front end
    Serve {
        /// Port to listen on (use 0 for a random available port)
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind to
        #[arg(long)]
        host: Option<String>,
    },

    /// Show learned tag weights and recent ratings
    Stats {
        /// Number of recent ratings to list
        #[arg(long, default_value = "10")]
        recent: usize,
    },

    /// Draw one scene and compose it locally, without the server
    Draw {
        /// Output PNG file
        #[arg(short, long, default_value = "smile.png")]
        out: PathBuf,
    },

    /// Show resolved configuration
    Status,
}
