//! Command-line argument model for the `vision-relay` binary.

use clap::{Parser, Subcommand};

/// Analyze images and videos with a vision model
#[derive(Parser, Debug)]
#[command(name = "vision-relay", version, about = "Vision analysis relay")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Analyze an image
    Image(AnalyzeArgs),
    /// Analyze a video
    Video(AnalyzeArgs),
    /// Describe a source without analyzing it
    Inspect(InspectArgs),
    /// Print the tool definitions as JSON
    Tools,
}

/// Arguments shared by `image` and `video`.
#[derive(Parser, Debug)]
pub struct AnalyzeArgs {
    /// Local file path or http(s) URL
    pub source: String,

    /// What to look for or describe
    pub prompt: String,
}

/// Arguments for `vision-relay inspect`.
#[derive(Parser, Debug)]
pub struct InspectArgs {
    /// Local file path or http(s) URL
    pub source: String,

    /// Treat the source as a video when resolving its MIME type
    #[arg(long)]
    pub video: bool,
}

impl Cli {
    /// Parse CLI arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
