use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the full image -> video -> composition pipeline
    Generate {
        /// Prompt for the image generation job (overrides config)
        #[arg(long)]
        image_prompt: Option<String>,

        /// Prompt for the video generation job (overrides config)
        #[arg(long)]
        video_prompt: Option<String>,

        /// Working directory for intermediate assets (defaults to cwd)
        #[arg(short, long)]
        work_dir: Option<PathBuf>,
    },

    /// Generate images only and print their URLs
    Images {
        /// Generation prompt
        #[arg(short, long)]
        prompt: String,
    },

    /// Animate existing image URLs into a video and print its URL
    Animate {
        /// Generation prompt
        #[arg(short, long)]
        prompt: String,

        /// Keyframe image URLs, in order
        #[arg(short, long, num_args = 1..)]
        images: Vec<String>,
    },

    /// Download a remote asset to a local path
    Fetch {
        /// Asset URL
        #[arg(short, long)]
        url: String,

        /// Local destination path
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Burn captions and mux a voice-over into a video file
    Compose {
        /// Input video file
        #[arg(short, long)]
        video: PathBuf,

        /// Captions file (SRT)
        #[arg(short, long)]
        captions: PathBuf,

        /// Voice-over audio file
        #[arg(long)]
        voiceover: PathBuf,

        /// Output video file
        #[arg(short, long)]
        output: PathBuf,
    },
}
