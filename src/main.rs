//! Reverie - Automated Generative Video Pipeline
//!
//! This is the main entry point for the Reverie application, which generates
//! a set of images with Leonardo AI, animates them into a video with Luma AI,
//! and burns in captions and a voice-over track using ffmpeg.

use anyhow::Result;
use clap::Parser;
use tracing::{Level, error, info};
use tracing_appender::{non_blocking, rolling};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use reverie::cli::{Args, Commands};
use reverie::config::{Config, Credentials, leonardo_api_key_from_env, luma_api_key_from_env};
use reverie::fetch::{AssetFetcher, HttpFetcher};
use reverie::generate::{GeneratorFactory, ImageGenerator, VideoGenerator};
use reverie::media::{MediaComposerFactory, MediaComposerTrait};
use reverie::pipeline::Pipeline;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Setup logging to both console and file
    setup_logging(args.verbose)?;

    // Load configuration
    let config = match &args.config {
        Some(config_path) => Config::from_file(config_path)?,
        None => {
            if std::path::Path::new("config.toml").exists() {
                info!("Found config.toml in current directory, loading...");
                Config::from_file("config.toml")?
            } else {
                Config::default()
            }
        }
    };

    // Run the selected command; the first unrecovered error ends the run
    if let Err(e) = run(args, config).await {
        error!("Generation process failed: {}", e);
        std::process::exit(1);
    }

    Ok(())
}

async fn run(args: Args, mut config: Config) -> reverie::error::Result<()> {
    match args.command {
        Commands::Generate {
            image_prompt,
            video_prompt,
            work_dir,
        } => {
            if let Some(prompt) = image_prompt {
                config.prompts.image = prompt;
            }
            if let Some(prompt) = video_prompt {
                config.prompts.video = prompt;
            }

            let credentials = Credentials::from_env()?;
            let pipeline = Pipeline::new(config, credentials)?;

            let work_dir = match work_dir {
                Some(dir) => dir,
                None => std::env::current_dir()?,
            };

            let final_path = pipeline.run(&work_dir).await?;
            println!("Final video: {}", final_path.display());
        }
        Commands::Images { prompt } => {
            info!("Starting image generation");
            let generator = GeneratorFactory::create_image_generator(
                config.image.clone(),
                leonardo_api_key_from_env()?,
            );

            let urls = generator.generate(&prompt).await?;
            for url in urls {
                println!("{}", url);
            }
        }
        Commands::Animate { prompt, images } => {
            info!("Starting video generation");
            let generator = GeneratorFactory::create_video_generator(
                config.video.clone(),
                luma_api_key_from_env()?,
            );

            let url = generator.generate(&prompt, &images).await?;
            println!("{}", url);
        }
        Commands::Fetch { url, output } => {
            let fetcher = HttpFetcher::new();
            fetcher.download(&url, &output).await?;
        }
        Commands::Compose {
            video,
            captions,
            voiceover,
            output,
        } => {
            info!("Composing video: {}", video.display());
            let composer = MediaComposerFactory::create_composer(config.media.clone());
            composer.check_availability()?;
            composer.compose(&video, &captions, &voiceover, &output).await?;
            println!("Composed video: {}", output.display());
        }
    }

    info!("Reverie workflow completed successfully");
    Ok(())
}

/// Setup logging to both console and file
fn setup_logging(verbose: bool) -> Result<()> {
    // Create log directory
    let reverie_dir = std::env::current_dir()?.join(".reverie");
    let log_dir = reverie_dir.join("log");
    std::fs::create_dir_all(&log_dir)?;

    // Set up file appender with daily rotation
    let file_appender = rolling::daily(&log_dir, "reverie.log");
    let (non_blocking_file, _guard) = non_blocking(file_appender);
    // Keep the guard alive for the duration of the program
    std::mem::forget(_guard);

    // Determine log level
    let log_level = if verbose { Level::DEBUG } else { Level::INFO };

    // Create console layer
    let console_layer = fmt::layer()
        .with_target(false)
        .with_file(true)
        .with_line_number(true);

    // Create file layer
    let file_layer = fmt::layer()
        .with_writer(non_blocking_file)
        .with_target(false)
        .with_file(true)
        .with_line_number(true)
        .with_ansi(false); // No ANSI colors in file

    // Setup layered subscriber
    let subscriber = tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(log_level.into()))
        .with(console_layer)
        .with(file_layer);

    subscriber
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}
