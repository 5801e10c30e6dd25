use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use crate::error::{Result, ReverieError};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub image: ImageApiConfig,
    pub video: VideoApiConfig,
    pub prompts: PromptConfig,
    pub output: OutputConfig,
    pub media: MediaConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageApiConfig {
    /// Base URL of the Leonardo generation API
    pub endpoint: String,
    /// Model identifier to generate with
    pub model_id: String,
    /// Output image width in pixels
    pub width: u32,
    /// Output image height in pixels
    pub height: u32,
    /// Seconds between status polls
    pub poll_interval_secs: u64,
    /// Maximum number of status polls before giving up
    pub max_poll_attempts: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoApiConfig {
    /// Base URL of the Luma Dream Machine API
    pub endpoint: String,
    /// Output aspect ratio, e.g. "16:9"
    pub aspect_ratio: String,
    /// Whether the generated video should loop
    pub loop_video: bool,
    /// Seconds between status polls
    pub poll_interval_secs: u64,
    /// Maximum number of status polls before giving up
    pub max_poll_attempts: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptConfig {
    /// Prompt for the image generation job
    pub image: String,
    /// Prompt for the video generation job
    pub video: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Filename for the downloaded base video
    pub video_file_name: String,
    /// Filename for the composed video before relocation
    pub composed_file_name: String,
    /// Filename of the relocated final video
    pub final_file_name: String,
    /// Directory the final video is moved to; defaults to $HOME/Desktop
    pub final_dir: Option<PathBuf>,
    /// Captions file expected in the working directory
    pub captions_file_name: String,
    /// Voice-over audio file expected in the working directory
    pub voiceover_file_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaConfig {
    /// Path to ffmpeg binary
    pub binary_path: String,
    /// Additional encoding options appended to the composition command
    /// Common options: ["-preset", "medium", "-crf", "23", "-pix_fmt", "yuv420p"]
    pub encode_options: Vec<String>,
}

/// API credentials, resolved once at startup from the environment rather
/// than read ambiently by the clients.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub leonardo_api_key: String,
    pub luma_api_key: String,
}

impl Credentials {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            leonardo_api_key: leonardo_api_key_from_env()?,
            luma_api_key: luma_api_key_from_env()?,
        })
    }
}

pub fn leonardo_api_key_from_env() -> Result<String> {
    require_env("LEONARDO_API_KEY")
}

pub fn luma_api_key_from_env() -> Result<String> {
    require_env("LUMA_API_KEY")
}

fn require_env(name: &str) -> Result<String> {
    std::env::var(name)
        .map_err(|_| ReverieError::Config(format!("environment variable {} is not set", name)))
}

impl Default for Config {
    fn default() -> Self {
        Self {
            image: ImageApiConfig {
                endpoint: "https://cloud.leonardo.ai/api/rest/v1".to_string(),
                model_id: "1e60896f-3c26-4296-8ecc-53e2afecc132".to_string(),
                width: 512,
                height: 512,
                poll_interval_secs: 10,
                max_poll_attempts: 50,
            },
            video: VideoApiConfig {
                endpoint: "https://api.lumalabs.ai/dream-machine/v1".to_string(),
                aspect_ratio: "16:9".to_string(),
                loop_video: false,
                poll_interval_secs: 3,
                max_poll_attempts: 200,
            },
            prompts: PromptConfig {
                image: "A sequence of four detailed storyboard scenes of a vendor \
                        arranging fruit at a bustling market stall"
                    .to_string(),
                video: "A short video following a vendor arranging fruit at a lively \
                        market stall, flowing naturally between the storyboard moments"
                    .to_string(),
            },
            output: OutputConfig {
                video_file_name: "generated_video.mp4".to_string(),
                composed_file_name: "generated_video_with_captions_and_voiceover.mp4"
                    .to_string(),
                final_file_name: "final_video.mp4".to_string(),
                final_dir: None,
                captions_file_name: "captions.srt".to_string(),
                voiceover_file_name: "voiceover.mp3".to_string(),
            },
            media: MediaConfig {
                binary_path: "ffmpeg".to_string(),
                encode_options: vec![],
            },
        }
    }
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ReverieError::Config(format!("Failed to read config file: {}", e)))?;

        toml::from_str(&content)
            .map_err(|e| ReverieError::Config(format!("Failed to parse config file: {}", e)))
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ReverieError::Config(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)
            .map_err(|e| ReverieError::Config(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_round_trips_through_toml() {
        let config = Config::default();
        let serialized = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&serialized).unwrap();
        assert_eq!(parsed.image.max_poll_attempts, 50);
        assert_eq!(parsed.video.poll_interval_secs, 3);
        assert_eq!(parsed.output.captions_file_name, "captions.srt");
    }
}
