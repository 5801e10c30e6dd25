use async_trait::async_trait;
use std::path::Path;
use std::process::Command;
use tracing::{debug, info};

use crate::config::MediaConfig;
use crate::error::{Result, ReverieError};
use super::{MediaCommandBuilder, MediaComposerTrait};

/// Concrete ffmpeg-backed composer
pub struct MediaComposerImpl {
    config: MediaConfig,
    command_builder: MediaCommandBuilder,
}

impl MediaComposerImpl {
    pub fn new(config: MediaConfig) -> Self {
        let command_builder = MediaCommandBuilder::new(&config.binary_path);

        Self {
            config,
            command_builder,
        }
    }
}

#[async_trait]
impl MediaComposerTrait for MediaComposerImpl {
    async fn compose(
        &self,
        video_path: &Path,
        captions_path: &Path,
        voiceover_path: &Path,
        output_path: &Path,
    ) -> Result<()> {
        info!(
            "Composing {} with captions {} and voice-over {} -> {}",
            video_path.display(),
            captions_path.display(),
            voiceover_path.display(),
            output_path.display()
        );

        let command = self.command_builder.compose(
            video_path,
            captions_path,
            voiceover_path,
            output_path,
            &self.config.encode_options,
        );

        command.execute().await?;

        info!("Captions and voice-over added successfully");
        Ok(())
    }

    fn check_availability(&self) -> Result<()> {
        let output = Command::new(&self.config.binary_path)
            .arg("-version")
            .output()
            .map_err(|e| ReverieError::Composition(format!("ffmpeg not found: {}", e)))?;

        if output.status.success() {
            info!("ffmpeg is available");
            Ok(())
        } else {
            Err(ReverieError::Composition(
                "ffmpeg version check failed".to_string(),
            ))
        }
    }

    async fn version_info(&self) -> Result<String> {
        debug!("Getting ffmpeg version information");

        let command = self.command_builder.version_check();
        let result = tokio::process::Command::new(&command.binary_path)
            .args(&command.args)
            .output()
            .await
            .map_err(|e| ReverieError::Composition(format!("Failed to execute ffmpeg: {}", e)))?;

        if result.status.success() {
            let version_info = String::from_utf8_lossy(&result.stdout);
            let first_line = version_info.lines().next().unwrap_or("Unknown version");
            Ok(first_line.to_string())
        } else {
            let stderr = String::from_utf8_lossy(&result.stderr);
            Err(ReverieError::Composition(format!(
                "ffmpeg version check failed: {}",
                stderr
            )))
        }
    }
}
