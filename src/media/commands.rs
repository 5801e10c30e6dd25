use std::path::Path;
use tokio::process::Command;
use tracing::debug;

use crate::error::{Result, ReverieError};

/// Abstract ffmpeg command representation
#[derive(Debug, Clone)]
pub struct MediaCommand {
    pub binary_path: String,
    pub args: Vec<String>,
    pub description: String,
}

impl MediaCommand {
    pub fn new<S1: Into<String>, S2: Into<String>>(binary_path: S1, description: S2) -> Self {
        Self {
            binary_path: binary_path.into(),
            args: Vec::new(),
            description: description.into(),
        }
    }

    /// Add an argument
    pub fn arg<S: Into<String>>(mut self, arg: S) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Add multiple arguments
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(|s| s.into()));
        self
    }

    /// Add input file
    pub fn input<P: AsRef<Path>>(self, path: P) -> Self {
        self.arg("-i").arg(path.as_ref().to_string_lossy().to_string())
    }

    /// Add output file
    pub fn output<P: AsRef<Path>>(self, path: P) -> Self {
        self.arg(path.as_ref().to_string_lossy().to_string())
    }

    /// Force overwrite output
    pub fn overwrite(self) -> Self {
        self.arg("-y")
    }

    /// Set video codec
    pub fn video_codec<S: Into<String>>(self, codec: S) -> Self {
        self.arg("-c:v").arg(codec)
    }

    /// Set audio codec
    pub fn audio_codec<S: Into<String>>(self, codec: S) -> Self {
        self.arg("-c:a").arg(codec)
    }

    /// Add video filter
    pub fn video_filter<S: Into<String>>(self, filter: S) -> Self {
        self.arg("-vf").arg(filter)
    }

    /// Execute the command; non-zero exit surfaces stderr as a composition error
    pub async fn execute(&self) -> Result<()> {
        debug!("Executing ffmpeg command: {} {:?}", self.binary_path, self.args);
        debug!("Description: {}", self.description);

        let output = Command::new(&self.binary_path)
            .args(&self.args)
            .output()
            .await
            .map_err(|e| ReverieError::Composition(format!("Failed to execute ffmpeg: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ReverieError::Composition(format!(
                "{} failed: {}",
                self.description, stderr
            )));
        }

        Ok(())
    }
}

/// Builder for the ffmpeg invocations the pipeline needs
pub struct MediaCommandBuilder {
    binary_path: String,
}

impl MediaCommandBuilder {
    pub fn new<S: Into<String>>(binary_path: S) -> Self {
        Self {
            binary_path: binary_path.into(),
        }
    }

    /// Build the caption burn-in + voice-over mux command
    pub fn compose<P: AsRef<Path>>(
        &self,
        video_path: P,
        captions_path: P,
        voiceover_path: P,
        output_path: P,
        additional_options: &[String],
    ) -> MediaCommand {
        let mut cmd = MediaCommand::new(&self.binary_path, "Caption and voice-over composition")
            .overwrite()
            .input(&video_path)
            .input(&voiceover_path)
            .video_filter(format!("subtitles={}", captions_path.as_ref().display()))
            .video_codec("libx264")
            .audio_codec("aac")
            .arg("-strict")
            .arg("experimental");

        for option in additional_options {
            cmd = cmd.arg(option);
        }

        cmd.output(output_path)
    }

    /// Build version check command
    pub fn version_check(&self) -> MediaCommand {
        MediaCommand::new(&self.binary_path, "Version check").arg("-version")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compose_command_assembles_the_expected_arguments() {
        let builder = MediaCommandBuilder::new("ffmpeg");
        let cmd = builder.compose(
            "in.mp4",
            "captions.srt",
            "voiceover.mp3",
            "out.mp4",
            &[],
        );

        assert_eq!(
            cmd.args,
            vec![
                "-y",
                "-i",
                "in.mp4",
                "-i",
                "voiceover.mp3",
                "-vf",
                "subtitles=captions.srt",
                "-c:v",
                "libx264",
                "-c:a",
                "aac",
                "-strict",
                "experimental",
                "out.mp4",
            ]
        );
    }

    #[test]
    fn extra_encode_options_come_before_the_output_path() {
        let builder = MediaCommandBuilder::new("ffmpeg");
        let options = vec!["-crf".to_string(), "23".to_string()];
        let cmd = builder.compose("in.mp4", "c.srt", "v.mp3", "out.mp4", &options);

        let crf = cmd.args.iter().position(|a| a == "-crf").unwrap();
        let out = cmd.args.iter().position(|a| a == "out.mp4").unwrap();
        assert!(crf < out);
        assert_eq!(out, cmd.args.len() - 1);
    }
}
