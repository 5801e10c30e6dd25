// Media composition via an external ffmpeg process
//
// - Commands: abstract command building and execution
// - Composer: the concrete ffmpeg-backed implementation

pub mod commands;
pub mod composer;

use async_trait::async_trait;
use std::path::Path;

pub use commands::*;
pub use composer::*;

use crate::config::MediaConfig;
use crate::error::Result;

/// Main trait for the composition step
#[async_trait]
pub trait MediaComposerTrait: Send + Sync {
    /// Burn captions into a video and mux in a voice-over track.
    ///
    /// On success the output file exists at `output_path`; on failure no
    /// guarantee is made about partial output.
    async fn compose(
        &self,
        video_path: &Path,
        captions_path: &Path,
        voiceover_path: &Path,
        output_path: &Path,
    ) -> Result<()>;

    /// Check if the ffmpeg binary is available
    fn check_availability(&self) -> Result<()>;

    /// Get ffmpeg version information
    async fn version_info(&self) -> Result<String>;
}

/// Factory for creating media composer instances
pub struct MediaComposerFactory;

impl MediaComposerFactory {
    pub fn create_composer(config: MediaConfig) -> Box<dyn MediaComposerTrait> {
        Box::new(composer::MediaComposerImpl::new(config))
    }
}
