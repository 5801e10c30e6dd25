// Remote generation clients
//
// Each provider exposes the same job shape: submit a generation request,
// then poll its status endpoint until a terminal state. The concrete
// clients share the bounded polling loop in crate::job.

pub mod image;
pub mod video;

use async_trait::async_trait;

pub use image::ImageClient;
pub use video::VideoClient;

use crate::config::{ImageApiConfig, VideoApiConfig};
use crate::error::Result;

/// Image generation: one prompt in, an ordered list of image URLs out.
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<Vec<String>>;
}

/// Video generation anchored on previously generated keyframe images.
#[async_trait]
pub trait VideoGenerator: Send + Sync {
    async fn generate(&self, prompt: &str, keyframe_urls: &[String]) -> Result<String>;
}

/// Factory for creating generator instances
pub struct GeneratorFactory;

impl GeneratorFactory {
    pub fn create_image_generator(
        config: ImageApiConfig,
        api_key: String,
    ) -> Box<dyn ImageGenerator> {
        Box::new(ImageClient::new(config, api_key))
    }

    pub fn create_video_generator(
        config: VideoApiConfig,
        api_key: String,
    ) -> Box<dyn VideoGenerator> {
        Box::new(VideoClient::new(config, api_key))
    }
}
