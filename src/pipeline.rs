use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::info;

use crate::config::{Config, Credentials};
use crate::error::{Result, ReverieError};
use crate::fetch::{AssetFetcher, HttpFetcher};
use crate::generate::{GeneratorFactory, ImageGenerator, VideoGenerator};
use crate::media::{MediaComposerFactory, MediaComposerTrait};

/// The linear generation pipeline: images, video, composition, relocation.
///
/// Each stage feeds the next and the first unrecovered error ends the run.
/// No rollback is attempted; assets downloaded before a failure stay on disk.
pub struct Pipeline {
    config: Config,
    images: Box<dyn ImageGenerator>,
    videos: Box<dyn VideoGenerator>,
    fetcher: Box<dyn AssetFetcher>,
    media: Box<dyn MediaComposerTrait>,
}

impl Pipeline {
    pub fn new(config: Config, credentials: Credentials) -> Result<Self> {
        let images = GeneratorFactory::create_image_generator(
            config.image.clone(),
            credentials.leonardo_api_key,
        );
        let videos = GeneratorFactory::create_video_generator(
            config.video.clone(),
            credentials.luma_api_key,
        );
        let fetcher: Box<dyn AssetFetcher> = Box::new(HttpFetcher::new());
        let media = MediaComposerFactory::create_composer(config.media.clone());

        // Check dependencies
        media.check_availability()?;

        Ok(Self {
            config,
            images,
            videos,
            fetcher,
            media,
        })
    }

    /// Construct a pipeline from explicit collaborators.
    pub fn with_collaborators(
        config: Config,
        images: Box<dyn ImageGenerator>,
        videos: Box<dyn VideoGenerator>,
        fetcher: Box<dyn AssetFetcher>,
        media: Box<dyn MediaComposerTrait>,
    ) -> Self {
        Self {
            config,
            images,
            videos,
            fetcher,
            media,
        }
    }

    /// Run the full pipeline in `work_dir` and return the final video path.
    ///
    /// The captions and voice-over files are expected to already exist in
    /// `work_dir` under their configured names.
    pub async fn run(&self, work_dir: &Path) -> Result<PathBuf> {
        info!("Starting image generation");
        let image_urls = self.images.generate(&self.config.prompts.image).await?;
        info!("Image generation produced {} asset(s)", image_urls.len());

        for (index, url) in image_urls.iter().enumerate() {
            let image_path = work_dir.join(format!("image_{}.png", index + 1));
            self.fetcher.download(url, &image_path).await?;
        }

        info!("Starting video generation");
        let video_url = self
            .videos
            .generate(&self.config.prompts.video, &image_urls)
            .await?;

        let video_path = work_dir.join(&self.config.output.video_file_name);
        self.fetcher.download(&video_url, &video_path).await?;

        let captions_path = work_dir.join(&self.config.output.captions_file_name);
        let voiceover_path = work_dir.join(&self.config.output.voiceover_file_name);
        for input in [&captions_path, &voiceover_path] {
            if !input.exists() {
                return Err(ReverieError::FileNotFound(input.display().to_string()));
            }
        }

        let composed_path = work_dir.join(&self.config.output.composed_file_name);
        self.media
            .compose(&video_path, &captions_path, &voiceover_path, &composed_path)
            .await?;

        let final_dir = self.final_output_dir()?;
        fs::create_dir_all(&final_dir).await?;
        let final_path = final_dir.join(&self.config.output.final_file_name);
        fs::rename(&composed_path, &final_path).await?;

        info!("Generation process completed: {}", final_path.display());
        Ok(final_path)
    }

    fn final_output_dir(&self) -> Result<PathBuf> {
        match &self.config.output.final_dir {
            Some(dir) => Ok(dir.clone()),
            None => std::env::var_os("HOME")
                .map(|home| PathBuf::from(home).join("Desktop"))
                .ok_or_else(|| {
                    ReverieError::Config(
                        "cannot resolve final output directory: HOME is not set".to_string(),
                    )
                }),
        }
    }
}
