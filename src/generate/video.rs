use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{debug, info};

use crate::config::VideoApiConfig;
use crate::error::{Result, ReverieError};
use crate::job::{JobState, PollPolicy, poll_until_complete};
use super::VideoGenerator;

/// Luma Dream Machine API client.
pub struct VideoClient {
    client: Client,
    config: VideoApiConfig,
    api_key: String,
}

#[derive(Debug, Deserialize)]
struct SubmitResponse {
    id: String,
}

#[derive(Debug, Deserialize)]
struct StatusResponse {
    state: String,
    #[serde(default)]
    failure_reason: Option<String>,
    #[serde(default)]
    assets: Option<VideoAssets>,
}

#[derive(Debug, Deserialize)]
struct VideoAssets {
    video: Option<String>,
}

/// Build the keyframe map for a video submission: one entry per image URL,
/// labelled frame0..frameN-1 in input order.
pub fn build_keyframes(image_urls: &[String]) -> Value {
    let mut frames = serde_json::Map::new();
    for (index, url) in image_urls.iter().enumerate() {
        frames.insert(
            format!("frame{}", index),
            json!({
                "type": "image",
                "url": url,
            }),
        );
    }
    Value::Object(frames)
}

impl VideoClient {
    pub fn new(config: VideoApiConfig, api_key: String) -> Self {
        Self {
            client: Client::new(),
            config,
            api_key,
        }
    }

    /// Submit a video generation job and return its identifier.
    pub async fn submit(&self, prompt: &str, keyframes: Value) -> Result<String> {
        let url = format!("{}/generations", self.config.endpoint);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&json!({
                "prompt": prompt,
                "keyframes": keyframes,
                "aspect_ratio": self.config.aspect_ratio,
                "loop": self.config.loop_video,
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ReverieError::Provider {
                stage: "video".to_string(),
                reason: format!("submission rejected with HTTP {}: {}", status, body),
            });
        }

        let submitted: SubmitResponse = response.json().await?;
        info!("Submitted video generation job: {}", submitted.id);

        Ok(submitted.id)
    }

    /// Fetch the current state of a submitted job.
    pub async fn poll(&self, job_id: &str) -> Result<JobState> {
        let url = format!("{}/generations/{}", self.config.endpoint, job_id);

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.api_key)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ReverieError::Provider {
                stage: "video".to_string(),
                reason: format!("status poll rejected with HTTP {}: {}", status, body),
            });
        }

        let status: StatusResponse = response.json().await?;
        debug!("Video generation state: {}", status.state);

        Ok(interpret_status(status))
    }

    fn poll_policy(&self) -> PollPolicy {
        PollPolicy::new(self.config.poll_interval_secs, self.config.max_poll_attempts)
    }
}

fn interpret_status(status: StatusResponse) -> JobState {
    match status.state.as_str() {
        "completed" => match status.assets.and_then(|assets| assets.video) {
            Some(video_url) => JobState::Complete {
                assets: vec![video_url],
            },
            None => JobState::Failed {
                reason: "job completed without a video asset".to_string(),
            },
        },
        "failed" => JobState::Failed {
            reason: status
                .failure_reason
                .unwrap_or_else(|| "no failure reason reported".to_string()),
        },
        _ => JobState::Pending,
    }
}

#[async_trait]
impl VideoGenerator for VideoClient {
    async fn generate(&self, prompt: &str, keyframe_urls: &[String]) -> Result<String> {
        info!(
            "Generating video from {} keyframe image(s)",
            keyframe_urls.len()
        );

        let keyframes = build_keyframes(keyframe_urls);
        let job_id = self.submit(prompt, keyframes).await?;

        let assets =
            poll_until_complete("video", self.poll_policy(), || self.poll(&job_id)).await?;
        // interpret_status puts exactly one URL in a Complete state
        assets
            .into_iter()
            .next()
            .ok_or_else(|| ReverieError::Provider {
                stage: "video".to_string(),
                reason: "terminal state carried no assets".to_string(),
            })
    }
}
