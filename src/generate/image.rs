use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info};

use crate::config::ImageApiConfig;
use crate::error::{Result, ReverieError};
use crate::job::{JobState, PollPolicy, poll_until_complete};
use super::ImageGenerator;

/// Leonardo generation API client.
pub struct ImageClient {
    client: Client,
    config: ImageApiConfig,
    api_key: String,
}

#[derive(Debug, Deserialize)]
struct SubmitResponse {
    #[serde(rename = "sdGenerationJob")]
    job: SubmittedJob,
}

#[derive(Debug, Deserialize)]
struct SubmittedJob {
    #[serde(rename = "generationId")]
    generation_id: String,
}

#[derive(Debug, Deserialize)]
struct StatusResponse {
    generations_by_pk: GenerationRecord,
}

#[derive(Debug, Deserialize)]
struct GenerationRecord {
    status: String,
    #[serde(default)]
    generated_images: Vec<GeneratedImage>,
}

#[derive(Debug, Deserialize)]
struct GeneratedImage {
    url: String,
}

impl ImageClient {
    pub fn new(config: ImageApiConfig, api_key: String) -> Self {
        Self {
            client: Client::new(),
            config,
            api_key,
        }
    }

    /// Submit an image generation job and return its identifier.
    pub async fn submit(&self, prompt: &str) -> Result<String> {
        let url = format!("{}/generations", self.config.endpoint);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&json!({
                "modelId": self.config.model_id,
                "prompt": prompt,
                "width": self.config.width,
                "height": self.config.height,
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ReverieError::Provider {
                stage: "image".to_string(),
                reason: format!("submission rejected with HTTP {}: {}", status, body),
            });
        }

        let submitted: SubmitResponse = response.json().await?;
        info!("Submitted image generation job: {}", submitted.job.generation_id);

        Ok(submitted.job.generation_id)
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
                stage: "image".to_string(),
                reason: format!("status poll rejected with HTTP {}: {}", status, body),
            });
        }

        let status: StatusResponse = response.json().await?;
        let record = status.generations_by_pk;
        debug!("Image generation status: {}", record.status);

        Ok(interpret_status(record))
    }

    fn poll_policy(&self) -> PollPolicy {
        PollPolicy::new(self.config.poll_interval_secs, self.config.max_poll_attempts)
    }
}

/// COMPLETE only counts as terminal once the image list is populated; an
/// empty COMPLETE report keeps polling.
fn interpret_status(record: GenerationRecord) -> JobState {
    match record.status.as_str() {
        "COMPLETE" if !record.generated_images.is_empty() => JobState::Complete {
            assets: record
                .generated_images
                .into_iter()
                .map(|image| image.url)
                .collect(),
        },
        "FAILED" => JobState::Failed {
            reason: "provider reported FAILED".to_string(),
        },
        _ => JobState::Pending,
    }
}

#[async_trait]
impl ImageGenerator for ImageClient {
    async fn generate(&self, prompt: &str) -> Result<Vec<String>> {
        let job_id = self.submit(prompt).await?;
        poll_until_complete("image", self.poll_policy(), || self.poll(&job_id)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(status: &str, urls: &[&str]) -> GenerationRecord {
        GenerationRecord {
            status: status.to_string(),
            generated_images: urls
                .iter()
                .map(|url| GeneratedImage {
                    url: url.to_string(),
                })
                .collect(),
        }
    }

    #[test]
    fn complete_with_images_is_terminal() {
        let state = interpret_status(record("COMPLETE", &["u1", "u2"]));
        assert_eq!(
            state,
            JobState::Complete {
                assets: vec!["u1".to_string(), "u2".to_string()]
            }
        );
    }

    #[test]
    fn complete_without_images_keeps_polling() {
        assert_eq!(interpret_status(record("COMPLETE", &[])), JobState::Pending);
    }

    #[test]
    fn unknown_status_is_pending() {
        assert_eq!(interpret_status(record("PENDING", &[])), JobState::Pending);
        assert_eq!(
            interpret_status(record("IN_PROGRESS", &["u1"])),
            JobState::Pending
        );
    }

    #[test]
    fn failed_is_terminal() {
        assert!(matches!(
            interpret_status(record("FAILED", &[])),
            JobState::Failed { .. }
        ));
    }
}
