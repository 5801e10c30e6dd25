use async_trait::async_trait;
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::Client;
use std::path::Path;
use tokio::fs;
use tracing::info;

use crate::error::{Result, ReverieError};

/// Downloads remote assets to the local filesystem.
#[async_trait]
pub trait AssetFetcher: Send + Sync {
    /// Fetch a URL into memory.
    async fn fetch(&self, url: &str) -> Result<Vec<u8>>;

    /// Fetch a URL and write it to `path`, overwriting any existing file.
    async fn download(&self, url: &str, path: &Path) -> Result<()>;
}

/// Write fetched bytes to a file, creating or overwriting it.
pub async fn write_to_path(bytes: &[u8], path: &Path) -> Result<()> {
    fs::write(path, bytes).await?;
    Ok(())
}

pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AssetFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            return Err(ReverieError::Download(format!(
                "{} returned HTTP {}",
                url,
                response.status()
            )));
        }

        let content_length = response.content_length().unwrap_or(0);
        let pb = ProgressBar::new(content_length);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {bytes}/{total_bytes}")
                .unwrap()
                .progress_chars("#>-"),
        );

        let bytes = response.bytes().await?;
        pb.set_position(bytes.len() as u64);
        pb.finish_and_clear();

        Ok(bytes.to_vec())
    }

    async fn download(&self, url: &str, path: &Path) -> Result<()> {
        info!("Downloading {} to {}", url, path.display());

        let bytes = self.fetch(url).await?;
        write_to_path(&bytes, path).await?;

        info!("File saved to: {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn written_bytes_read_back_identical() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("asset.png");
        let payload: Vec<u8> = (0u16..512).map(|b| (b % 251) as u8).collect();

        write_to_path(&payload, &path).await.unwrap();

        let read_back = fs::read(&path).await.unwrap();
        assert_eq!(read_back, payload);
    }

    #[tokio::test]
    async fn writing_twice_overwrites_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("asset.bin");

        write_to_path(b"first", &path).await.unwrap();
        write_to_path(b"second", &path).await.unwrap();

        let read_back = fs::read(&path).await.unwrap();
        assert_eq!(read_back, b"second");
    }
}
