use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReverieError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("{stage} generation failed: {reason}")]
    Provider { stage: String, reason: String },

    #[error("job did not reach a terminal state within {attempts} polls")]
    Timeout { attempts: u32 },

    #[error("download failed: {0}")]
    Download(String),

    #[error("composition error: {0}")]
    Composition(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("file not found: {0}")]
    FileNotFound(String),
}

pub type Result<T> = std::result::Result<T, ReverieError>;
