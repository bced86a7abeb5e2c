use thiserror::Error;

use crate::types::PipelineStage;

#[derive(Error, Debug)]
pub enum DetectorError {
    #[error("Failed to fetch image from {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Image size is {size} bytes, expected at least {minimum}")]
    Size { size: usize, minimum: usize },

    #[error("Failed to decode image: {0}")]
    Decode(#[source] image::ImageError),

    #[error("Failed to encode image: {0}")]
    Encode(#[source] image::ImageError),

    #[error("Pipeline must be {expected} for this step, but is {actual}")]
    StageOrder {
        expected: PipelineStage,
        actual: PipelineStage,
    },

    #[error("HTTP client setup failed: {0}")]
    Client(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl DetectorError {
    pub fn fetch(url: impl Into<String>, source: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Fetch {
            url: url.into(),
            source: source.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, DetectorError>;
