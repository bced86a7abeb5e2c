use async_trait::async_trait;
use image::{DynamicImage, RgbaImage};
use uuid::Uuid;

use crate::{error::Result, types::PipelineStage};

/// Trait for anything that can produce raw image bytes for a location
#[async_trait]
pub trait ImageSource: Send + Sync {
    /// Fetch the encoded image found at `location`
    async fn fetch(&self, location: &str) -> Result<Vec<u8>>;
}

/// Trait for per-zone contrast normalization algorithms
pub trait ZoneNormalizer: Send + Sync {
    /// Normalize a zone crop; the result must keep the crop's dimensions
    fn normalize(&self, crop: &RgbaImage) -> Result<RgbaImage>;
}

/// Trait for deciding how many pixels of a masked zone crop are lit
pub trait ZoneClassifier: Send + Sync {
    /// Count the pixels of the crop that register as bright
    fn count_bright(&self, crop: &RgbaImage) -> u64;
}

/// Trait for diagnostic sinks that receive intermediate stage images
pub trait SnapshotSink: Send + Sync {
    /// Record the working image right after `stage` produced it
    fn record(&self, run_id: Uuid, stage: PipelineStage, image: &DynamicImage) -> Result<()>;
}
