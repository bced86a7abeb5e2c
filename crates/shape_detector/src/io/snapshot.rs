use std::path::{Path, PathBuf};

use image::DynamicImage;
use uuid::Uuid;

use crate::{
    error::Result,
    io::preview::encode_jpeg,
    traits::SnapshotSink,
    types::PipelineStage,
};

/// Discards every snapshot
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSnapshots;

impl SnapshotSink for NoSnapshots {
    fn record(&self, _run_id: Uuid, _stage: PipelineStage, _image: &DynamicImage) -> Result<()> {
        Ok(())
    }
}

/// Writes `<dir>/<run-id>-<stage>.jpeg` for each recorded stage
#[derive(Debug, Clone)]
pub struct DirectorySnapshots {
    dir: PathBuf,
}

impl DirectorySnapshots {
    /// Use `dir` for snapshots, creating it if needed
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, run_id: Uuid, stage: PipelineStage) -> PathBuf {
        self.dir.join(format!("{run_id}-{stage}.jpeg"))
    }
}

impl SnapshotSink for DirectorySnapshots {
    fn record(&self, run_id: Uuid, stage: PipelineStage, image: &DynamicImage) -> Result<()> {
        let path = self.path_for(run_id, stage);
        std::fs::write(&path, encode_jpeg(image)?)?;
        tracing::debug!(path = %path.display(), "Snapshot saved");
        Ok(())
    }
}
