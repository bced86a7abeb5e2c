pub mod builder;

use std::borrow::Cow;

use image::{DynamicImage, RgbaImage};
use uuid::Uuid;

use crate::{
    algorithms::{classify_zones, grayscale, mask_zones},
    error::{DetectorError, Result},
    io::to_data_uri,
    traits::{ImageSource, SnapshotSink, ZoneClassifier, ZoneNormalizer},
    types::{Analysis, Detections, PipelineStage, Zone},
};

/// Shared, stateless configuration for zone analysis.
///
/// One `Pipeline` serves any number of requests; each request gets its own
/// [`ImagePipeline`] via [`Pipeline::session`].
pub struct Pipeline {
    source: Box<dyn ImageSource>,
    normalizer: Box<dyn ZoneNormalizer>,
    classifier: Box<dyn ZoneClassifier>,
    snapshots: Box<dyn SnapshotSink>,
    min_payload_bytes: usize,
}

impl Pipeline {
    /// Create a new pipeline builder
    pub fn builder() -> builder::PipelineBuilder {
        builder::PipelineBuilder::new()
    }

    /// Create a new pipeline with the given components
    pub fn new(
        source: Box<dyn ImageSource>,
        normalizer: Box<dyn ZoneNormalizer>,
        classifier: Box<dyn ZoneClassifier>,
        snapshots: Box<dyn SnapshotSink>,
        min_payload_bytes: usize,
    ) -> Self {
        Self {
            source,
            normalizer,
            classifier,
            snapshots,
            min_payload_bytes,
        }
    }

    /// Start a fresh run for one image location and its zones
    pub fn session(&self, url: impl Into<String>, zones: Vec<Zone>) -> ImagePipeline<'_> {
        ImagePipeline {
            pipeline: self,
            run_id: Uuid::new_v4(),
            url: url.into(),
            zones,
            stage: PipelineStage::Empty,
            image: None,
        }
    }

    /// Download, adjust, mask and analyze in one go.
    ///
    /// The first failing stage aborts the run; no partial detections are
    /// returned.
    pub async fn analyze(&self, url: impl Into<String>, zones: Vec<Zone>) -> Result<Analysis> {
        let mut run = self.session(url, zones);
        run.download().await?;
        run.adjust()?;
        run.mask()?;
        let detections = run.analyze()?;
        let preview = run.preview()?;
        Ok(Analysis { detections, preview })
    }

    pub fn min_payload_bytes(&self) -> usize {
        self.min_payload_bytes
    }
}

/// A single pass over one image: `Empty → Downloaded → Adjusted → Masked → Analyzed`.
///
/// Each step only runs from the stage before it and returns
/// [`DetectorError::StageOrder`] otherwise.
pub struct ImagePipeline<'a> {
    pipeline: &'a Pipeline,
    run_id: Uuid,
    url: String,
    zones: Vec<Zone>,
    stage: PipelineStage,
    image: Option<DynamicImage>,
}

impl<'a> ImagePipeline<'a> {
    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn zones(&self) -> &[Zone] {
        &self.zones
    }

    pub fn stage(&self) -> PipelineStage {
        self.stage
    }

    /// The working image as left by the last completed stage
    pub fn image(&self) -> Option<&DynamicImage> {
        self.image.as_ref()
    }

    /// Fetch and decode the source image
    pub async fn download(&mut self) -> Result<()> {
        self.expect_stage(PipelineStage::Empty)?;

        let bytes = self.pipeline.source.fetch(&self.url).await?;
        let size = bytes.len();
        tracing::debug!(bytes = size, "Image data read");
        if size < self.pipeline.min_payload_bytes {
            return Err(DetectorError::Size {
                size,
                minimum: self.pipeline.min_payload_bytes,
            });
        }

        let image = image::load_from_memory(&bytes).map_err(DetectorError::Decode)?;
        tracing::info!(width = image.width(), height = image.height(), "Image extracted");

        self.advance(PipelineStage::Downloaded, image);
        Ok(())
    }

    /// Replace the working image with its grayscale version
    pub fn adjust(&mut self) -> Result<()> {
        let source = self.working(PipelineStage::Downloaded)?;
        let adjusted = grayscale(source);

        self.advance(PipelineStage::Adjusted, DynamicImage::ImageRgba8(adjusted));
        Ok(())
    }

    /// Normalize each zone and black out everything else
    pub fn mask(&mut self) -> Result<()> {
        let masked = {
            let adjusted = self.working_rgba(PipelineStage::Adjusted)?;
            mask_zones(&adjusted, &self.zones, self.pipeline.normalizer.as_ref())?
        };
        tracing::info!(zones = self.zones.len(), "Image masked");

        self.advance(PipelineStage::Masked, DynamicImage::ImageRgba8(masked));
        Ok(())
    }

    /// Classify every zone of the masked image
    pub fn analyze(&mut self) -> Result<Detections> {
        let detections = {
            let masked = self.working_rgba(PipelineStage::Masked)?;
            classify_zones(&masked, &self.zones, self.pipeline.classifier.as_ref())
        };

        self.stage = PipelineStage::Analyzed;
        Ok(detections)
    }

    /// Data-URI JPEG of the current working image, `None` before download
    pub fn preview(&self) -> Result<Option<String>> {
        self.image.as_ref().map(to_data_uri).transpose()
    }

    fn expect_stage(&self, expected: PipelineStage) -> Result<()> {
        if self.stage != expected {
            return Err(DetectorError::StageOrder {
                expected,
                actual: self.stage,
            });
        }
        Ok(())
    }

    fn working(&self, expected: PipelineStage) -> Result<&DynamicImage> {
        self.expect_stage(expected)?;
        self.image.as_ref().ok_or(DetectorError::StageOrder {
            expected,
            actual: PipelineStage::Empty,
        })
    }

    fn working_rgba(&self, expected: PipelineStage) -> Result<Cow<'_, RgbaImage>> {
        let image = self.working(expected)?;
        Ok(match image.as_rgba8() {
            Some(rgba) => Cow::Borrowed(rgba),
            None => Cow::Owned(image.to_rgba8()),
        })
    }

    fn advance(&mut self, stage: PipelineStage, image: DynamicImage) {
        if let Err(e) = self.pipeline.snapshots.record(self.run_id, stage, &image) {
            tracing::warn!(run_id = %self.run_id, %stage, "Failed to save snapshot: {}", e);
        }
        self.stage = stage;
        self.image = Some(image);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::DATA_URI_PREFIX;
    use async_trait::async_trait;
    use image::{GenericImageView, ImageFormat, Rgba};
    use std::io::Cursor;
    use std::sync::{Arc, Mutex};

    struct StaticSource(Vec<u8>);

    #[async_trait]
    impl ImageSource for StaticSource {
        async fn fetch(&self, _location: &str) -> Result<Vec<u8>> {
            Ok(self.0.clone())
        }
    }

    struct UnreachableSource;

    #[async_trait]
    impl ImageSource for UnreachableSource {
        async fn fetch(&self, location: &str) -> Result<Vec<u8>> {
            Err(DetectorError::fetch(location, "connection refused"))
        }
    }

    #[derive(Clone, Default)]
    struct RecordingSink(Arc<Mutex<Vec<PipelineStage>>>);

    impl SnapshotSink for RecordingSink {
        fn record(&self, _run_id: Uuid, stage: PipelineStage, _image: &DynamicImage) -> Result<()> {
            self.0.lock().unwrap().push(stage);
            Ok(())
        }
    }

    struct BrokenSink;

    impl SnapshotSink for BrokenSink {
        fn record(&self, _run_id: Uuid, _stage: PipelineStage, _image: &DynamicImage) -> Result<()> {
            Err(std::io::Error::other("disk full").into())
        }
    }

    fn png_bytes(image: &DynamicImage) -> Vec<u8> {
        let mut buffer = Cursor::new(Vec::new());
        image.write_to(&mut buffer, ImageFormat::Png).unwrap();
        buffer.into_inner()
    }

    fn white_png(width: u32, height: u32) -> Vec<u8> {
        png_bytes(&DynamicImage::ImageRgba8(RgbaImage::from_pixel(
            width,
            height,
            Rgba([255, 255, 255, 255]),
        )))
    }

    fn pipeline_with(bytes: Vec<u8>) -> Pipeline {
        Pipeline::builder()
            .with_source(StaticSource(bytes))
            .build()
            .unwrap()
    }

    fn scenario_zones() -> Vec<Zone> {
        vec![
            Zone::new(0, 0, 50, 50, "left", 10),
            Zone::new(50, 0, 100, 50, "right", 5000),
        ]
    }

    #[tokio::test]
    async fn test_white_image_scenario() {
        let pipeline = pipeline_with(white_png(100, 100));

        let analysis = pipeline.analyze("http://camera/snapshot.jpg", scenario_zones()).await.unwrap();

        assert_eq!(analysis.detections.len(), 2);
        assert!(analysis.detections["left"]);
        assert!(!analysis.detections["right"]);
        assert!(analysis.preview.unwrap().starts_with(DATA_URI_PREFIX));
    }

    #[tokio::test]
    async fn test_stages_in_order() {
        let sink = RecordingSink::default();
        let pipeline = Pipeline::builder()
            .with_source(StaticSource(white_png(100, 100)))
            .with_snapshots(sink.clone())
            .build()
            .unwrap();

        let mut run = pipeline.session("cam", scenario_zones());
        assert_eq!(run.stage(), PipelineStage::Empty);
        assert!(run.preview().unwrap().is_none());

        run.download().await.unwrap();
        assert_eq!(run.stage(), PipelineStage::Downloaded);
        run.adjust().unwrap();
        assert_eq!(run.stage(), PipelineStage::Adjusted);
        run.mask().unwrap();
        assert_eq!(run.stage(), PipelineStage::Masked);

        // Only the zone rows are lit; the bottom half is outside every zone
        let masked = run.image().unwrap().to_rgba8();
        assert_eq!(masked.get_pixel(10, 10), &Rgba([255, 255, 255, 255]));
        assert_eq!(masked.get_pixel(10, 90), &Rgba([0, 0, 0, 255]));

        run.analyze().unwrap();
        assert_eq!(run.stage(), PipelineStage::Analyzed);

        assert_eq!(
            *sink.0.lock().unwrap(),
            vec![PipelineStage::Downloaded, PipelineStage::Adjusted, PipelineStage::Masked]
        );
    }

    #[tokio::test]
    async fn test_out_of_order_steps_fail() {
        let pipeline = pipeline_with(white_png(10, 10));
        let mut run = pipeline.session("cam", vec![]);

        let err = run.mask().unwrap_err();
        assert!(matches!(
            err,
            DetectorError::StageOrder { expected: PipelineStage::Adjusted, actual: PipelineStage::Empty }
        ));

        run.download().await.unwrap();
        let err = run.download().await.unwrap_err();
        assert!(matches!(
            err,
            DetectorError::StageOrder { expected: PipelineStage::Empty, actual: PipelineStage::Downloaded }
        ));
        assert!(matches!(run.analyze(), Err(DetectorError::StageOrder { .. })));
    }

    #[tokio::test]
    async fn test_small_payload_is_size_error() {
        let pipeline = pipeline_with(vec![0xFF; 50]);
        let mut run = pipeline.session("cam", scenario_zones());

        let err = run.download().await.unwrap_err();
        assert!(matches!(err, DetectorError::Size { size: 50, minimum: 100 }));
        assert_eq!(run.stage(), PipelineStage::Empty);
        assert!(run.image().is_none());
    }

    #[tokio::test]
    async fn test_non_image_payload_is_decode_error() {
        let pipeline = pipeline_with(b"<html>camera offline</html>".repeat(10));

        let err = pipeline.analyze("cam", scenario_zones()).await.unwrap_err();
        assert!(matches!(err, DetectorError::Decode(_)));
    }

    #[tokio::test]
    async fn test_fetch_error_propagates() {
        let pipeline = Pipeline::builder()
            .with_source(UnreachableSource)
            .build()
            .unwrap();

        let err = pipeline.analyze("http://camera", scenario_zones()).await.unwrap_err();
        assert!(matches!(err, DetectorError::Fetch { ref url, .. } if url == "http://camera"));
    }

    #[tokio::test]
    async fn test_snapshot_failure_does_not_abort() {
        let pipeline = Pipeline::builder()
            .with_source(StaticSource(white_png(100, 100)))
            .with_snapshots(BrokenSink)
            .build()
            .unwrap();

        let analysis = pipeline.analyze("cam", scenario_zones()).await.unwrap();
        assert!(analysis.detections["left"]);
    }

    #[tokio::test]
    async fn test_threshold_at_zone_area_never_detects() {
        let pipeline = pipeline_with(white_png(40, 40));
        let zones = vec![
            Zone::new(0, 0, 20, 20, "full", 400),
            Zone::new(20, 20, 40, 40, "one_less", 399),
            Zone::new(5, 5, 5, 30, "flat", -1),
            Zone::new(5, 5, 5, 30, "flat_zero", 0),
        ];

        let analysis = pipeline.analyze("cam", zones).await.unwrap();
        assert!(!analysis.detections["full"]);
        assert!(analysis.detections["one_less"]);
        assert!(analysis.detections["flat"]);
        assert!(!analysis.detections["flat_zero"]);
    }

    #[tokio::test]
    async fn test_preview_matches_source_dimensions() {
        let pipeline = pipeline_with(white_png(64, 48));
        let analysis = pipeline.analyze("cam", scenario_zones()).await.unwrap();

        use base64::Engine;
        let preview = analysis.preview.unwrap();
        let payload = preview.strip_prefix(DATA_URI_PREFIX).unwrap();
        let bytes = base64::engine::general_purpose::STANDARD.decode(payload).unwrap();
        assert_eq!(image::load_from_memory(&bytes).unwrap().dimensions(), (64, 48));
    }
}
