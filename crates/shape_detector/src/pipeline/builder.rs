use crate::{
    algorithms::{BrightPixelClassifier, SigmoidNormalizer},
    config::{FetchConfig, ServerConfig},
    error::Result,
    io::{DirectorySnapshots, HttpImageSource, NoSnapshots},
    pipeline::Pipeline,
    traits::{ImageSource, SnapshotSink, ZoneClassifier, ZoneNormalizer},
};

/// Builder for creating analysis pipelines with a fluent API
pub struct PipelineBuilder {
    source: Option<Box<dyn ImageSource>>,
    normalizer: Option<Box<dyn ZoneNormalizer>>,
    classifier: Option<Box<dyn ZoneClassifier>>,
    snapshots: Option<Box<dyn SnapshotSink>>,
    fetch: FetchConfig,
}

impl PipelineBuilder {
    /// Create a new pipeline builder
    pub fn new() -> Self {
        Self {
            source: None,
            normalizer: None,
            classifier: None,
            snapshots: None,
            fetch: FetchConfig::default(),
        }
    }

    /// Start from server settings: fetch options and the snapshot directory
    pub fn from_config(config: &ServerConfig) -> Result<Self> {
        let builder = Self::new().with_fetch_config(config.fetch.clone());
        Ok(match &config.snapshot_dir {
            Some(dir) => builder.with_snapshots(DirectorySnapshots::new(dir)?),
            None => builder,
        })
    }

    /// Set the image source (replaces any existing one)
    pub fn with_source<S>(mut self, source: S) -> Self
    where
        S: ImageSource + 'static,
    {
        self.source = Some(Box::new(source));
        self
    }

    /// Set the zone normalizer (replaces any existing one)
    pub fn with_normalizer<N>(mut self, normalizer: N) -> Self
    where
        N: ZoneNormalizer + 'static,
    {
        self.normalizer = Some(Box::new(normalizer));
        self
    }

    /// Set the zone classifier (replaces any existing one)
    pub fn with_classifier<C>(mut self, classifier: C) -> Self
    where
        C: ZoneClassifier + 'static,
    {
        self.classifier = Some(Box::new(classifier));
        self
    }

    /// Send intermediate stage images to a diagnostic sink
    pub fn with_snapshots<S>(mut self, sink: S) -> Self
    where
        S: SnapshotSink + 'static,
    {
        self.snapshots = Some(Box::new(sink));
        self
    }

    /// Fetch options; the timeout and TLS settings only apply to the default HTTP source
    pub fn with_fetch_config(mut self, fetch: FetchConfig) -> Self {
        self.fetch = fetch;
        self
    }

    /// Build the pipeline with default components if not specified
    pub fn build(self) -> Result<Pipeline> {
        let source: Box<dyn ImageSource> = match self.source {
            Some(source) => source,
            None => Box::new(HttpImageSource::new(&self.fetch)?),
        };

        let normalizer = self.normalizer
            .unwrap_or_else(|| Box::new(SigmoidNormalizer::default()));

        let classifier = self.classifier
            .unwrap_or_else(|| Box::new(BrightPixelClassifier::default()));

        let snapshots = self.snapshots
            .unwrap_or_else(|| Box::new(NoSnapshots));

        Ok(Pipeline::new(
            source,
            normalizer,
            classifier,
            snapshots,
            self.fetch.min_payload_bytes,
        ))
    }
}

impl Default for PipelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}
