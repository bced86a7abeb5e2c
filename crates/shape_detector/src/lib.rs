//! # Shape Detector
//!
//! Decides, per rectangular zone of a camera snapshot, whether something
//! bright enough is present. The image is fetched, converted to grayscale,
//! each zone gets its own adaptive sigmoid contrast curve, and the lit
//! pixels of each zone are counted against that zone's threshold.
//!
//! ## Core Features
//!
//! - **Staged Pipeline**: `Empty → Downloaded → Adjusted → Masked → Analyzed`,
//!   each stage returning a regular error when something goes wrong
//! - **Pluggable Seams**: image sources, zone normalizers, zone classifiers
//!   and snapshot sinks are traits
//! - **HTTP Surface**: an axum router exposing `POST /analyze`
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use shape_detector::{Pipeline, Zone};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let pipeline = Pipeline::builder().build()?;
//!
//! let zones = vec![
//!     Zone::new(0, 0, 50, 50, "driveway", 10),
//!     Zone::new(50, 0, 100, 50, "gate", 500),
//! ];
//! let analysis = pipeline.analyze("https://camera.local/snapshot.jpg", zones).await?;
//!
//! for (zone, detected) in &analysis.detections {
//!     println!("{zone}: {detected}");
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Step by Step
//!
//! ```rust,no_run
//! use shape_detector::{Pipeline, Zone, io::DirectorySnapshots};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let pipeline = Pipeline::builder()
//!     .with_snapshots(DirectorySnapshots::new("snapshots")?)
//!     .build()?;
//!
//! let mut run = pipeline.session("https://camera.local/snapshot.jpg", vec![Zone::new(0, 0, 50, 50, "door", 25)]);
//! run.download().await?;
//! run.adjust()?;
//! run.mask()?;
//! let detections = run.analyze()?;
//! let preview = run.preview()?;
//! # Ok(())
//! # }
//! ```

// Core modules
pub mod error;
pub mod types;
pub mod traits;
pub mod algorithms;
pub mod pipeline;
pub mod io;
pub mod config;
pub mod server;

// Re-exports for convenience
pub use error::{DetectorError, Result};
pub use types::{Analysis, ClippedRect, Detections, PipelineStage, Zone};
pub use traits::*;
pub use algorithms::{BrightPixelClassifier, SigmoidNormalizer};
pub use pipeline::{ImagePipeline, Pipeline, builder::PipelineBuilder};
pub use config::{ConfigError, FetchConfig, ServerConfig};
