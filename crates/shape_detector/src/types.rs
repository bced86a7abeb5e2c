use std::collections::HashMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{Display, IntoStaticStr};

/// Zone name to detection outcome
pub type Detections = HashMap<String, bool>;

/// A named rectangular region with its own bright-pixel threshold
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Zone {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
    pub name: String,
    /// Bright-pixel count that must be exceeded for a detection
    pub threshold: i64,
}

/// A zone rectangle after canonicalization and clipping to an image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClippedRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl ClippedRect {
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn area(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }
}

impl Zone {
    pub fn new(x1: i32, y1: i32, x2: i32, y2: i32, name: impl Into<String>, threshold: i64) -> Self {
        Self {
            x1,
            y1,
            x2,
            y2,
            name: name.into(),
            threshold,
        }
    }

    /// Build a zone from `[x1, y1, x2, y2]` coordinates
    pub fn from_coords(coords: [i32; 4], name: impl Into<String>, threshold: i64) -> Self {
        let [x1, y1, x2, y2] = coords;
        Self::new(x1, y1, x2, y2, name, threshold)
    }

    /// Corners are swapped when reversed, then the rectangle is intersected
    /// with a `width`×`height` image. No overlap yields an empty rect.
    pub fn clip_to(&self, width: u32, height: u32) -> ClippedRect {
        let (min_x, max_x) = (i64::from(self.x1.min(self.x2)), i64::from(self.x1.max(self.x2)));
        let (min_y, max_y) = (i64::from(self.y1.min(self.y2)), i64::from(self.y1.max(self.y2)));

        let left = min_x.clamp(0, i64::from(width));
        let right = max_x.clamp(0, i64::from(width));
        let top = min_y.clamp(0, i64::from(height));
        let bottom = max_y.clamp(0, i64::from(height));

        if left >= right || top >= bottom {
            return ClippedRect::default();
        }

        ClippedRect {
            x: left as u32,
            y: top as u32,
            width: (right - left) as u32,
            height: (bottom - top) as u32,
        }
    }

    /// Whether a bright-pixel count trips this zone
    pub fn is_exceeded_by(&self, count: u64) -> bool {
        i128::from(count) > i128::from(self.threshold)
    }
}

/// Lifecycle of a single pipeline run
#[derive(
    Debug, Clone, Copy,
    Serialize, Deserialize,
    Display, IntoStaticStr,
    PartialEq, Eq, PartialOrd, Ord
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PipelineStage {
    Empty,
    Downloaded,
    Adjusted,
    Masked,
    Analyzed,
}

/// Outcome of a full download → analyze run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Analysis {
    pub detections: Detections,
    /// `data:image/jpeg;base64,...` preview of the masked image
    pub preview: Option<String>,
}
