use image::RgbaImage;

use crate::{
    algorithms::{brightness::pixel_brightness, compose::crop_zone},
    traits::ZoneClassifier,
    types::{Detections, Zone},
};

/// Counts pixels brighter than a fixed cutoff
#[derive(Debug, Clone)]
pub struct BrightPixelClassifier {
    /// Brightness a pixel must strictly exceed to count
    pub cutoff: f64,
}

impl Default for BrightPixelClassifier {
    fn default() -> Self {
        Self { cutoff: 0.5 }
    }
}

impl ZoneClassifier for BrightPixelClassifier {
    fn count_bright(&self, crop: &RgbaImage) -> u64 {
        crop.pixels()
            .filter(|p| pixel_brightness(**p) > self.cutoff)
            .count() as u64
    }
}

/// Re-crop every zone from the masked image and compare its count to the threshold
pub fn classify_zones(
    masked: &RgbaImage,
    zones: &[Zone],
    classifier: &dyn ZoneClassifier,
) -> Detections {
    let mut detections = Detections::with_capacity(zones.len());

    for zone in zones {
        let crop = crop_zone(masked, zone);
        let count = classifier.count_bright(&crop);
        let detected = zone.is_exceeded_by(count);
        tracing::debug!(zone = %zone.name, count, threshold = zone.threshold, detected, "Zone analyzed");
        detections.insert(zone.name.clone(), detected);
    }

    detections
}
