use image::{Rgba, RgbaImage};

use crate::{
    algorithms::brightness::{brightness_values, median},
    error::Result,
    traits::ZoneNormalizer,
};

fn sigmoid(midpoint: f64, steepness: f64, x: f64) -> f64 {
    1.0 / (1.0 + (steepness * (midpoint - x)).exp())
}

fn clamp_sample(v: f64) -> u8 {
    let v = (v + 0.5) as i64;
    v.clamp(0, 255) as u8
}

/// Lookup table for a sigmoidal contrast curve.
///
/// `midpoint` is in `[0, 1]` (clamped). A positive `factor` increases
/// contrast around the midpoint, a negative one decreases it, and zero is
/// the identity.
pub fn sigmoid_lut(midpoint: f64, factor: f64) -> [u8; 256] {
    let mut lut = [0u8; 256];
    if factor == 0.0 {
        for (i, entry) in lut.iter_mut().enumerate() {
            *entry = i as u8;
        }
        return lut;
    }

    let a = midpoint.clamp(0.0, 1.0);
    let b = factor.abs();
    let sig0 = sigmoid(a, b, 0.0);
    let sig1 = sigmoid(a, b, 1.0);
    let e = 1.0e-6;

    for (i, entry) in lut.iter_mut().enumerate() {
        let x = i as f64 / 255.0;
        let f = if factor > 0.0 {
            (sigmoid(a, b, x) - sig0) / (sig1 - sig0)
        } else {
            let arg = ((sig1 - sig0) * x + sig0).clamp(e, 1.0 - e);
            a - (1.0 / arg - 1.0).ln() / b
        };
        *entry = clamp_sample(f * 255.0);
    }

    lut
}

/// Apply a sigmoid contrast curve to the color channels, leaving alpha
pub fn adjust_sigmoid(image: &RgbaImage, midpoint: f64, factor: f64) -> RgbaImage {
    let lut = sigmoid_lut(midpoint, factor);
    imageproc::map::map_colors(image, |Rgba([r, g, b, a])| {
        Rgba([lut[r as usize], lut[g as usize], lut[b as usize], a])
    })
}

/// Sigmoid contrast centered on the crop's own brightness "median"
#[derive(Debug, Clone)]
pub struct SigmoidNormalizer {
    /// Lowest midpoint the curve may use
    pub midpoint_floor: f64,
    pub steepness: f64,
}

impl Default for SigmoidNormalizer {
    fn default() -> Self {
        Self {
            midpoint_floor: 0.3,
            steepness: 50.0,
        }
    }
}

impl SigmoidNormalizer {
    /// Midpoint the curve would use for this crop
    pub fn midpoint(&self, crop: &RgbaImage) -> f64 {
        median(&brightness_values(crop)).max(self.midpoint_floor)
    }
}

impl ZoneNormalizer for SigmoidNormalizer {
    fn normalize(&self, crop: &RgbaImage) -> Result<RgbaImage> {
        let midpoint = self.midpoint(crop);
        tracing::trace!(midpoint, "Normalizing zone crop");
        Ok(adjust_sigmoid(crop, midpoint, self.steepness))
    }
}
