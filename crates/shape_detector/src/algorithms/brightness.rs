use image::{Rgba, RgbaImage};

/// Rank used for the zone "median": the 70th percentile
pub const MEDIAN_RANK: f64 = 0.7;

/// Average of the three color channels, each divided by alpha.
///
/// Channels are first widened to 16-bit alpha-premultiplied samples, so an
/// opaque pixel yields `mean(r, g, b) / 255`. This is not a perceptual
/// luminance. Fully transparent pixels carry no light and yield 0.
pub fn pixel_brightness(Rgba([r, g, b, a]): Rgba<u8>) -> f64 {
    if a == 0 {
        return 0.0;
    }

    let alpha = u32::from(a) * 0x101;
    let premultiplied = |c: u8| f64::from(u32::from(c) * 0x101 * u32::from(a) / 0xff);
    let alpha = f64::from(alpha);

    (premultiplied(r) / alpha + premultiplied(g) / alpha + premultiplied(b) / alpha) / 3.0
}

/// Brightness of every pixel in the image, row by row
pub fn brightness_values(image: &RgbaImage) -> Vec<f64> {
    image.pixels().map(|p| pixel_brightness(*p)).collect()
}

/// Value at index `floor(rank * len)` of the sorted values, 0 when empty
pub fn percentile(values: &[f64], rank: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let index = ((sorted.len() as f64 * rank) as usize).min(sorted.len() - 1);
    sorted[index]
}

/// The zone "median", which is really the 70th percentile
pub fn median(values: &[f64]) -> f64 {
    percentile(values, MEDIAN_RANK)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opaque_brightness_is_channel_mean() {
        assert_eq!(pixel_brightness(Rgba([255, 255, 255, 255])), 1.0);
        assert_eq!(pixel_brightness(Rgba([0, 0, 0, 255])), 0.0);

        let b = pixel_brightness(Rgba([51, 102, 153, 255]));
        assert!((b - 102.0 / 255.0).abs() < 1e-12);
    }

    #[test]
    fn test_brightness_ignores_luminance_weights() {
        // Pure red and pure blue are equally bright here
        let red = pixel_brightness(Rgba([255, 0, 0, 255]));
        let blue = pixel_brightness(Rgba([0, 0, 255, 255]));
        assert_eq!(red, blue);
        assert!((red - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_brightness_divides_by_alpha() {
        // Non-premultiplied white at half alpha is still white after dividing
        let b = pixel_brightness(Rgba([255, 255, 255, 128]));
        assert!((b - 1.0).abs() < 1e-3);
        assert_eq!(pixel_brightness(Rgba([255, 255, 255, 0])), 0.0);
    }

    #[test]
    fn test_percentile_edge_cases() {
        assert_eq!(median(&[]), 0.0);
        assert_eq!(median(&[0.42]), 0.42);
    }

    #[test]
    fn test_median_is_seventieth_percentile() {
        let values: Vec<f64> = (0..10).rev().map(|v| v as f64).collect();
        // floor(0.7 * 10) = 7
        assert_eq!(median(&values), 7.0);

        let values = [0.9, 0.1, 0.5];
        // floor(0.7 * 3) = 2
        assert_eq!(median(&values), 0.9);
    }

    #[test]
    fn test_percentile_does_not_reorder_input() {
        let values = [3.0, 1.0, 2.0];
        percentile(&values, 0.5);
        assert_eq!(values, [3.0, 1.0, 2.0]);
    }
}
