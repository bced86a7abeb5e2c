use image::{DynamicImage, Rgba, RgbaImage};

/// Grayscale conversion with Rec. 601 weights, keeping alpha.
///
/// Each of R, G and B becomes `trunc(0.299r + 0.587g + 0.114b + 0.5)`.
pub fn grayscale(image: &DynamicImage) -> RgbaImage {
    let rgba = image.to_rgba8();
    imageproc::map::map_colors(&rgba, |Rgba([r, g, b, a])| {
        let y = 0.299 * f64::from(r) + 0.587 * f64::from(g) + 0.114 * f64::from(b);
        let y = (y + 0.5) as u8;
        Rgba([y, y, y, a])
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    #[test]
    fn test_grayscale_weights() {
        let mut img = RgbImage::new(3, 1);
        img.put_pixel(0, 0, Rgb([255, 0, 0]));
        img.put_pixel(1, 0, Rgb([0, 255, 0]));
        img.put_pixel(2, 0, Rgb([0, 0, 255]));

        let gray = grayscale(&DynamicImage::ImageRgb8(img));
        assert_eq!(gray.get_pixel(0, 0), &Rgba([76, 76, 76, 255]));
        assert_eq!(gray.get_pixel(1, 0), &Rgba([150, 150, 150, 255]));
        assert_eq!(gray.get_pixel(2, 0), &Rgba([29, 29, 29, 255]));
    }

    #[test]
    fn test_grayscale_keeps_neutral_values_and_alpha() {
        let mut img = RgbaImage::new(2, 1);
        img.put_pixel(0, 0, Rgba([200, 200, 200, 255]));
        img.put_pixel(1, 0, Rgba([255, 255, 255, 40]));

        let gray = grayscale(&DynamicImage::ImageRgba8(img));
        assert_eq!(gray.get_pixel(0, 0), &Rgba([200, 200, 200, 255]));
        assert_eq!(gray.get_pixel(1, 0), &Rgba([255, 255, 255, 40]));
    }
}
