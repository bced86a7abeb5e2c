use image::{Rgba, RgbaImage, imageops};

use crate::{error::Result, traits::ZoneNormalizer, types::Zone};

const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// Copy out the part of `image` covered by the zone (possibly 0×0)
pub fn crop_zone(image: &RgbaImage, zone: &Zone) -> RgbaImage {
    let rect = zone.clip_to(image.width(), image.height());
    if rect.is_empty() {
        return RgbaImage::new(0, 0);
    }
    imageops::crop_imm(image, rect.x, rect.y, rect.width, rect.height).to_image()
}

/// Opaque black canvas
pub fn black_canvas(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_pixel(width, height, BLACK)
}

/// Overwrite `canvas` with `patch` anchored at the zone's declared corner.
/// Pixels falling outside the canvas are dropped; nothing is blended.
pub fn paste_zone(canvas: &mut RgbaImage, patch: &RgbaImage, zone: &Zone) {
    imageops::replace(canvas, patch, i64::from(zone.x1), i64::from(zone.y1));
}

/// Normalize every zone independently and lay the results on a black canvas.
///
/// Zones are pasted in order, so where zones overlap the last one wins.
/// Everything outside the zones stays black.
pub fn mask_zones(
    image: &RgbaImage,
    zones: &[Zone],
    normalizer: &dyn ZoneNormalizer,
) -> Result<RgbaImage> {
    let mut canvas = black_canvas(image.width(), image.height());

    for zone in zones {
        let crop = crop_zone(image, zone);
        let normalized = normalizer.normalize(&crop)?;
        paste_zone(&mut canvas, &normalized, zone);
    }

    Ok(canvas)
}
