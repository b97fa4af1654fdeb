use image::{GrayImage, Rgb, RgbImage};
use imageproc::drawing::draw_hollow_rect_mut;
use imageproc::rect::Rect;

use crate::models::BoundingBox;

/// Draw `bbox` onto a copy of `frame` with a stroke `stroke` pixels wide.
///
/// The stroke is centred on the rectangle outline and clipped at the
/// frame edges. An empty box leaves the frame untouched.
pub fn draw_bounding_box(
    frame: &RgbImage,
    bbox: &BoundingBox,
    color: Rgb<u8>,
    stroke: u32,
) -> RgbImage {
    let mut annotated = frame.clone();
    if bbox.is_empty() || stroke == 0 {
        return annotated;
    }

    // Outward offsets, e.g. stroke 4 draws rings at +2, +1, 0, -1.
    let outer = (stroke / 2) as i32;
    for i in 0..stroke as i32 {
        let offset = outer - i;
        let width = bbox.width as i32 + 2 * offset;
        let height = bbox.height as i32 + 2 * offset;
        if width <= 0 || height <= 0 {
            break;
        }

        let rect = Rect::at(bbox.x as i32 - offset, bbox.y as i32 - offset)
            .of_size(width as u32, height as u32);
        draw_hollow_rect_mut(&mut annotated, rect, color);
    }

    annotated
}

/// Restrict a mask to `bbox`. The box is clipped to the mask, and an empty
/// box (or one entirely outside) gives a 0×0 mask.
pub fn crop_mask(mask: &GrayImage, bbox: &BoundingBox) -> GrayImage {
    let (width, height) = mask.dimensions();
    if bbox.is_empty() || bbox.x >= width || bbox.y >= height {
        return GrayImage::new(0, 0);
    }

    let crop_w = bbox.width.min(width - bbox.x);
    let crop_h = bbox.height.min(height - bbox.y);

    image::imageops::crop_imm(mask, bbox.x, bbox.y, crop_w, crop_h).to_image()
}
