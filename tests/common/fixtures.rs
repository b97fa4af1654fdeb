#![allow(dead_code)]

use image::{GrayImage, Luma, Rgb, RgbImage};
use segdigit::{Channel, FrameProcessor, ProcessorConfig, ThresholdRanges};

/// Target colour: HSV (0, 204, 200), inside `target_ranges`
pub const TARGET: Rgb<u8> = Rgb([200, 40, 40]);
/// Background colour: HSV (0, 0, 0), outside `target_ranges`
pub const DARK: Rgb<u8> = Rgb([0, 0, 0]);

/// Ranges that select `TARGET` and reject `DARK`
pub fn target_ranges() -> ThresholdRanges {
    let mut ranges = ThresholdRanges::new();
    ranges.set_range(Channel::Hue, 0, 10);
    ranges.set_range(Channel::Saturation, 100, 254);
    ranges.set_range(Channel::Value, 100, 254);
    ranges
}

/// Processor that works at the frame's own size, so no resampling
/// happens before segmentation.
pub fn processor_for(width: u32, height: u32) -> FrameProcessor {
    FrameProcessor::new(ProcessorConfig::new().with_frame_size(width, height))
}

/// Paint the lit cells of a 3×5 signature as `cell`-pixel blocks of
/// `TARGET`, offset by `margin` on a dark frame.
pub fn digit_frame(lit: &[usize], cell: u32, margin: u32) -> RgbImage {
    let width = 3 * cell + 2 * margin;
    let height = 5 * cell + 2 * margin;
    let mut frame = RgbImage::from_pixel(width, height, DARK);
    paint_cells(&mut frame, lit, cell, margin, margin);
    frame
}

/// Paint cells of a 3×5 signature with the top-left corner at (x0, y0)
pub fn paint_cells(frame: &mut RgbImage, lit: &[usize], cell: u32, x0: u32, y0: u32) {
    for &idx in lit {
        let col = idx as u32 % 3;
        let row = idx as u32 / 3;
        fill_rect(frame, x0 + col * cell, y0 + row * cell, cell, cell, TARGET);
    }
}

pub fn fill_rect(frame: &mut RgbImage, x: u32, y: u32, w: u32, h: u32, color: Rgb<u8>) {
    for yy in y..(y + h).min(frame.height()) {
        for xx in x..(x + w).min(frame.width()) {
            frame.put_pixel(xx, yy, color);
        }
    }
}

/// A 3×5 grid with the given cells at 255 and the rest at 0
pub fn grid_with(lit: &[usize]) -> GrayImage {
    let mut grid = GrayImage::new(3, 5);
    for &idx in lit {
        grid.put_pixel(idx as u32 % 3, idx as u32 / 3, Luma([255]));
    }
    grid
}

/// Binary mask with filled rectangles (x, y, w, h)
pub fn mask_with_rects(width: u32, height: u32, rects: &[(u32, u32, u32, u32)]) -> GrayImage {
    let mut mask = GrayImage::new(width, height);
    for &(x, y, w, h) in rects {
        for yy in y..y + h {
            for xx in x..x + w {
                mask.put_pixel(xx, yy, Luma([255]));
            }
        }
    }
    mask
}

/// Small deterministic generator for operation sequences
pub struct Lcg(u64);

impl Lcg {
    pub fn new(seed: u64) -> Self {
        Self(seed)
    }

    pub fn next_u32(&mut self) -> u32 {
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        (self.0 >> 33) as u32
    }

    /// Uniform-ish value in [lo, hi]
    pub fn range(&mut self, lo: i32, hi: i32) -> i32 {
        lo + (self.next_u32() % (hi - lo + 1) as u32) as i32
    }
}
