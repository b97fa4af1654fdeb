use image::{GrayImage, ImageBuffer, Luma, Pixel, Rgb, RgbImage};
use imageproc::filter::median_filter;
use imageproc::map::{map_colors, map_colors2};

use crate::thresholds::{Channel, ChannelRange, ThresholdRanges};

/// Mask value for member pixels
pub const FOREGROUND: u8 = 255;
/// Mask value for non-member pixels
pub const BACKGROUND: u8 = 0;

/// Source index pair and blend weight for one destination coordinate.
/// Pixel centres sit at +0.5 and samples past the border are replicated.
fn axis_sample(dst: u32, src_len: u32, dst_len: u32) -> (u32, u32, f32) {
    let scale = src_len as f32 / dst_len as f32;
    let pos = (dst as f32 + 0.5) * scale - 0.5;
    let mut lo = pos.floor();
    let mut weight = pos - lo;

    if lo < 0.0 {
        lo = 0.0;
        weight = 0.0;
    }
    let last = (src_len - 1) as f32;
    if lo >= last {
        lo = last;
        weight = 0.0;
    }

    let lo = lo as u32;
    let hi = (lo + 1).min(src_len - 1);
    (lo, hi, weight)
}

/// Bilinear resize used for the processing frame, previews and the digit grid.
///
/// An empty source yields an all-zero image of the requested size.
pub fn resize_bilinear<P>(
    img: &ImageBuffer<P, Vec<u8>>,
    width: u32,
    height: u32,
) -> ImageBuffer<P, Vec<u8>>
where
    P: Pixel<Subpixel = u8>,
{
    let (src_w, src_h) = img.dimensions();
    let mut out = ImageBuffer::new(width, height);
    if src_w == 0 || src_h == 0 || width == 0 || height == 0 {
        return out;
    }

    let cols: Vec<_> = (0..width).map(|x| axis_sample(x, src_w, width)).collect();
    let rows: Vec<_> = (0..height).map(|y| axis_sample(y, src_h, height)).collect();

    for (x, y, pixel) in out.enumerate_pixels_mut() {
        let (x0, x1, ax) = cols[x as usize];
        let (y0, y1, ay) = rows[y as usize];

        let p00 = img.get_pixel(x0, y0).channels();
        let p10 = img.get_pixel(x1, y0).channels();
        let p01 = img.get_pixel(x0, y1).channels();
        let p11 = img.get_pixel(x1, y1).channels();

        for (c, out_c) in pixel.channels_mut().iter_mut().enumerate() {
            let top = p00[c] as f32 * (1.0 - ax) + p10[c] as f32 * ax;
            let bottom = p01[c] as f32 * (1.0 - ax) + p11[c] as f32 * ax;
            let value = top * (1.0 - ay) + bottom * ay;
            *out_c = value.round().clamp(0.0, 255.0) as u8;
        }
    }

    out
}

/// Convert one RGB pixel to 8-bit HSV: H in [0, 179], S and V in [0, 255]
pub fn rgb_to_hsv(rgb: Rgb<u8>) -> [u8; 3] {
    let [r, g, b] = rgb.0.map(|c| c as f32);
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let diff = max - min;

    let saturation = if max > 0.0 { 255.0 * diff / max } else { 0.0 };

    let degrees = if diff <= 0.0 {
        0.0
    } else if max == r {
        60.0 * (g - b) / diff
    } else if max == g {
        120.0 + 60.0 * (b - r) / diff
    } else {
        240.0 + 60.0 * (r - g) / diff
    };
    let degrees = if degrees < 0.0 { degrees + 360.0 } else { degrees };

    // Half-degree hue so it fits a byte; 180 is the same angle as 0.
    let hue = ((degrees / 2.0).round() as u32 % 180) as u8;

    [hue, saturation.round() as u8, max as u8]
}

/// The three single-channel planes of an HSV frame
#[derive(Debug, Clone)]
pub struct HsvPlanes {
    pub hue: GrayImage,
    pub saturation: GrayImage,
    pub value: GrayImage,
}

impl HsvPlanes {
    pub fn plane(&self, channel: Channel) -> &GrayImage {
        match channel {
            Channel::Hue => &self.hue,
            Channel::Saturation => &self.saturation,
            Channel::Value => &self.value,
        }
    }
}

/// Convert a frame to HSV and split it into planes
pub fn split_hsv(frame: &RgbImage) -> HsvPlanes {
    let (width, height) = frame.dimensions();
    let mut hue = GrayImage::new(width, height);
    let mut saturation = GrayImage::new(width, height);
    let mut value = GrayImage::new(width, height);

    for (x, y, pixel) in frame.enumerate_pixels() {
        let [h, s, v] = rgb_to_hsv(*pixel);
        hue.put_pixel(x, y, Luma([h]));
        saturation.put_pixel(x, y, Luma([s]));
        value.put_pixel(x, y, Luma([v]));
    }

    HsvPlanes {
        hue,
        saturation,
        value,
    }
}

/// Inclusive range threshold: 255 where `low <= value <= high`, else 0
pub fn in_range(plane: &GrayImage, range: ChannelRange) -> GrayImage {
    map_colors(plane, |p: Luma<u8>| {
        if range.contains(p[0]) {
            Luma([FOREGROUND])
        } else {
            Luma([BACKGROUND])
        }
    })
}

/// Per-channel masks for all three planes, in hue, saturation, value order
pub fn threshold_planes(planes: &HsvPlanes, ranges: &ThresholdRanges) -> [GrayImage; 3] {
    Channel::ALL.map(|channel| in_range(planes.plane(channel), ranges.get(channel)))
}

/// Pixel-wise logical AND of two masks
pub fn and_masks(a: &GrayImage, b: &GrayImage) -> GrayImage {
    map_colors2(a, b, |p: Luma<u8>, q: Luma<u8>| {
        if p[0] == FOREGROUND && q[0] == FOREGROUND {
            Luma([FOREGROUND])
        } else {
            Luma([BACKGROUND])
        }
    })
}

/// Median-filter a mask with a square `kernel`×`kernel` window.
///
/// Even kernel sizes behave as the next odd size. The result is snapped
/// back to 0/255.
pub fn denoise(mask: &GrayImage, kernel: u32) -> GrayImage {
    let radius = kernel / 2;
    let smoothed = if radius == 0 {
        mask.clone()
    } else {
        median_filter(mask, radius, radius)
    };

    map_colors(&smoothed, |p: Luma<u8>| {
        if p[0] >= 128 {
            Luma([FOREGROUND])
        } else {
            Luma([BACKGROUND])
        }
    })
}

/// Number of foreground pixels in a mask
pub fn foreground_count(mask: &GrayImage) -> usize {
    mask.pixels().filter(|p| p[0] == FOREGROUND).count()
}
