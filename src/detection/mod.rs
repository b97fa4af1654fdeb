pub mod preprocessing;
pub mod contours;
pub mod annotate;
pub mod digits;

use image::{GrayImage, Rgb, RgbImage};

use crate::models::{Recognition, Region};
use crate::thresholds::ThresholdRanges;
use digits::{DigitMatcher, DigitReading};

/// Tunables for one frame-processing pass
#[derive(Debug, Clone)]
pub struct ProcessorConfig {
    /// Size every input frame is resized to before processing
    pub frame_width: u32,
    pub frame_height: u32,
    /// Median kernel side length; even sizes act as the next odd size
    pub median_kernel: u32,
    /// Bounding box stroke width in pixels
    pub stroke_width: u32,
    pub highlight: Rgb<u8>,
    pub verbose: bool,
}

impl ProcessorConfig {
    pub fn new() -> Self {
        Self {
            frame_width: 290,
            frame_height: 272,
            median_kernel: 5,
            stroke_width: 4,
            highlight: Rgb([255, 0, 0]),
            verbose: false,
        }
    }

    pub fn with_frame_size(mut self, width: u32, height: u32) -> Self {
        self.frame_width = width;
        self.frame_height = height;
        self
    }

    pub fn with_median_kernel(mut self, kernel: u32) -> Self {
        self.median_kernel = kernel;
        self
    }

    pub fn with_stroke_width(mut self, stroke: u32) -> Self {
        self.stroke_width = stroke;
        self
    }

    pub fn with_highlight(mut self, color: Rgb<u8>) -> Self {
        self.highlight = color;
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// All outputs of one processing pass
#[derive(Debug, Clone)]
pub struct FrameAnalysis {
    /// Resized input with the winning region outlined
    pub annotated: RgbImage,
    pub hue_mask: GrayImage,
    pub saturation_mask: GrayImage,
    pub value_mask: GrayImage,
    /// AND of the three channel masks after median denoising
    pub combined: GrayImage,
    /// Combined mask cropped to the winning region
    pub isolated: GrayImage,
    pub region: Region,
    /// Number of connected regions found in the combined mask
    pub region_count: usize,
    pub digit: DigitReading,
}

impl FrameAnalysis {
    pub fn recognition(&self) -> Recognition {
        self.digit.recognition
    }
}

/// Runs the colour segmentation and digit matching for one frame.
///
/// Holds no per-frame state; each call depends only on the frame and the
/// threshold snapshot passed in.
#[derive(Debug, Clone)]
pub struct FrameProcessor {
    pub config: ProcessorConfig,
    matcher: DigitMatcher,
}

impl FrameProcessor {
    pub fn new(config: ProcessorConfig) -> Self {
        Self {
            config,
            matcher: DigitMatcher::default(),
        }
    }

    pub fn with_matcher(mut self, matcher: DigitMatcher) -> Self {
        self.matcher = matcher;
        self
    }

    pub fn matcher(&self) -> &DigitMatcher {
        &self.matcher
    }

    /// Run the full pass on one raw frame
    pub fn process(&self, frame: &RgbImage, ranges: &ThresholdRanges) -> FrameAnalysis {
        let verbose = self.config.verbose;

        // Step 1: Resize to processing size
        let resized = preprocessing::resize_bilinear(
            frame,
            self.config.frame_width,
            self.config.frame_height,
        );
        if verbose {
            println!(
                "Resized frame {}x{} -> {}x{}",
                frame.width(),
                frame.height(),
                resized.width(),
                resized.height()
            );
        }

        // Step 2: HSV planes
        let planes = preprocessing::split_hsv(&resized);

        // Step 3: Per-channel thresholds
        let [hue_mask, saturation_mask, value_mask] =
            preprocessing::threshold_planes(&planes, ranges);
        if verbose {
            println!(
                "Thresholds {}: hue={} sat={} val={} pixels",
                ranges,
                preprocessing::foreground_count(&hue_mask),
                preprocessing::foreground_count(&saturation_mask),
                preprocessing::foreground_count(&value_mask)
            );
        }

        // Step 4 + 5: Combine and denoise
        let hue_and_sat = preprocessing::and_masks(&hue_mask, &saturation_mask);
        let combined = preprocessing::and_masks(&hue_and_sat, &value_mask);
        let combined = preprocessing::denoise(&combined, self.config.median_kernel);

        // Step 6: Largest connected region
        let regions = contours::find_regions(&combined);
        let region = contours::largest_region(&regions);
        if verbose {
            println!("Found {} regions", regions.len());
            if region.is_empty() {
                println!("  No foreground region");
            } else {
                let bbox = region.bbox();
                println!(
                    "  Largest: area={} at ({}, {}) {}x{}",
                    region.area(),
                    bbox.x,
                    bbox.y,
                    bbox.width,
                    bbox.height
                );
            }
        }

        // Step 7: Annotate
        let bbox = region.bbox();
        let annotated = annotate::draw_bounding_box(
            &resized,
            &bbox,
            self.config.highlight,
            self.config.stroke_width,
        );

        // Step 8: Isolate and match
        let isolated = annotate::crop_mask(&combined, &bbox);
        let digit = self.matcher.read(&isolated);
        if verbose {
            println!("  Lit cells {:?} -> {}", digit.lit_cells, digit.recognition);
        }

        FrameAnalysis {
            annotated,
            hue_mask,
            saturation_mask,
            value_mask,
            combined,
            isolated,
            region,
            region_count: regions.len(),
            digit,
        }
    }
}

impl Default for FrameProcessor {
    fn default() -> Self {
        Self::new(ProcessorConfig::default())
    }
}
