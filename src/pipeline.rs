use image::{GrayImage, ImageReader, RgbImage};
use std::fmt;
use std::path::{Path, PathBuf};
use anyhow::Result;

use crate::detection::preprocessing::resize_bilinear;
use crate::detection::{FrameAnalysis, FrameProcessor};
use crate::thresholds::SharedThresholds;

/// The frame source had no frame to give this cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameUnavailable {
    pub reason: String,
}

impl FrameUnavailable {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl fmt::Display for FrameUnavailable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Frame unavailable: {}", self.reason)
    }
}

impl std::error::Error for FrameUnavailable {}

/// Supplies raw frames, blocking until one is ready
pub trait FrameSource {
    /// `Ok(None)` means the source is finished for good.
    fn next_frame(&mut self) -> Result<Option<RgbImage>, FrameUnavailable>;
}

/// Consumes the outputs of each processed frame
pub trait DisplaySink {
    fn present(&mut self, frame_index: usize, analysis: &FrameAnalysis) -> Result<()>;
}

/// Frame source backed by a list of image files, read in order
pub struct ImageSequence {
    paths: Vec<PathBuf>,
    next: usize,
}

impl ImageSequence {
    pub fn new(paths: Vec<PathBuf>) -> Self {
        Self { paths, next: 0 }
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

impl FrameSource for ImageSequence {
    fn next_frame(&mut self) -> Result<Option<RgbImage>, FrameUnavailable> {
        let Some(path) = self.paths.get(self.next) else {
            return Ok(None);
        };
        self.next += 1;

        let reader = ImageReader::open(path)
            .map_err(|e| FrameUnavailable::new(format!("{}: {}", path.display(), e)))?;
        let img = reader
            .with_guessed_format()
            .map_err(|e| FrameUnavailable::new(format!("{}: {}", path.display(), e)))?
            .decode()
            .map_err(|e| {
                FrameUnavailable::new(format!("Failed to decode {}: {}", path.display(), e))
            })?;

        Ok(Some(img.to_rgb8()))
    }
}

/// Prints the recognised digit for every frame
pub struct ConsoleSink {
    pub verbose: bool,
}

impl DisplaySink for ConsoleSink {
    fn present(&mut self, frame_index: usize, analysis: &FrameAnalysis) -> Result<()> {
        if self.verbose {
            let bbox = analysis.region.bbox();
            println!(
                "Frame {}: {} (region {}x{} at ({}, {}), area {})",
                frame_index,
                analysis.recognition(),
                bbox.width,
                bbox.height,
                bbox.x,
                bbox.y,
                analysis.region.area()
            );
        } else {
            println!("Frame {}: {}", frame_index, analysis.recognition());
        }
        Ok(())
    }
}

/// Debug configuration for saving intermediate images
#[derive(Clone, Debug)]
pub struct DebugConfig {
    /// Root directory for debug outputs
    pub output_dir: PathBuf,
    /// Resize every saved image to this size, as a display would
    pub preview_size: Option<(u32, u32)>,
}

impl DebugConfig {
    /// The directory must be empty or non-existent
    pub fn new(output_dir: PathBuf) -> Result<Self> {
        if output_dir.exists() {
            let entries = std::fs::read_dir(&output_dir)?;
            if entries.count() > 0 {
                return Err(anyhow::anyhow!(
                    "Debug directory is not empty: {}",
                    output_dir.display()
                ));
            }
        } else {
            std::fs::create_dir_all(&output_dir)?;
        }

        Ok(Self {
            output_dir,
            preview_size: None,
        })
    }

    pub fn with_preview_size(mut self, width: u32, height: u32) -> Self {
        self.preview_size = Some((width, height));
        self
    }
}

/// Writes each stage's image to `<dir>/<NN_stage>/<frame>.png`
pub struct DebugDirSink {
    config: DebugConfig,
    verbose: bool,
}

/// Stage directory names, in save order
pub const DEBUG_STAGES: [&str; 6] = [
    "00_annotated",
    "01_hue",
    "02_saturation",
    "03_value",
    "04_combined",
    "05_isolated",
];

impl DebugDirSink {
    pub fn new(config: DebugConfig, verbose: bool) -> Self {
        Self { config, verbose }
    }

    fn save_gray(&self, stage_dir: &Path, filename: &str, mask: &GrayImage) -> Result<()> {
        // A degenerate crop has nothing to encode.
        if mask.width() == 0 || mask.height() == 0 {
            return Ok(());
        }
        let output = match self.config.preview_size {
            Some((w, h)) => resize_bilinear(mask, w, h),
            None => mask.clone(),
        };
        output
            .save(stage_dir.join(filename))
            .map_err(|e| anyhow::anyhow!("Failed to save debug image: {}", e))
    }

    fn save_rgb(&self, stage_dir: &Path, filename: &str, frame: &RgbImage) -> Result<()> {
        if frame.width() == 0 || frame.height() == 0 {
            return Ok(());
        }
        let output = match self.config.preview_size {
            Some((w, h)) => resize_bilinear(frame, w, h),
            None => frame.clone(),
        };
        output
            .save(stage_dir.join(filename))
            .map_err(|e| anyhow::anyhow!("Failed to save debug image: {}", e))
    }
}

impl DisplaySink for DebugDirSink {
    fn present(&mut self, frame_index: usize, analysis: &FrameAnalysis) -> Result<()> {
        let filename = format!("{:04}.png", frame_index);

        for (stage, step_dir_name) in DEBUG_STAGES.iter().enumerate() {
            let step_dir = self.config.output_dir.join(step_dir_name);
            std::fs::create_dir_all(&step_dir)?;

            match stage {
                0 => self.save_rgb(&step_dir, &filename, &analysis.annotated)?,
                1 => self.save_gray(&step_dir, &filename, &analysis.hue_mask)?,
                2 => self.save_gray(&step_dir, &filename, &analysis.saturation_mask)?,
                3 => self.save_gray(&step_dir, &filename, &analysis.value_mask)?,
                4 => self.save_gray(&step_dir, &filename, &analysis.combined)?,
                _ => self.save_gray(&step_dir, &filename, &analysis.isolated)?,
            }
        }

        if self.verbose {
            println!(
                "  Debug: saved frame {} to {}",
                frame_index,
                self.config.output_dir.display()
            );
        }
        Ok(())
    }
}

/// What happened in one cycle of the frame loop
#[derive(Debug, Clone)]
pub enum Cycle {
    Processed(Box<FrameAnalysis>),
    Skipped(FrameUnavailable),
    Finished,
}

/// Totals for a whole run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub processed: usize,
    pub skipped: usize,
    pub recognized: usize,
}

/// Drives source -> processor -> sinks, one frame per cycle
pub struct FrameLoop<S: FrameSource> {
    source: S,
    processor: FrameProcessor,
    thresholds: SharedThresholds,
    sinks: Vec<Box<dyn DisplaySink>>,
    verbose: bool,
    frame_index: usize,
}

impl<S: FrameSource> FrameLoop<S> {
    pub fn new(source: S, processor: FrameProcessor, thresholds: SharedThresholds) -> Self {
        let verbose = processor.config.verbose;
        Self {
            source,
            processor,
            thresholds,
            sinks: Vec::new(),
            verbose,
            frame_index: 0,
        }
    }

    pub fn add_sink(mut self, sink: Box<dyn DisplaySink>) -> Self {
        self.sinks.push(sink);
        self
    }

    /// Process at most one frame.
    ///
    /// The thresholds are snapshotted before acquisition so the whole
    /// frame is processed against one consistent set of bounds.
    pub fn step(&mut self) -> Result<Cycle> {
        let ranges = self.thresholds.snapshot();

        let frame = match self.source.next_frame() {
            Ok(Some(frame)) => frame,
            Ok(None) => return Ok(Cycle::Finished),
            Err(unavailable) => {
                if self.verbose {
                    println!("Skipping cycle: {}", unavailable);
                }
                return Ok(Cycle::Skipped(unavailable));
            }
        };

        self.frame_index += 1;
        if self.verbose {
            println!(
                "Processing frame {} ({}x{})",
                self.frame_index,
                frame.width(),
                frame.height()
            );
        }

        let analysis = self.processor.process(&frame, &ranges);
        for sink in self.sinks.iter_mut() {
            sink.present(self.frame_index, &analysis)?;
        }

        Ok(Cycle::Processed(Box::new(analysis)))
    }

    /// Run until the source is exhausted
    pub fn run(&mut self) -> Result<RunSummary> {
        let mut summary = RunSummary::default();

        loop {
            match self.step()? {
                Cycle::Processed(analysis) => {
                    summary.processed += 1;
                    if analysis.recognition().digit().is_some() {
                        summary.recognized += 1;
                    }
                }
                Cycle::Skipped(_) => summary.skipped += 1,
                Cycle::Finished => break,
            }
        }

        if self.verbose {
            println!(
                "Done: {} processed, {} skipped, {} recognized",
                summary.processed, summary.skipped, summary.recognized
            );
        }
        Ok(summary)
    }
}
