pub mod detection;
pub mod models;
pub mod pipeline;
pub mod thresholds;

pub use models::{BoundingBox, Recognition, Region};
pub use detection::{FrameAnalysis, FrameProcessor, ProcessorConfig};
pub use detection::digits::{DigitCatalog, DigitMatcher, DigitReading};
pub use pipeline::{
    ConsoleSink, Cycle, DebugConfig, DebugDirSink, DisplaySink, FrameLoop, FrameSource,
    FrameUnavailable, ImageSequence, RunSummary,
};
pub use thresholds::{Channel, ChannelRange, SharedThresholds, ThresholdRanges};
