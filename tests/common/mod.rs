mod fixtures;
pub use fixtures::*;

// Re-export commonly used types from segdigit for tests
pub use segdigit::{
    Channel, ChannelRange, DigitCatalog, DigitMatcher, FrameProcessor, ProcessorConfig, Recognition,
    Region, ThresholdRanges,
};
