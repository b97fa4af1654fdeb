use std::fmt;
use std::sync::{Arc, Mutex};

/// One of the three HSV channels a threshold applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    Hue,
    Saturation,
    Value,
}

impl Channel {
    pub const ALL: [Channel; 3] = [Channel::Hue, Channel::Saturation, Channel::Value];

    /// Legal (min, max) for bounds on this channel, inclusive
    pub fn domain(self) -> (i32, i32) {
        match self {
            Channel::Hue => (0, 179),
            Channel::Saturation | Channel::Value => (0, 254),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Channel::Hue => "hue",
            Channel::Saturation => "saturation",
            Channel::Value => "value",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Inclusive (low, high) pair for one channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ChannelRange {
    pub low: i32,
    pub high: i32,
}

impl ChannelRange {
    pub fn contains(&self, value: u8) -> bool {
        let value = value as i32;
        self.low <= value && value <= self.high
    }
}

/// The six threshold bounds, kept consistent under independent updates.
///
/// Every update is clamped to the channel's domain and afterwards
/// `domain_min <= low <= high <= domain_max` holds for all channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ThresholdRanges {
    hue: ChannelRange,
    saturation: ChannelRange,
    value: ChannelRange,
}

impl ThresholdRanges {
    /// All bounds start at zero.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, channel: Channel) -> ChannelRange {
        match channel {
            Channel::Hue => self.hue,
            Channel::Saturation => self.saturation,
            Channel::Value => self.value,
        }
    }

    fn range_mut(&mut self, channel: Channel) -> &mut ChannelRange {
        match channel {
            Channel::Hue => &mut self.hue,
            Channel::Saturation => &mut self.saturation,
            Channel::Value => &mut self.value,
        }
    }

    /// Move the high bound. If the current low would end up above it,
    /// low is pulled down to one below the new high first.
    pub fn set_high(&mut self, channel: Channel, requested: i32) {
        let (min, max) = channel.domain();
        let high = requested.clamp(min, max);
        let range = self.range_mut(channel);

        // Compare against the low as it stands before anything is stored.
        if range.low > high {
            range.low = (high - 1).min(max).max(min);
        }
        range.high = high;
    }

    /// Move the low bound. If the current high is below it, high is
    /// raised to one above the new low (clamped to the domain).
    pub fn set_low(&mut self, channel: Channel, requested: i32) {
        let (min, max) = channel.domain();
        let low = requested.clamp(min, max);
        let range = self.range_mut(channel);

        if range.high < low {
            range.high = (low + 1).min(max);
        }
        range.low = low;
    }

    /// Set both bounds, high first, so a wider interval never has to
    /// fight the old one.
    pub fn set_range(&mut self, channel: Channel, low: i32, high: i32) {
        self.set_high(channel, high);
        self.set_low(channel, low);
    }
}

impl fmt::Display for ThresholdRanges {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "H[{}..{}] S[{}..{}] V[{}..{}]",
            self.hue.low,
            self.hue.high,
            self.saturation.low,
            self.saturation.high,
            self.value.low,
            self.value.high
        )
    }
}

/// Threshold state shared between an input actor and the frame loop.
///
/// Updates and reads go through one lock, and the pipeline only ever sees
/// a full copy taken at the start of a cycle, so a (low, high) pair can
/// never be observed half-updated.
#[derive(Debug, Clone, Default)]
pub struct SharedThresholds {
    inner: Arc<Mutex<ThresholdRanges>>,
}

impl SharedThresholds {
    pub fn new(ranges: ThresholdRanges) -> Self {
        Self {
            inner: Arc::new(Mutex::new(ranges)),
        }
    }

    pub fn snapshot(&self) -> ThresholdRanges {
        *self.lock()
    }

    pub fn set_low(&self, channel: Channel, requested: i32) {
        self.lock().set_low(channel, requested);
    }

    pub fn set_high(&self, channel: Channel, requested: i32) {
        self.lock().set_high(channel, requested);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ThresholdRanges> {
        // The guarded value is plain data, so a poisoned lock still holds a valid state.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
