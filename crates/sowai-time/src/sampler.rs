//! Clock sampler - turns the time of day into generator labels

use sowai_core::TimeDigits;

use crate::{LocalClock, LocalTimeSource};

/// Derives the six clock digits from a local time source
pub struct ClockSampler {
    source: Box<dyn LocalTimeSource + Send>,
}

impl ClockSampler {
    /// Sampler reading the host's local time
    pub fn local() -> Self {
        Self::with_source(LocalClock)
    }

    /// Sampler over an arbitrary time source
    pub fn with_source(source: impl LocalTimeSource + Send + 'static) -> Self {
        ClockSampler {
            source: Box::new(source),
        }
    }

    /// Read the time and split it into digits
    pub fn sample(&self) -> TimeDigits {
        let (hour, minute, second) = self.source.hms();
        TimeDigits::from_hms(hour, minute, second)
    }
}

impl Default for ClockSampler {
    fn default() -> Self {
        Self::local()
    }
}
