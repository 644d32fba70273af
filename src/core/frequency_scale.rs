use serde::{Deserialize, Serialize};

use crate::core::ViewportModel;

/// How frequency values are presented on the vertical axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum FrequencyScaleMode {
    #[default]
    Linear,
    Logarithmic,
}

/// Maps linear frequency coordinates to their displayed value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrequencyScaleMapper {
    domain_width: f64,
    mode: FrequencyScaleMode,
}

impl FrequencyScaleMapper {
    #[must_use]
    pub fn new(domain_width: f64, mode: FrequencyScaleMode) -> Self {
        Self { domain_width, mode }
    }

    #[must_use]
    pub fn for_viewport(viewport: &ViewportModel, mode: FrequencyScaleMode) -> Self {
        Self::new(viewport.domain().frequency.width(), mode)
    }

    /// `domain_width ^ (f / domain_width)`.
    ///
    /// An empty frequency domain has no logarithmic mapping; `f` is returned.
    #[must_use]
    pub fn linear_to_log(self, frequency: f64) -> f64 {
        if self.domain_width <= 0.0 {
            return frequency;
        }
        self.domain_width.powf(frequency / self.domain_width)
    }

    #[must_use]
    pub fn display_value(self, frequency: f64) -> f64 {
        match self.mode {
            FrequencyScaleMode::Linear => frequency,
            FrequencyScaleMode::Logarithmic => self.linear_to_log(frequency),
        }
    }

    #[must_use]
    pub fn format(self, frequency: f64) -> String {
        format_frequency(self.display_value(frequency))
    }
}

/// Formats a frequency in Hz or kHz with magnitude-dependent precision.
#[must_use]
pub fn format_frequency(hz: f64) -> String {
    if hz < 10.0 {
        format!("{hz:.2} Hz")
    } else if hz < 100.0 {
        format!("{hz:.1} Hz")
    } else if hz < 1000.0 {
        format!("{:.0} Hz", hz.round())
    } else if hz < 10_000.0 {
        format!("{:.2} kHz", hz / 1000.0)
    } else {
        format!("{:.1} kHz", hz / 1000.0)
    }
}

/// Formats seconds as `H:MM:SS.ss`; hours are not padded.
#[must_use]
pub fn format_time(seconds: f64) -> String {
    // round first so 59.996 carries into the minute instead of printing 60.00
    let hundredths = (seconds * 100.0).round();
    let total_minutes = (hundredths / 6_000.0).floor();
    let hours = (total_minutes / 60.0).floor();
    let minutes = total_minutes - hours * 60.0;
    let secs = (hundredths - total_minutes * 6_000.0) / 100.0;
    format!("{hours:.0}:{minutes:02.0}:{secs:05.2}")
}

/// Formatted bounds of the visible extent, as printed beside the spectrogram.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScaleLabels {
    pub time_start: String,
    pub time_end: String,
    pub frequency_low: String,
    pub frequency_high: String,
}

impl ScaleLabels {
    #[must_use]
    pub fn for_viewport(viewport: &ViewportModel, mode: FrequencyScaleMode) -> Self {
        let mapper = FrequencyScaleMapper::for_viewport(viewport, mode);
        let view = viewport.view();
        Self {
            time_start: format_time(view.time.min),
            time_end: format_time(view.time.max),
            frequency_low: mapper.format(view.frequency.min),
            frequency_high: mapper.format(view.frequency.max),
        }
    }
}
