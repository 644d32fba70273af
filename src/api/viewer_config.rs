use serde::{Deserialize, Serialize};

use crate::core::{AmplitudeWindow, ChannelId};
use crate::error::{ViewerError, ViewerResult};
use crate::interaction::WheelTuning;
use crate::render::DisplayOptions;

/// Extent shown by a channel before any dataset arrives.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlaceholderExtent {
    /// `[start, end]` in seconds.
    pub time_range: (f64, f64),
    /// Sampling rate; the frequency domain is `[0, sample_rate / 2]`.
    pub sample_rate: f64,
}

impl Default for PlaceholderExtent {
    fn default() -> Self {
        Self {
            time_range: (0.0, 1.0),
            sample_rate: 200.0,
        }
    }
}

/// Public viewer bootstrap configuration.
///
/// Serializable so hosts can persist viewer setup alongside their own settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewerConfig {
    #[serde(default = "default_channels")]
    pub channels: Vec<ChannelId>,
    #[serde(default)]
    pub amplitude_window: AmplitudeWindow,
    /// Half-extent of the amplitude domain.
    #[serde(default = "default_amplitude_limit")]
    pub amplitude_limit: f64,
    #[serde(default)]
    pub wheel_tuning: WheelTuning,
    #[serde(default)]
    pub display: DisplayOptions,
    #[serde(default)]
    pub placeholder: PlaceholderExtent,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            channels: default_channels(),
            amplitude_window: AmplitudeWindow::default(),
            amplitude_limit: default_amplitude_limit(),
            wheel_tuning: WheelTuning::default(),
            display: DisplayOptions::default(),
            placeholder: PlaceholderExtent::default(),
        }
    }
}

fn default_channels() -> Vec<ChannelId> {
    ChannelId::ALL.to_vec()
}

fn default_amplitude_limit() -> f64 {
    150.0
}

impl ViewerConfig {
    #[must_use]
    pub fn with_channels(mut self, channels: impl IntoIterator<Item = ChannelId>) -> Self {
        self.channels = channels.into_iter().collect();
        self
    }

    #[must_use]
    pub fn with_amplitude_window(mut self, window: AmplitudeWindow) -> Self {
        self.amplitude_window = window;
        self
    }

    #[must_use]
    pub fn with_amplitude_limit(mut self, limit: f64) -> Self {
        self.amplitude_limit = limit;
        self
    }

    #[must_use]
    pub fn with_wheel_tuning(mut self, tuning: WheelTuning) -> Self {
        self.wheel_tuning = tuning;
        self
    }

    #[must_use]
    pub fn with_display_options(mut self, display: DisplayOptions) -> Self {
        self.display = display;
        self
    }

    pub fn validate(&self) -> ViewerResult<()> {
        if self.channels.is_empty() {
            return Err(ViewerError::InvalidData(
                "viewer needs at least one channel".to_owned(),
            ));
        }
        for (position, channel) in self.channels.iter().enumerate() {
            if self.channels[..position].contains(channel) {
                return Err(ViewerError::InvalidData(format!(
                    "channel {channel} is configured twice"
                )));
            }
        }
        self.amplitude_window.validate()?;
        if !self.amplitude_limit.is_finite() || self.amplitude_limit <= 0.0 {
            return Err(ViewerError::InvalidData(
                "amplitude limit must be finite and > 0".to_owned(),
            ));
        }
        self.wheel_tuning.validate()?;

        let (start, end) = self.placeholder.time_range;
        if !start.is_finite() || !end.is_finite() || start > end {
            return Err(ViewerError::InvalidData(
                "placeholder time range must be finite and ordered".to_owned(),
            ));
        }
        if !self.placeholder.sample_rate.is_finite() || self.placeholder.sample_rate <= 0.0 {
            return Err(ViewerError::InvalidData(
                "placeholder sample rate must be finite and > 0".to_owned(),
            ));
        }
        Ok(())
    }

    pub fn to_json_pretty(&self) -> ViewerResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| ViewerError::InvalidData(format!("failed to serialize config: {e}")))
    }

    pub fn from_json_str(input: &str) -> ViewerResult<Self> {
        let config: Self = serde_json::from_str(input)
            .map_err(|e| ViewerError::InvalidData(format!("failed to parse config: {e}")))?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::ViewerConfig;
    use crate::core::ChannelId;

    #[test]
    fn empty_json_yields_defaults() {
        let config = ViewerConfig::from_json_str("{}").expect("config");
        assert_eq!(config, ViewerConfig::default());
        assert_eq!(config.channels, ChannelId::ALL.to_vec());
        assert_eq!(config.amplitude_limit, 150.0);
    }

    #[test]
    fn duplicate_channels_are_rejected() {
        let config = ViewerConfig::default()
            .with_channels([ChannelId::LeftLateral, ChannelId::LeftLateral]);
        assert!(config.validate().is_err());
    }

    #[test]
    fn json_round_trip_preserves_config() {
        let config = ViewerConfig::default()
            .with_channels([ChannelId::RightLateral])
            .with_amplitude_limit(80.0);
        let json = config.to_json_pretty().expect("json");
        assert_eq!(ViewerConfig::from_json_str(&json).expect("parse"), config);
    }
}
