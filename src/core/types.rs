use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ViewerError, ViewerResult};

/// Axis of a spectrogram view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    Time,
    Frequency,
    Amplitude,
}

/// Identifier of one independently addressable spectrogram view.
///
/// The fixed set mirrors the four bipolar montage leads the compute service
/// produces (left-lateral, left-parasagittal, right-parasagittal, right-lateral).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ChannelId {
    #[serde(rename = "LL")]
    LeftLateral,
    #[serde(rename = "LP")]
    LeftParasagittal,
    #[serde(rename = "RP")]
    RightParasagittal,
    #[serde(rename = "RL")]
    RightLateral,
}

impl ChannelId {
    pub const ALL: [Self; 4] = [
        Self::LeftLateral,
        Self::LeftParasagittal,
        Self::RightParasagittal,
        Self::RightLateral,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::LeftLateral => "LL",
            Self::LeftParasagittal => "LP",
            Self::RightParasagittal => "RP",
            Self::RightLateral => "RL",
        }
    }

    /// Position of the channel in the compute service's channel numbering.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::LeftLateral => 0,
            Self::LeftParasagittal => 1,
            Self::RightParasagittal => 2,
            Self::RightLateral => 3,
        }
    }

    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChannelId {
    type Err = ViewerError;

    fn from_str(value: &str) -> ViewerResult<Self> {
        Self::ALL
            .into_iter()
            .find(|channel| channel.as_str() == value)
            .ok_or_else(|| ViewerError::UnknownChannel(value.to_owned()))
    }
}

/// Pointer position normalized to the spectrogram surface.
///
/// `x` grows to the right and `y` grows downwards, both in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalizedPointer {
    pub x: f64,
    pub y: f64,
}

impl NormalizedPointer {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn validate(self) -> ViewerResult<Self> {
        if !self.x.is_finite() || !self.y.is_finite() {
            return Err(ViewerError::InvalidData(
                "pointer position must be finite".to_owned(),
            ));
        }
        Ok(self)
    }
}
