use serde::{Deserialize, Serialize};

use crate::core::{ChannelId, FrequencyScaleMode, ViewportModel, ZoomTransform};
use crate::error::{ViewerError, ViewerResult};
use crate::tiles::Tile;

/// Texture sampling applied when a tile is magnified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Interpolation {
    #[default]
    Nearest,
    Linear,
}

/// Presentation switches shared by every channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct DisplayOptions {
    #[serde(default)]
    pub frequency_scale: FrequencyScaleMode,
    #[serde(default)]
    pub interpolation: Interpolation,
}

/// Extent of the full dataset handed to the shader.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DomainSize {
    pub width_t: f64,
    pub width_f: f64,
    pub num_t: usize,
    pub num_f: usize,
}

/// Everything a backend needs to draw one channel.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderFrame<'a> {
    pub channel: ChannelId,
    pub tiles: &'a [Tile],
    pub zoom: ZoomTransform,
    /// Visible amplitude band as `(min, max)`.
    pub amplitude_window: (f64, f64),
    pub domain_size: DomainSize,
    pub options: DisplayOptions,
}

impl<'a> RenderFrame<'a> {
    #[must_use]
    pub fn new(
        channel: ChannelId,
        viewport: &ViewportModel,
        tiles: &'a [Tile],
        options: DisplayOptions,
    ) -> Self {
        let domain = viewport.domain();
        Self {
            channel,
            tiles,
            zoom: viewport.zoom_transform(),
            amplitude_window: viewport.amplitude_window(),
            domain_size: DomainSize {
                width_t: domain.time.width(),
                width_f: domain.frequency.width(),
                num_t: domain.num_t,
                num_f: domain.num_f,
            },
            options,
        }
    }

    pub fn validate(&self) -> ViewerResult<()> {
        let transform = [
            self.zoom.time.scale,
            self.zoom.time.translate,
            self.zoom.frequency.scale,
            self.zoom.frequency.translate,
        ];
        if transform.iter().any(|value| !value.is_finite()) {
            return Err(ViewerError::InvalidData(
                "zoom transform must be finite".to_owned(),
            ));
        }
        let (min, max) = self.amplitude_window;
        if !min.is_finite() || !max.is_finite() || min > max {
            return Err(ViewerError::InvalidData(
                "amplitude window must be finite and ordered".to_owned(),
            ));
        }
        for tile in self.tiles {
            if tile.samples.len() != tile.width * tile.num_freqs {
                return Err(ViewerError::InvalidData(format!(
                    "tile {} holds {} samples, expected {}",
                    tile.index,
                    tile.samples.len(),
                    tile.width * tile.num_freqs
                )));
            }
        }
        Ok(())
    }
}
