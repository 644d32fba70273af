use indexmap::IndexMap;
use tracing::{debug, warn};

use crate::core::ChannelId;
use crate::error::{ViewerError, ViewerResult};
use crate::render::RenderBackend;

use super::{ChannelState, RedrawScheduler, RedrawTopic, ViewerConfig};

/// Orchestrates decoding, tiling, interaction, and redraw scheduling for a
/// fixed set of channels sharing one rendering backend.
///
/// All entry points run to completion on the caller's thread; the host feeds
/// transport frames, input events, and display ticks in any order.
pub struct SpectrogramViewer<R: RenderBackend> {
    pub(crate) renderer: R,
    pub(crate) config: ViewerConfig,
    pub(crate) channels: IndexMap<ChannelId, ChannelState>,
    pub(crate) redraw: RedrawScheduler,
}

impl<R: RenderBackend> SpectrogramViewer<R> {
    /// Builds the viewer with every configured channel showing a placeholder.
    pub fn new(renderer: R, config: ViewerConfig) -> ViewerResult<Self> {
        config.validate()?;
        let budget = renderer.tile_budget().validate()?;

        let mut channels = IndexMap::with_capacity(config.channels.len());
        for &channel in &config.channels {
            channels.insert(channel, ChannelState::placeholder(&config, budget)?);
        }

        let mut viewer = Self {
            renderer,
            config,
            channels,
            redraw: RedrawScheduler::default(),
        };
        for channel in viewer.config.channels.clone() {
            viewer.upload_channel_tiles(channel)?;
            viewer.request_redraw(channel, RedrawTopic::Tiles);
        }
        debug!(
            channels = viewer.channels.len(),
            capacity = budget.capacity,
            max_tiles = budget.max_tiles,
            "spectrogram viewer initialized"
        );
        Ok(viewer)
    }

    #[must_use]
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    #[must_use]
    pub fn into_renderer(self) -> R {
        self.renderer
    }

    #[must_use]
    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    /// Channel addressed by messages that carry no channel id.
    #[must_use]
    pub fn default_channel(&self) -> ChannelId {
        self.config
            .channels
            .first()
            .copied()
            .unwrap_or(ChannelId::LeftLateral)
    }

    pub fn channel_ids(&self) -> impl Iterator<Item = ChannelId> + '_ {
        self.channels.keys().copied()
    }

    pub fn channel(&self, channel: ChannelId) -> ViewerResult<&ChannelState> {
        self.channels
            .get(&channel)
            .ok_or_else(|| ViewerError::UnknownChannel(channel.to_string()))
    }

    pub(crate) fn channel_mut(&mut self, channel: ChannelId) -> ViewerResult<&mut ChannelState> {
        self.channels
            .get_mut(&channel)
            .ok_or_else(|| ViewerError::UnknownChannel(channel.to_string()))
    }

    /// Swaps the backend's copy of `channel`'s tiles for the current set.
    pub(crate) fn upload_channel_tiles(&mut self, channel: ChannelId) -> ViewerResult<()> {
        let state = self
            .channels
            .get(&channel)
            .ok_or_else(|| ViewerError::UnknownChannel(channel.to_string()))?;
        self.renderer.release_tiles(channel);
        self.renderer.upload_tiles(channel, state.tiles())
    }

    /// Uploads `channel`'s current tiles and schedules a redraw.
    ///
    /// When the backend refuses them the channel falls back to the placeholder,
    /// or to no tiles at all if that upload fails too, and the first error
    /// is returned. Either way channel state and backend residency agree.
    pub(crate) fn publish_tiles(&mut self, channel: ChannelId) -> ViewerResult<()> {
        let uploaded = self.upload_channel_tiles(channel);
        self.request_redraw(channel, RedrawTopic::Tiles);
        let Err(err) = uploaded else {
            return Ok(());
        };

        warn!(%channel, error = %err, "tile upload failed, falling back to placeholder");
        let state = self
            .channels
            .get_mut(&channel)
            .ok_or_else(|| ViewerError::UnknownChannel(channel.to_string()))?;
        state.install_placeholder(&self.config)?;
        if let Err(fallback) = self.upload_channel_tiles(channel) {
            warn!(%channel, error = %fallback, "placeholder upload failed, channel has no tiles");
            self.renderer.release_tiles(channel);
            self.channel_mut(channel)?.tiles.clear();
        }
        Err(err)
    }

    pub(crate) fn install_placeholder(&mut self, channel: ChannelId) -> ViewerResult<()> {
        let state = self
            .channels
            .get_mut(&channel)
            .ok_or_else(|| ViewerError::UnknownChannel(channel.to_string()))?;
        state.install_placeholder(&self.config)?;
        self.publish_tiles(channel)
    }
}
