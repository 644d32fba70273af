use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{trace, warn};

use crate::core::ChannelId;
use crate::error::{ViewerError, ViewerResult};
use crate::render::{RenderBackend, RenderFrame};

use super::SpectrogramViewer;

/// Reason a channel needs repainting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RedrawTopic {
    Tiles,
    Viewport,
    Amplitude,
    Display,
}

impl RedrawTopic {
    const fn bit(self) -> u8 {
        match self {
            Self::Tiles => 1 << 0,
            Self::Viewport => 1 << 1,
            Self::Amplitude => 1 << 2,
            Self::Display => 1 << 3,
        }
    }
}

/// Bitmask of redraw topics accumulated between ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct RedrawTopics {
    bits: u8,
}

impl RedrawTopics {
    #[must_use]
    pub const fn none() -> Self {
        Self { bits: 0 }
    }

    #[must_use]
    pub const fn from_topic(topic: RedrawTopic) -> Self {
        Self { bits: topic.bit() }
    }

    #[must_use]
    pub const fn with_topic(self, topic: RedrawTopic) -> Self {
        Self {
            bits: self.bits | topic.bit(),
        }
    }

    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self {
            bits: self.bits | other.bits,
        }
    }

    #[must_use]
    pub const fn contains_topic(self, topic: RedrawTopic) -> bool {
        (self.bits & topic.bit()) != 0
    }

    #[must_use]
    pub const fn is_none(self) -> bool {
        self.bits == 0
    }
}

/// Coalesces redraw requests so each channel is drawn at most once per tick.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RedrawScheduler {
    pending: IndexMap<ChannelId, RedrawTopics>,
}

impl RedrawScheduler {
    pub fn request(&mut self, channel: ChannelId, topic: RedrawTopic) {
        let topics = self.pending.entry(channel).or_default();
        *topics = topics.with_topic(topic);
    }

    #[must_use]
    pub fn pending(&self, channel: ChannelId) -> RedrawTopics {
        self.pending.get(&channel).copied().unwrap_or_default()
    }

    #[must_use]
    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Drains pending requests in first-request order.
    pub fn take(&mut self) -> Vec<(ChannelId, RedrawTopics)> {
        self.pending.drain(..).collect()
    }
}

impl<R: RenderBackend> SpectrogramViewer<R> {
    pub(crate) fn request_redraw(&mut self, channel: ChannelId, topic: RedrawTopic) {
        trace!(%channel, ?topic, "redraw requested");
        self.redraw.request(channel, topic);
    }

    pub(crate) fn request_redraw_all(&mut self, topic: RedrawTopic) {
        for channel in self.config.channels.clone() {
            self.request_redraw(channel, topic);
        }
    }

    #[must_use]
    pub fn pending_redraw(&self, channel: ChannelId) -> RedrawTopics {
        self.redraw.pending(channel)
    }

    #[must_use]
    pub fn has_pending_redraw(&self) -> bool {
        self.redraw.has_pending()
    }

    /// Display-refresh tick: draws every channel with a pending request once.
    ///
    /// Returns the number of channels drawn. Backend failures are logged and
    /// do not stop the remaining channels from drawing.
    pub fn on_tick(&mut self) -> usize {
        let mut drawn = 0;
        for (channel, topics) in self.redraw.take() {
            match self.draw_channel(channel) {
                Ok(()) => {
                    trace!(%channel, ?topics, "channel redrawn");
                    drawn += 1;
                }
                Err(err) => warn!(%channel, error = %err, "channel redraw failed"),
            }
        }
        drawn
    }

    fn draw_channel(&mut self, channel: ChannelId) -> ViewerResult<()> {
        let state = self
            .channels
            .get(&channel)
            .ok_or_else(|| ViewerError::UnknownChannel(channel.to_string()))?;
        let frame = RenderFrame::new(
            channel,
            state.viewport(),
            state.tiles().tiles(),
            self.config.display,
        );
        self.renderer.draw(&frame)
    }
}
