use tracing::debug;

use crate::core::{Axis, ChannelId, NormalizedPointer, ScaleLabels};
use crate::error::ViewerResult;
use crate::interaction::{CursorReadout, WheelInput, WheelMode, apply_wheel};
use crate::render::{DisplayOptions, RenderBackend};

use super::{RedrawTopic, SpectrogramViewer};

impl<R: RenderBackend> SpectrogramViewer<R> {
    /// Routes one wheel event to `channel` and requests a redraw.
    pub fn wheel(&mut self, channel: ChannelId, input: WheelInput) -> ViewerResult<WheelMode> {
        let tuning = self.config.wheel_tuning;
        let state = self.channel_mut(channel)?;
        let mode = apply_wheel(&mut state.viewport, input, &tuning)?;
        let topic = match mode {
            WheelMode::Amplitude => RedrawTopic::Amplitude,
            WheelMode::Zoom | WheelMode::Pan => RedrawTopic::Viewport,
        };
        self.request_redraw(channel, topic);
        Ok(mode)
    }

    /// Tracks the pointer and returns the readout under it.
    pub fn pointer_move(
        &mut self,
        channel: ChannelId,
        pointer: NormalizedPointer,
    ) -> ViewerResult<CursorReadout> {
        let state = self.channel_mut(channel)?;
        state.cursor.on_pointer_move(pointer)?;
        CursorReadout::at(&state.viewport, pointer)
    }

    pub fn pointer_leave(&mut self, channel: ChannelId) -> ViewerResult<()> {
        self.channel_mut(channel)?.cursor.on_pointer_leave();
        Ok(())
    }

    /// Readout text at the last pointer position, or `None` off-surface.
    pub fn cursor_label(&self, channel: ChannelId) -> ViewerResult<Option<String>> {
        let state = self.channel(channel)?;
        let readout = state.cursor.readout(&state.viewport)?;
        Ok(readout.map(|readout| {
            readout.label(&state.viewport, self.config.display.frequency_scale)
        }))
    }

    pub fn set_view_range(
        &mut self,
        channel: ChannelId,
        axis: Axis,
        start: f64,
        end: f64,
    ) -> ViewerResult<()> {
        self.channel_mut(channel)?
            .viewport
            .set_view_range(axis, start, end)?;
        let topic = if axis == Axis::Amplitude {
            RedrawTopic::Amplitude
        } else {
            RedrawTopic::Viewport
        };
        self.request_redraw(channel, topic);
        Ok(())
    }

    pub fn reset_view(&mut self, channel: ChannelId) -> ViewerResult<()> {
        self.channel_mut(channel)?.viewport.reset_view();
        self.request_redraw(channel, RedrawTopic::Viewport);
        Ok(())
    }

    #[must_use]
    pub fn display_options(&self) -> DisplayOptions {
        self.config.display
    }

    /// Applies new display options; every channel is redrawn.
    pub fn set_display_options(&mut self, options: DisplayOptions) {
        if self.config.display == options {
            return;
        }
        debug!(?options, "display options changed");
        self.config.display = options;
        self.request_redraw_all(RedrawTopic::Display);
    }

    pub fn scale_labels(&self, channel: ChannelId) -> ViewerResult<ScaleLabels> {
        let state = self.channel(channel)?;
        Ok(ScaleLabels::for_viewport(
            &state.viewport,
            self.config.display.frequency_scale,
        ))
    }
}
