use serde::{Deserialize, Serialize};

use crate::core::ViewportModel;
use crate::error::{ViewerError, ViewerResult};
use crate::interaction::CursorState;
use crate::tiles::{TileBudget, TileManager, TileSet};

use super::ViewerConfig;

/// Everything one channel owns: extents, tiles, request bookkeeping.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelState {
    pub(crate) viewport: ViewportModel,
    pub(crate) tiles: TileManager,
    pub(crate) progress: f64,
    pub(crate) issued_sequence: u64,
    pub(crate) cursor: CursorState,
}

impl ChannelState {
    pub(crate) fn placeholder(config: &ViewerConfig, budget: TileBudget) -> ViewerResult<Self> {
        let mut tiles = TileManager::new(budget)?;
        tiles.install_placeholder();
        Ok(Self {
            viewport: placeholder_viewport(config)?,
            tiles,
            progress: 0.0,
            issued_sequence: 0,
            cursor: CursorState::default(),
        })
    }

    #[must_use]
    pub fn viewport(&self) -> &ViewportModel {
        &self.viewport
    }

    #[must_use]
    pub fn tiles(&self) -> &TileSet {
        self.tiles.tiles()
    }

    #[must_use]
    pub fn progress(&self) -> f64 {
        self.progress
    }

    /// The indicator is hidden before loading starts and once it completes.
    #[must_use]
    pub fn progress_visible(&self) -> bool {
        self.progress > 0.0 && self.progress < 1.0
    }

    /// Sequence number of the most recent request sent for this channel.
    #[must_use]
    pub fn issued_sequence(&self) -> u64 {
        self.issued_sequence
    }

    #[must_use]
    pub fn cursor(&self) -> CursorState {
        self.cursor
    }

    pub(crate) fn issue_sequence(&mut self) -> u64 {
        self.issued_sequence += 1;
        self.progress = 0.0;
        self.issued_sequence
    }

    /// A response is stale when it answers a request older than the latest one.
    pub(crate) fn is_stale(&self, sequence: Option<u64>) -> bool {
        sequence.is_some_and(|sequence| sequence < self.issued_sequence)
    }

    pub(crate) fn set_progress(&mut self, progress: f64) -> ViewerResult<()> {
        if !progress.is_finite() {
            return Err(ViewerError::InvalidData(
                "loading progress must be finite".to_owned(),
            ));
        }
        self.progress = progress.clamp(0.0, 1.0);
        Ok(())
    }

    pub(crate) fn install_placeholder(&mut self, config: &ViewerConfig) -> ViewerResult<()> {
        self.viewport = placeholder_viewport(config)?;
        self.tiles.install_placeholder();
        Ok(())
    }
}

fn placeholder_viewport(config: &ViewerConfig) -> ViewerResult<ViewportModel> {
    let (start, end) = config.placeholder.time_range;
    ViewportModel::new(
        start,
        end,
        config.placeholder.sample_rate / 2.0,
        1,
        1,
        config.amplitude_window,
        config.amplitude_limit,
    )
}

/// Serializable per-channel state used by snapshots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelSnapshot {
    pub viewport: ViewportModel,
    pub tile_widths: Vec<usize>,
    pub num_freqs: usize,
    pub progress: f64,
    pub issued_sequence: u64,
}

impl From<&ChannelState> for ChannelSnapshot {
    fn from(state: &ChannelState) -> Self {
        Self {
            viewport: state.viewport,
            tile_widths: state.tiles().widths(),
            num_freqs: state.tiles().num_freqs(),
            progress: state.progress,
            issued_sequence: state.issued_sequence,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ChannelState;
    use crate::api::ViewerConfig;
    use crate::tiles::{TileBudget, TileSet};

    fn state() -> ChannelState {
        ChannelState::placeholder(&ViewerConfig::default(), TileBudget::new(16, 4))
            .expect("state")
    }

    #[test]
    fn placeholder_covers_configured_extent() {
        let state = state();
        assert_eq!(state.tiles(), &TileSet::placeholder());
        assert_eq!(state.viewport().domain().frequency.max, 100.0);
        assert_eq!(state.viewport().domain().time.max, 1.0);
    }

    #[test]
    fn progress_is_clamped_and_hidden_at_bounds() {
        let mut state = state();
        state.set_progress(0.4).expect("progress");
        assert!(state.progress_visible());
        state.set_progress(3.0).expect("progress");
        assert_eq!(state.progress(), 1.0);
        assert!(!state.progress_visible());
        assert!(state.set_progress(f64::NAN).is_err());
    }

    #[test]
    fn only_older_sequences_are_stale() {
        let mut state = state();
        assert!(!state.is_stale(Some(0)));
        state.issue_sequence();
        state.issue_sequence();
        assert!(state.is_stale(Some(1)));
        assert!(!state.is_stale(Some(2)));
        assert!(!state.is_stale(None));
    }
}
