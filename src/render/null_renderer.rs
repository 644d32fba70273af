use indexmap::IndexMap;

use crate::core::ChannelId;
use crate::error::{ViewerError, ViewerResult};
use crate::render::{RenderBackend, RenderFrame};
use crate::tiles::{TileBudget, TileSet};

/// Headless backend used by tests and by hosts that only need the data model.
///
/// It still enforces the resource contract (a channel's old tiles must be
/// released before new ones are uploaded) and validates every frame.
#[derive(Debug)]
pub struct NullRenderer {
    budget: TileBudget,
    resident: IndexMap<ChannelId, usize>,
    pub draw_count: usize,
    pub upload_count: usize,
    pub last_drawn: Option<ChannelId>,
    pub last_tile_count: usize,
}

impl NullRenderer {
    #[must_use]
    pub fn new(budget: TileBudget) -> Self {
        Self {
            budget,
            resident: IndexMap::new(),
            draw_count: 0,
            upload_count: 0,
            last_drawn: None,
            last_tile_count: 0,
        }
    }

    /// Tiles currently uploaded for `channel`.
    #[must_use]
    pub fn resident_tiles(&self, channel: ChannelId) -> usize {
        self.resident.get(&channel).copied().unwrap_or(0)
    }
}

impl Default for NullRenderer {
    /// Limits of a typical WebGL-class device: 4096-wide textures, 16 units.
    fn default() -> Self {
        Self::new(TileBudget::new(4096, 16))
    }
}

impl RenderBackend for NullRenderer {
    fn tile_budget(&self) -> TileBudget {
        self.budget
    }

    fn release_tiles(&mut self, channel: ChannelId) {
        self.resident.shift_remove(&channel);
    }

    fn upload_tiles(&mut self, channel: ChannelId, tiles: &TileSet) -> ViewerResult<()> {
        if self.resident.contains_key(&channel) {
            return Err(ViewerError::Backend(format!(
                "channel {channel} uploaded tiles without releasing the previous set"
            )));
        }
        if tiles.len() > self.budget.max_tiles {
            return Err(ViewerError::TileBudgetExceeded {
                required: tiles.len(),
                available: self.budget.max_tiles,
            });
        }
        self.resident.insert(channel, tiles.len());
        self.upload_count += 1;
        Ok(())
    }

    fn draw(&mut self, frame: &RenderFrame<'_>) -> ViewerResult<()> {
        frame.validate()?;
        self.draw_count += 1;
        self.last_drawn = Some(frame.channel);
        self.last_tile_count = frame.tiles.len();
        Ok(())
    }
}
