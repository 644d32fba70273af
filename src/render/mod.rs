mod frame;
mod null_renderer;

pub use frame::{DisplayOptions, DomainSize, Interpolation, RenderFrame};
pub use null_renderer::NullRenderer;

use crate::core::ChannelId;
use crate::error::ViewerResult;
use crate::tiles::{TileBudget, TileSet};

/// Contract implemented by any rendering backend.
///
/// The viewer owns all domain state and hands the backend pure data: tile
/// buffers on upload, then a `RenderFrame` per draw. Backends own the bounded
/// GPU-side resources, so uploads for a channel are always preceded by a
/// release of that channel's previous tiles.
pub trait RenderBackend {
    /// Per-tile column capacity and maximum resident tile count.
    fn tile_budget(&self) -> TileBudget;

    fn release_tiles(&mut self, channel: ChannelId);

    fn upload_tiles(&mut self, channel: ChannelId, tiles: &TileSet) -> ViewerResult<()>;

    fn draw(&mut self, frame: &RenderFrame<'_>) -> ViewerResult<()>;
}
