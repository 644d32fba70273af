//! Partitioning of a time x frequency matrix into fixed-capacity tiles.
//!
//! Source samples arrive frequency-major (`freq * num_columns + column`).
//! Each tile stores its columns as `local_column + width * freq`, i.e. one
//! contiguous row of `width` samples per frequency bin, which is the layout
//! the rendering backend uploads as a `width x num_freqs` image.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::{debug, trace};

#[cfg(feature = "parallel-tiles")]
use rayon::prelude::*;

use crate::error::{ViewerError, ViewerResult};

/// Limits imposed by the rendering backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileBudget {
    /// Maximum number of time columns one tile may hold.
    pub capacity: usize,
    /// Maximum number of tiles that may be resident at once.
    pub max_tiles: usize,
}

impl TileBudget {
    #[must_use]
    pub fn new(capacity: usize, max_tiles: usize) -> Self {
        Self {
            capacity,
            max_tiles,
        }
    }

    pub fn validate(self) -> ViewerResult<Self> {
        if self.capacity == 0 || self.max_tiles == 0 {
            return Err(ViewerError::InvalidData(
                "tile capacity and max tile count must be > 0".to_owned(),
            ));
        }
        Ok(self)
    }

    /// Number of tiles needed for `num_columns`, failing when over budget.
    pub fn check(self, num_columns: usize) -> ViewerResult<usize> {
        let required = tile_count(num_columns, self.capacity)?;
        if required > self.max_tiles {
            return Err(ViewerError::TileBudgetExceeded {
                required,
                available: self.max_tiles,
            });
        }
        Ok(required)
    }
}

/// Column range covered by one tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileSpan {
    pub index: usize,
    pub start_column: usize,
    pub width: usize,
}

pub fn tile_count(num_columns: usize, capacity: usize) -> ViewerResult<usize> {
    if capacity == 0 {
        return Err(ViewerError::InvalidData(
            "tile capacity must be > 0".to_owned(),
        ));
    }
    Ok(num_columns.div_ceil(capacity))
}

/// Splits `[0, num_columns)` into contiguous spans of `capacity` columns;
/// only the last span may be narrower.
pub fn plan_tiles(num_columns: usize, capacity: usize) -> ViewerResult<Vec<TileSpan>> {
    let count = tile_count(num_columns, capacity)?;
    Ok((0..count)
        .map(|index| {
            let start_column = index * capacity;
            TileSpan {
                index,
                start_column,
                width: capacity.min(num_columns - start_column),
            }
        })
        .collect())
}

/// One chunk of the time axis, laid out for upload.
#[derive(Debug, Clone, PartialEq)]
pub struct Tile {
    pub index: usize,
    pub start_column: usize,
    pub width: usize,
    pub num_freqs: usize,
    /// `width * num_freqs` samples, row `freq` at `[freq * width, (freq + 1) * width)`.
    pub samples: Vec<f32>,
    /// Horizontal extent of the tile's quad in clip space (`[-1, 1]`).
    pub clip_span: (f32, f32),
}

impl Tile {
    #[must_use]
    pub fn sample(&self, local_column: usize, freq: usize) -> Option<f32> {
        if local_column >= self.width || freq >= self.num_freqs {
            return None;
        }
        self.samples.get(local_column + self.width * freq).copied()
    }

    fn build(samples: &[f32], num_columns: usize, num_freqs: usize, span: TileSpan) -> Self {
        let mut tile_samples = vec![0.0; span.width * num_freqs];
        copy_span_rows(samples, num_columns, span, &mut tile_samples);
        Self {
            index: span.index,
            start_column: span.start_column,
            width: span.width,
            num_freqs,
            samples: tile_samples,
            clip_span: clip_span(span, num_columns),
        }
    }
}

fn copy_span_rows(samples: &[f32], num_columns: usize, span: TileSpan, out: &mut [f32]) {
    if span.width == 0 {
        return;
    }
    for (freq, row) in out.chunks_exact_mut(span.width).enumerate() {
        let start = freq * num_columns + span.start_column;
        row.copy_from_slice(&samples[start..start + span.width]);
    }
}

fn clip_span(span: TileSpan, num_columns: usize) -> (f32, f32) {
    if num_columns == 0 {
        return (-1.0, 1.0);
    }
    let total = num_columns as f64;
    let min_x = span.start_column as f64 / total;
    let max_x = ((span.start_column + span.width) as f64 / total).min(1.0);
    ((min_x * 2.0 - 1.0) as f32, (max_x * 2.0 - 1.0) as f32)
}

/// Tiles covering one channel's dataset.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TileSet {
    tiles: SmallVec<[Tile; 4]>,
    num_columns: usize,
    num_freqs: usize,
}

impl TileSet {
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Single 1x1 zero-valued tile shown while a channel has no data.
    #[must_use]
    pub fn placeholder() -> Self {
        let span = TileSpan {
            index: 0,
            start_column: 0,
            width: 1,
        };
        let mut tiles = SmallVec::new();
        tiles.push(Tile::build(&[0.0], 1, 1, span));
        Self {
            tiles,
            num_columns: 1,
            num_freqs: 1,
        }
    }

    /// Layout of a declared dataset whose samples have not arrived yet.
    ///
    /// Holds no tile buffers; the first matching sample block partitions it.
    #[must_use]
    pub fn declared(num_columns: usize, num_freqs: usize) -> Self {
        Self {
            tiles: SmallVec::new(),
            num_columns,
            num_freqs,
        }
    }

    /// Partitions a frequency-major `num_columns x num_freqs` matrix.
    pub fn partition(
        samples: &[f32],
        num_columns: usize,
        num_freqs: usize,
        budget: TileBudget,
    ) -> ViewerResult<Self> {
        validate_sample_count(samples, num_columns, num_freqs)?;
        budget.check(num_columns)?;
        let spans = plan_tiles(num_columns, budget.capacity)?;

        #[cfg(feature = "parallel-tiles")]
        let tiles: SmallVec<[Tile; 4]> = SmallVec::from_vec(
            spans
                .par_iter()
                .map(|span| Tile::build(samples, num_columns, num_freqs, *span))
                .collect(),
        );

        #[cfg(not(feature = "parallel-tiles"))]
        let tiles: SmallVec<[Tile; 4]> = spans
            .iter()
            .map(|span| Tile::build(samples, num_columns, num_freqs, *span))
            .collect();

        Ok(Self {
            tiles,
            num_columns,
            num_freqs,
        })
    }

    #[must_use]
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    #[must_use]
    pub fn num_columns(&self) -> usize {
        self.num_columns
    }

    #[must_use]
    pub fn num_freqs(&self) -> usize {
        self.num_freqs
    }

    #[must_use]
    pub fn widths(&self) -> Vec<usize> {
        self.tiles.iter().map(|tile| tile.width).collect()
    }

    /// Sample at absolute `(column, freq)`, looked up through the tiles.
    #[must_use]
    pub fn sample(&self, column: usize, freq: usize) -> Option<f32> {
        let tile = self
            .tiles
            .iter()
            .find(|tile| (tile.start_column..tile.start_column + tile.width).contains(&column))?;
        tile.sample(column - tile.start_column, freq)
    }

    fn has_layout(&self, num_columns: usize, num_freqs: usize) -> bool {
        !self.tiles.is_empty() && self.num_columns == num_columns && self.num_freqs == num_freqs
    }
}

fn validate_sample_count(samples: &[f32], num_columns: usize, num_freqs: usize) -> ViewerResult<()> {
    let expected = num_columns.checked_mul(num_freqs).ok_or_else(|| {
        ViewerError::InvalidData("matrix dimensions overflow usize".to_owned())
    })?;
    if samples.len() != expected {
        return Err(ViewerError::InvalidData(format!(
            "expected {expected} samples for {num_columns}x{num_freqs}, got {}",
            samples.len()
        )));
    }
    Ok(())
}

/// Owns one channel's tile set under a fixed backend budget.
#[derive(Debug, Clone, PartialEq)]
pub struct TileManager {
    budget: TileBudget,
    tiles: TileSet,
}

impl TileManager {
    pub fn new(budget: TileBudget) -> ViewerResult<Self> {
        Ok(Self {
            budget: budget.validate()?,
            tiles: TileSet::empty(),
        })
    }

    #[must_use]
    pub fn budget(&self) -> TileBudget {
        self.budget
    }

    #[must_use]
    pub fn tiles(&self) -> &TileSet {
        &self.tiles
    }

    /// Replaces the tile set with a fresh partition of `samples`.
    ///
    /// Validation and the budget check run before anything is touched, so a
    /// failed rebuild leaves the previous tiles in place. On success the old
    /// tiles are dropped before the new buffers are allocated.
    pub fn rebuild(
        &mut self,
        samples: &[f32],
        num_columns: usize,
        num_freqs: usize,
    ) -> ViewerResult<&TileSet> {
        validate_sample_count(samples, num_columns, num_freqs)?;
        let required = self.budget.check(num_columns)?;

        self.tiles = TileSet::empty();
        self.tiles = TileSet::partition(samples, num_columns, num_freqs, self.budget)?;
        debug!(
            num_columns,
            num_freqs,
            tiles = required,
            capacity = self.budget.capacity,
            "rebuilt tile set"
        );
        Ok(&self.tiles)
    }

    /// Records a dataset layout without allocating sample buffers.
    ///
    /// Returns the number of tiles the dataset will occupy. Over-budget layouts
    /// are refused and the previous tiles stay in place.
    pub fn declare(&mut self, num_columns: usize, num_freqs: usize) -> ViewerResult<usize> {
        let required = self.budget.check(num_columns)?;
        self.tiles = TileSet::declared(num_columns, num_freqs);
        debug!(num_columns, num_freqs, tiles = required, "declared tile layout");
        Ok(required)
    }

    /// Writes a new sample block, reusing tile buffers when the layout matches.
    pub fn refill(
        &mut self,
        samples: &[f32],
        num_columns: usize,
        num_freqs: usize,
    ) -> ViewerResult<&TileSet> {
        if !self.tiles.has_layout(num_columns, num_freqs) {
            return self.rebuild(samples, num_columns, num_freqs);
        }
        validate_sample_count(samples, num_columns, num_freqs)?;
        for tile in &mut self.tiles.tiles {
            let span = TileSpan {
                index: tile.index,
                start_column: tile.start_column,
                width: tile.width,
            };
            copy_span_rows(samples, num_columns, span, &mut tile.samples);
        }
        trace!(num_columns, num_freqs, "refilled tile set in place");
        Ok(&self.tiles)
    }

    pub fn install_placeholder(&mut self) {
        self.tiles = TileSet::placeholder();
    }

    pub fn clear(&mut self) {
        self.tiles = TileSet::empty();
    }
}
