//! spectro-view: data and view engine for tiled, zoomable spectrogram display.
//!
//! The crate owns everything between the transport and the GPU: decoding the
//! framed wire protocol, partitioning sample matrices into backend-sized tiles,
//! tracking per-channel domain/view extents, and turning wheel input into
//! clamped zoom, pan, and amplitude-window changes. Drawing itself happens
//! behind the [`render::RenderBackend`] trait.

pub mod api;
pub mod core;
pub mod error;
pub mod interaction;
pub mod protocol;
pub mod render;
pub mod telemetry;
pub mod tiles;

pub use api::{DispatchOutcome, SpectrogramViewer, ViewerConfig};
pub use error::{ViewerError, ViewerResult};
