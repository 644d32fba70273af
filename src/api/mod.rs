//! Orchestration facade: one [`SpectrogramViewer`] owns every channel's
//! extents and tiles, routes decoded frames and input events to them, and
//! coalesces redraws against the host's display tick.

mod channel_state;
mod dispatch;
mod interaction_controller;
mod invalidation;
mod json_contract;
mod request_controller;
mod viewer;
mod viewer_config;

pub use channel_state::{ChannelSnapshot, ChannelState};
pub use dispatch::DispatchOutcome;
pub use invalidation::{RedrawScheduler, RedrawTopic, RedrawTopics};
pub use json_contract::{
    VIEWER_SNAPSHOT_JSON_SCHEMA_V1, ViewerSnapshot, ViewerSnapshotJsonContractV1,
};
pub use viewer::SpectrogramViewer;
pub use viewer_config::{PlaceholderExtent, ViewerConfig};
