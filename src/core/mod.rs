pub mod extent;
pub mod frequency_scale;
pub mod request_window;
pub mod types;
pub mod viewport;

pub use extent::{AxisRange, DomainExtent, ViewExtent};
pub use frequency_scale::{
    FrequencyScaleMapper, FrequencyScaleMode, ScaleLabels, format_frequency, format_time,
};
pub use request_window::RequestWindow;
pub use types::{Axis, ChannelId, NormalizedPointer};
pub use viewport::{AmplitudeWindow, AxisTransform, ViewportModel, ZoomTransform};
