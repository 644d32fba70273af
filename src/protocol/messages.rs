//! Canonical message schema (version 1).
//!
//! Frames are decoded by [`super::codec`] first; this module turns their
//! `content` into typed messages and builds outbound request frames.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::{ChannelId, RequestWindow};
use crate::error::{ViewerError, ViewerResult};

use super::codec::{DecodeError, Frame};

pub const PROTOCOL_SCHEMA_VERSION: u32 = 1;

pub const SPECTROGRAM: &str = "spectrogram";
pub const LOADING_PROGRESS: &str = "loading_progress";
pub const ERROR: &str = "error";
pub const INFORMATION: &str = "information";
pub const REQUEST_FILE_SPECTROGRAM: &str = "request_file_spectrogram";
pub const REQUEST_DATA_SPECTROGRAM: &str = "request_data_spectrogram";

fn default_schema_version() -> u32 {
    PROTOCOL_SCHEMA_VERSION
}

/// Declares the dimensions of a channel's next dataset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpectrogramDimensions {
    pub nblocks: usize,
    pub nfreqs: usize,
    /// Sampling rate of the source signal; the frequency domain is `[0, fs / 2]`.
    pub fs: f64,
    /// `[start, end]` in seconds.
    pub time_range: (f64, f64),
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel_id: Option<ChannelId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sequence: Option<u64>,
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
}

/// Announces a sample block for the dataset declared by the last `new`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpectrogramBlock {
    pub nblocks: usize,
    pub nfreqs: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel_id: Option<ChannelId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sequence: Option<u64>,
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum SpectrogramAction {
    /// Replaces the domain and tile layout; samples follow in `update`s.
    New(SpectrogramDimensions),
    /// Replaces sample contents; payload required.
    Update(SpectrogramBlock),
    /// `new` and `update` in one message; payload required.
    Render(SpectrogramDimensions),
}

impl SpectrogramAction {
    #[must_use]
    pub fn channel_id(&self) -> Option<ChannelId> {
        match self {
            Self::New(dims) | Self::Render(dims) => dims.channel_id,
            Self::Update(block) => block.channel_id,
        }
    }

    #[must_use]
    pub fn sequence(&self) -> Option<u64> {
        match self {
            Self::New(dims) | Self::Render(dims) => dims.sequence,
            Self::Update(block) => block.sequence,
        }
    }

    #[must_use]
    pub fn schema_version(&self) -> u32 {
        match self {
            Self::New(dims) | Self::Render(dims) => dims.schema_version,
            Self::Update(block) => block.schema_version,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadingProgress {
    pub progress: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel_id: Option<ChannelId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerError {
    pub error_msg: String,
}

/// Typed view of an inbound frame.
#[derive(Debug, Clone, PartialEq)]
pub enum InboundMessage {
    Spectrogram {
        action: SpectrogramAction,
        payload: Option<Vec<u8>>,
    },
    LoadingProgress(LoadingProgress),
    Error(ServerError),
    Information(Value),
    Unknown {
        kind: String,
    },
}

impl InboundMessage {
    pub fn from_frame(frame: Frame) -> Result<Self, DecodeError> {
        let Frame {
            kind,
            content,
            payload,
        } = frame;
        match kind.as_str() {
            SPECTROGRAM => Ok(Self::Spectrogram {
                action: typed_content(&kind, content)?,
                payload,
            }),
            LOADING_PROGRESS => Ok(Self::LoadingProgress(typed_content(&kind, content)?)),
            ERROR => Ok(Self::Error(typed_content(&kind, content)?)),
            INFORMATION => Ok(Self::Information(content)),
            _ => Ok(Self::Unknown { kind }),
        }
    }
}

fn typed_content<T: DeserializeOwned>(kind: &str, content: Value) -> Result<T, DecodeError> {
    serde_json::from_value(content).map_err(|e| DecodeError::InvalidContent {
        kind: kind.to_owned(),
        reason: e.to_string(),
    })
}

/// Kind of recording the compute service has to load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    #[default]
    Eeg,
    Audio,
}

impl DataType {
    /// `*.eeg` files are EEG recordings; everything else is treated as audio.
    #[must_use]
    pub fn from_file_name(name: &str) -> Self {
        match name.rsplit_once('.') {
            Some((_, "eeg")) => Self::Eeg,
            _ => Self::Audio,
        }
    }
}

/// Requested span: explicit `[start, end]` or a duration from the start.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RequestSpan {
    TimeRange((f64, f64)),
    Duration(f64),
}

impl From<RequestWindow> for RequestSpan {
    fn from(window: RequestWindow) -> Self {
        Self::TimeRange((window.start, window.end))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpectrogramRequestParams {
    pub nfft: u32,
    #[serde(flatten)]
    pub span: RequestSpan,
    pub overlap: f64,
    pub data_type: DataType,
}

impl SpectrogramRequestParams {
    pub const DEFAULT_OVERLAP: f64 = 0.5;

    #[must_use]
    pub fn new(nfft: u32, span: RequestSpan, data_type: DataType) -> Self {
        Self {
            nfft,
            span,
            overlap: Self::DEFAULT_OVERLAP,
            data_type,
        }
    }

    #[must_use]
    pub fn with_overlap(mut self, overlap: f64) -> Self {
        self.overlap = overlap;
        self
    }

    pub fn validate(self) -> ViewerResult<Self> {
        if self.nfft == 0 {
            return Err(ViewerError::InvalidData("nfft must be > 0".to_owned()));
        }
        if !self.overlap.is_finite() || !(0.0..1.0).contains(&self.overlap) {
            return Err(ViewerError::InvalidData(
                "overlap must be finite and in [0, 1)".to_owned(),
            ));
        }
        match self.span {
            RequestSpan::TimeRange((start, end)) => {
                if !start.is_finite() || !end.is_finite() || start > end {
                    return Err(ViewerError::InvalidData(
                        "request time range must be finite and ordered".to_owned(),
                    ));
                }
            }
            RequestSpan::Duration(duration) => {
                if !duration.is_finite() || duration <= 0.0 {
                    return Err(ViewerError::InvalidData(
                        "request duration must be finite and > 0".to_owned(),
                    ));
                }
            }
        }
        Ok(self)
    }
}

/// Asks the service to compute a spectrogram for a stored recording.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileSpectrogramRequest {
    pub identifier: String,
    #[serde(flatten)]
    pub params: SpectrogramRequestParams,
    pub channel: ChannelId,
    pub sequence: u64,
    pub schema_version: u32,
}

impl FileSpectrogramRequest {
    pub fn to_frame(&self) -> ViewerResult<Frame> {
        Ok(Frame::new(REQUEST_FILE_SPECTROGRAM, to_content(self)?))
    }
}

/// Asks the service to compute a spectrogram for uploaded file bytes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataSpectrogramRequest {
    #[serde(flatten)]
    pub params: SpectrogramRequestParams,
    pub sequence: u64,
    pub schema_version: u32,
}

impl DataSpectrogramRequest {
    pub fn to_frame(&self, file_bytes: Vec<u8>) -> ViewerResult<Frame> {
        Ok(Frame::new(REQUEST_DATA_SPECTROGRAM, to_content(self)?).with_payload(file_bytes))
    }
}

fn to_content<T: Serialize>(value: &T) -> ViewerResult<Value> {
    serde_json::to_value(value)
        .map_err(|e| ViewerError::InvalidData(format!("failed to serialize request: {e}")))
}
