use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::core::ChannelId;
use crate::error::{ViewerError, ViewerResult};
use crate::render::{DisplayOptions, RenderBackend};

use super::{ChannelSnapshot, SpectrogramViewer};

pub const VIEWER_SNAPSHOT_JSON_SCHEMA_V1: u32 = 1;

/// Serializable deterministic state snapshot used by regression tests and
/// debugging tooling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewerSnapshot {
    pub display: DisplayOptions,
    pub channels: IndexMap<ChannelId, ChannelSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewerSnapshotJsonContractV1 {
    pub schema_version: u32,
    pub snapshot: ViewerSnapshot,
}

impl ViewerSnapshot {
    pub fn to_json_contract_v1_pretty(&self) -> ViewerResult<String> {
        let payload = ViewerSnapshotJsonContractV1 {
            schema_version: VIEWER_SNAPSHOT_JSON_SCHEMA_V1,
            snapshot: self.clone(),
        };
        serde_json::to_string_pretty(&payload).map_err(|e| {
            ViewerError::InvalidData(format!("failed to serialize snapshot contract v1: {e}"))
        })
    }

    /// Accepts either a bare snapshot or a v1 contract envelope.
    pub fn from_json_compat_str(input: &str) -> ViewerResult<Self> {
        if let Ok(snapshot) = serde_json::from_str::<Self>(input) {
            return Ok(snapshot);
        }
        let payload: ViewerSnapshotJsonContractV1 = serde_json::from_str(input).map_err(|e| {
            ViewerError::InvalidData(format!("failed to parse snapshot json payload: {e}"))
        })?;
        if payload.schema_version != VIEWER_SNAPSHOT_JSON_SCHEMA_V1 {
            return Err(ViewerError::InvalidData(format!(
                "unsupported snapshot schema version: {}",
                payload.schema_version
            )));
        }
        Ok(payload.snapshot)
    }
}

impl<R: RenderBackend> SpectrogramViewer<R> {
    #[must_use]
    pub fn snapshot(&self) -> ViewerSnapshot {
        ViewerSnapshot {
            display: self.config.display,
            channels: self
                .channels
                .iter()
                .map(|(&channel, state)| (channel, ChannelSnapshot::from(state)))
                .collect(),
        }
    }
}
