use tracing::{debug, info, warn};

use crate::core::{ChannelId, ViewportModel};
use crate::error::{ViewerError, ViewerResult};
use crate::protocol::{
    Frame, InboundMessage, LoadingProgress, PROTOCOL_SCHEMA_VERSION, RawFrame, SpectrogramAction,
    SpectrogramDimensions, decode, payload_samples,
};
use crate::render::RenderBackend;

use super::SpectrogramViewer;

/// What the viewer did with one inbound frame.
#[derive(Debug, Clone, PartialEq)]
pub enum DispatchOutcome {
    /// A `new` replaced the channel's domain; `tiles` tiles await samples.
    DatasetDeclared { channel: ChannelId, tiles: usize },
    /// Samples were written into the channel's tiles.
    TilesUpdated { channel: ChannelId, tiles: usize },
    /// A dataset with no blocks was replaced by the single-cell placeholder.
    PlaceholderInstalled { channel: ChannelId },
    ProgressUpdated { channel: ChannelId, progress: f64 },
    ServerError { message: String },
    Information,
    /// The response answers a request older than the channel's latest one.
    StaleDropped {
        channel: ChannelId,
        sequence: u64,
        issued: u64,
    },
    /// The backend refused the new tiles. The channel fell back to the
    /// placeholder, or to no tiles when the placeholder was refused as well.
    UploadFailed { channel: ChannelId, reason: String },
    /// Unrecognized message type.
    Ignored { kind: String },
    /// The frame was malformed or could not be applied; state is unchanged.
    Rejected { reason: String },
}

impl<R: RenderBackend> SpectrogramViewer<R> {
    /// Decodes and applies one transport frame.
    ///
    /// Never fails: malformed or inapplicable frames are logged, dropped, and
    /// leave every channel as it was.
    pub fn handle_frame(&mut self, raw: RawFrame<'_>) -> DispatchOutcome {
        match decode(raw) {
            Ok(frame) => self.handle_decoded_frame(frame),
            Err(err) => {
                warn!(error = %err, "dropping malformed frame");
                DispatchOutcome::Rejected {
                    reason: err.to_string(),
                }
            }
        }
    }

    pub fn handle_decoded_frame(&mut self, frame: Frame) -> DispatchOutcome {
        let kind = frame.kind.clone();
        let outcome = InboundMessage::from_frame(frame)
            .map_err(ViewerError::from)
            .and_then(|message| self.dispatch(message));
        match outcome {
            Ok(outcome) => outcome,
            Err(err) => {
                warn!(kind = %kind, error = %err, "frame rejected, keeping previous state");
                DispatchOutcome::Rejected {
                    reason: err.to_string(),
                }
            }
        }
    }

    fn dispatch(&mut self, message: InboundMessage) -> ViewerResult<DispatchOutcome> {
        match message {
            InboundMessage::Spectrogram { action, payload } => {
                self.apply_spectrogram(action, payload.as_deref())
            }
            InboundMessage::LoadingProgress(progress) => self.apply_progress(progress),
            InboundMessage::Error(error) => {
                warn!(message = %error.error_msg, "compute service reported an error");
                Ok(DispatchOutcome::ServerError {
                    message: error.error_msg,
                })
            }
            InboundMessage::Information(content) => {
                info!(%content, "compute service information");
                Ok(DispatchOutcome::Information)
            }
            InboundMessage::Unknown { kind } => {
                debug!(kind = %kind, "ignoring unknown message type");
                Ok(DispatchOutcome::Ignored { kind })
            }
        }
    }

    fn apply_spectrogram(
        &mut self,
        action: SpectrogramAction,
        payload: Option<&[u8]>,
    ) -> ViewerResult<DispatchOutcome> {
        let schema_version = action.schema_version();
        if schema_version != PROTOCOL_SCHEMA_VERSION {
            return Err(ViewerError::InvalidData(format!(
                "unsupported spectrogram schema version {schema_version}"
            )));
        }

        let channel = action
            .channel_id()
            .unwrap_or_else(|| self.default_channel());
        let state = self.channel(channel)?;
        if state.is_stale(action.sequence()) {
            let sequence = action.sequence().unwrap_or_default();
            let issued = state.issued_sequence();
            debug!(%channel, sequence, issued, "dropping stale spectrogram response");
            return Ok(DispatchOutcome::StaleDropped {
                channel,
                sequence,
                issued,
            });
        }

        match action {
            SpectrogramAction::New(dims) => self.declare_dataset(channel, &dims, None),
            SpectrogramAction::Update(block) => {
                self.apply_samples(channel, block.nblocks, block.nfreqs, payload)
            }
            SpectrogramAction::Render(dims) => {
                if dims.nblocks == 0 {
                    return self.declare_dataset(channel, &dims, None);
                }
                let samples = decode_samples(dims.nblocks, dims.nfreqs, payload)?;
                self.declare_dataset(channel, &dims, Some(&samples))
            }
        }
    }

    /// Replaces a channel's domain and tiles.
    ///
    /// Everything that can fail (extent validation, budget, sample count) is
    /// checked before the channel is touched. A `new` only records the layout;
    /// tile buffers are allocated from the samples of the following `update`.
    fn declare_dataset(
        &mut self,
        channel: ChannelId,
        dims: &SpectrogramDimensions,
        samples: Option<&[f32]>,
    ) -> ViewerResult<DispatchOutcome> {
        if dims.nblocks == 0 {
            debug!(%channel, "dataset has no blocks, installing placeholder");
            return Ok(self.placeholder_outcome(channel));
        }
        if !dims.fs.is_finite() || dims.fs <= 0.0 {
            return Err(ViewerError::InvalidData(
                "sampling rate must be finite and > 0".to_owned(),
            ));
        }

        let (time_start, time_end) = dims.time_range;
        let viewport = ViewportModel::new(
            time_start,
            time_end,
            dims.fs / 2.0,
            dims.nblocks,
            dims.nfreqs,
            self.config.amplitude_window,
            self.config.amplitude_limit,
        )?;

        let state = self.channel_mut(channel)?;
        let tiles = match samples {
            Some(samples) => state.tiles.rebuild(samples, dims.nblocks, dims.nfreqs)?.len(),
            None => state.tiles.declare(dims.nblocks, dims.nfreqs)?,
        };
        state.viewport = viewport;
        if samples.is_some() {
            state.progress = 1.0;
        }
        if let Err(err) = self.publish_tiles(channel) {
            return Ok(upload_failed(channel, &err));
        }
        debug!(
            %channel,
            nblocks = dims.nblocks,
            nfreqs = dims.nfreqs,
            fs = dims.fs,
            tiles,
            "declared dataset"
        );

        Ok(if samples.is_some() {
            DispatchOutcome::TilesUpdated { channel, tiles }
        } else {
            DispatchOutcome::DatasetDeclared { channel, tiles }
        })
    }

    /// Writes a sample block into the channel's declared domain.
    fn apply_samples(
        &mut self,
        channel: ChannelId,
        nblocks: usize,
        nfreqs: usize,
        payload: Option<&[u8]>,
    ) -> ViewerResult<DispatchOutcome> {
        if nblocks == 0 {
            decode_samples(nblocks, nfreqs, payload)?;
            debug!(%channel, "update has no blocks, installing placeholder");
            return Ok(self.placeholder_outcome(channel));
        }

        let domain = self.channel(channel)?.viewport().domain();
        let declared = (domain.num_t, domain.num_f);
        if declared != (nblocks, nfreqs) {
            return Err(ViewerError::InvalidData(format!(
                "update of {nblocks}x{nfreqs} does not match the declared {}x{} dataset",
                declared.0, declared.1
            )));
        }
        let samples = decode_samples(nblocks, nfreqs, payload)?;

        let state = self.channel_mut(channel)?;
        let tiles = state.tiles.refill(&samples, nblocks, nfreqs)?.len();
        state.progress = 1.0;
        if let Err(err) = self.publish_tiles(channel) {
            return Ok(upload_failed(channel, &err));
        }
        debug!(%channel, nblocks, nfreqs, tiles, "updated tile samples");
        Ok(DispatchOutcome::TilesUpdated { channel, tiles })
    }

    fn placeholder_outcome(&mut self, channel: ChannelId) -> DispatchOutcome {
        match self.install_placeholder(channel) {
            Ok(()) => DispatchOutcome::PlaceholderInstalled { channel },
            Err(err) => upload_failed(channel, &err),
        }
    }

    fn apply_progress(&mut self, progress: LoadingProgress) -> ViewerResult<DispatchOutcome> {
        let channel = progress
            .channel_id
            .unwrap_or_else(|| self.default_channel());
        let state = self.channel_mut(channel)?;
        state.set_progress(progress.progress)?;
        Ok(DispatchOutcome::ProgressUpdated {
            channel,
            progress: state.progress,
        })
    }
}

fn upload_failed(channel: ChannelId, err: &ViewerError) -> DispatchOutcome {
    DispatchOutcome::UploadFailed {
        channel,
        reason: err.to_string(),
    }
}

fn sample_count(nblocks: usize, nfreqs: usize) -> ViewerResult<usize> {
    nblocks
        .checked_mul(nfreqs)
        .ok_or_else(|| ViewerError::InvalidData("matrix dimensions overflow usize".to_owned()))
}

fn decode_samples(nblocks: usize, nfreqs: usize, payload: Option<&[u8]>) -> ViewerResult<Vec<f32>> {
    let payload = payload.ok_or_else(|| {
        ViewerError::InvalidData("spectrogram samples require a binary payload".to_owned())
    })?;
    let samples = payload_samples(payload)?;
    let expected = sample_count(nblocks, nfreqs)?;
    if samples.len() != expected {
        return Err(ViewerError::InvalidData(format!(
            "payload holds {} samples, expected {expected} for {nblocks}x{nfreqs}",
            samples.len()
        )));
    }
    Ok(samples)
}
