use tracing::debug;

use crate::core::ChannelId;
use crate::error::{ViewerError, ViewerResult};
use crate::protocol::{
    DataSpectrogramRequest, EncodedFrame, FileSpectrogramRequest, PROTOCOL_SCHEMA_VERSION,
    SpectrogramRequestParams,
};
use crate::render::RenderBackend;

use super::SpectrogramViewer;

impl<R: RenderBackend> SpectrogramViewer<R> {
    /// Builds one `request_file_spectrogram` frame per configured channel.
    ///
    /// Each channel gets a fresh sequence number, so responses to earlier
    /// requests are dropped once they arrive, and its progress restarts at 0.
    pub fn request_file_spectrogram(
        &mut self,
        identifier: &str,
        params: SpectrogramRequestParams,
    ) -> ViewerResult<Vec<EncodedFrame>> {
        if identifier.is_empty() {
            return Err(ViewerError::InvalidData(
                "file identifier must not be empty".to_owned(),
            ));
        }
        let params = params.validate()?;

        let mut frames = Vec::with_capacity(self.channels.len());
        for (&channel, state) in &mut self.channels {
            let request = FileSpectrogramRequest {
                identifier: identifier.to_owned(),
                params,
                channel,
                sequence: state.issued_sequence + 1,
                schema_version: PROTOCOL_SCHEMA_VERSION,
            };
            frames.push(request.to_frame()?.encode()?);
            let sequence = state.issue_sequence();
            debug!(%channel, identifier, sequence, "requested file spectrogram");
        }
        Ok(frames)
    }

    /// Builds a `request_data_spectrogram` frame carrying raw file bytes.
    ///
    /// The service answers on the default channel, which is the one whose
    /// sequence advances.
    pub fn request_data_spectrogram(
        &mut self,
        params: SpectrogramRequestParams,
        file_bytes: Vec<u8>,
    ) -> ViewerResult<EncodedFrame> {
        let params = params.validate()?;
        let channel = self.default_channel();
        let state = self.channel_mut(channel)?;
        let request = DataSpectrogramRequest {
            params,
            sequence: state.issued_sequence + 1,
            schema_version: PROTOCOL_SCHEMA_VERSION,
        };
        let byte_len = file_bytes.len();
        let frame = request.to_frame(file_bytes)?.encode()?;
        let sequence = state.issue_sequence();
        debug!(%channel, sequence, byte_len, "requested data spectrogram");
        Ok(frame)
    }

    /// Latest issued sequence number for `channel`.
    pub fn issued_sequence(&self, channel: ChannelId) -> ViewerResult<u64> {
        Ok(self.channel(channel)?.issued_sequence())
    }
}
