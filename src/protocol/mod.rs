//! Wire protocol between the viewer and the spectrogram compute service.

pub mod codec;
pub mod messages;

pub use codec::{
    DecodeError, EncodedFrame, Frame, RawFrame, alignment_padding, decode, encode,
    payload_samples, samples_payload,
};
pub use messages::{
    DataSpectrogramRequest, DataType, FileSpectrogramRequest, InboundMessage, LoadingProgress,
    PROTOCOL_SCHEMA_VERSION, RequestSpan, ServerError, SpectrogramAction, SpectrogramBlock,
    SpectrogramDimensions, SpectrogramRequestParams,
};
