//! Framed header+payload codec.
//!
//! Text frames carry only a JSON header `{"type": .., "content": ..}`.
//! Binary frames are laid out as:
//!
//! ```text
//! [0, 4)          i32 little-endian L: length of the header INCLUDING padding
//! [4, 4 + L)      UTF-8 JSON header, right-padded with spaces
//! [4 + L, end)    payload, starting on an 8-byte boundary
//! ```
//!
//! Padding spaces are JSON whitespace, so a decoder reads exactly `L` header
//! bytes and never has to recompute the alignment rule.

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::error::{ViewerError, ViewerResult};

pub const HEADER_PREFIX_LEN: usize = 4;
pub const PAYLOAD_ALIGNMENT: usize = 8;
const SAMPLE_BYTES: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("binary frame of {len} bytes is shorter than the header length prefix")]
    TruncatedPrefix { len: usize },

    #[error("negative header length {0}")]
    NegativeHeaderLength(i32),

    #[error("header length {declared} exceeds the {available} bytes after the prefix")]
    HeaderOutOfBounds { declared: usize, available: usize },

    #[error("header is not valid utf-8")]
    InvalidUtf8,

    #[error("header is not valid json: {0}")]
    InvalidJson(String),

    #[error("header is not a json object")]
    NotAnObject,

    #[error("header is missing the `{0}` field")]
    MissingField(&'static str),

    #[error("payload of {len} bytes is not a whole number of f32 samples")]
    MisalignedPayload { len: usize },

    #[error("`{kind}` content is invalid: {reason}")]
    InvalidContent { kind: String, reason: String },
}

/// One complete protocol message.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub kind: String,
    pub content: Value,
    /// Present exactly when the frame arrived with binary framing.
    pub payload: Option<Vec<u8>>,
}

impl Frame {
    #[must_use]
    pub fn new(kind: impl Into<String>, content: Value) -> Self {
        Self {
            kind: kind.into(),
            content,
            payload: None,
        }
    }

    #[must_use]
    pub fn with_payload(mut self, payload: Vec<u8>) -> Self {
        self.payload = Some(payload);
        self
    }

    pub fn encode(&self) -> ViewerResult<EncodedFrame> {
        encode(&self.kind, &self.content, self.payload.as_deref())
    }
}

/// Frame as delivered by the transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawFrame<'a> {
    Text(&'a str),
    Binary(&'a [u8]),
}

/// Frame ready to hand to the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EncodedFrame {
    Text(String),
    Binary(Vec<u8>),
}

impl EncodedFrame {
    #[must_use]
    pub fn as_raw(&self) -> RawFrame<'_> {
        match self {
            Self::Text(text) => RawFrame::Text(text),
            Self::Binary(bytes) => RawFrame::Binary(bytes),
        }
    }
}

#[derive(Serialize)]
struct Header<'a> {
    #[serde(rename = "type")]
    kind: &'a str,
    content: &'a Value,
}

/// Number of spaces appended to a header of `header_len` bytes so the payload
/// starts 8-byte aligned.
#[must_use]
pub fn alignment_padding(header_len: usize) -> usize {
    (PAYLOAD_ALIGNMENT - (HEADER_PREFIX_LEN + header_len) % PAYLOAD_ALIGNMENT) % PAYLOAD_ALIGNMENT
}

pub fn encode(kind: &str, content: &Value, payload: Option<&[u8]>) -> ViewerResult<EncodedFrame> {
    let header = serde_json::to_string(&Header { kind, content })
        .map_err(|e| ViewerError::InvalidData(format!("failed to serialize header: {e}")))?;

    let Some(payload) = payload else {
        return Ok(EncodedFrame::Text(header));
    };

    let padded_len = header.len() + alignment_padding(header.len());
    let prefix = i32::try_from(padded_len).map_err(|_| {
        ViewerError::InvalidData(format!("header of {padded_len} bytes exceeds i32 range"))
    })?;

    let mut bytes = Vec::with_capacity(HEADER_PREFIX_LEN + padded_len + payload.len());
    bytes.extend_from_slice(&prefix.to_le_bytes());
    bytes.extend_from_slice(header.as_bytes());
    bytes.resize(HEADER_PREFIX_LEN + padded_len, b' ');
    bytes.extend_from_slice(payload);
    Ok(EncodedFrame::Binary(bytes))
}

pub fn decode(raw: RawFrame<'_>) -> Result<Frame, DecodeError> {
    match raw {
        RawFrame::Text(text) => {
            let (kind, content) = parse_header(text)?;
            Ok(Frame {
                kind,
                content,
                payload: None,
            })
        }
        RawFrame::Binary(bytes) => {
            let Some(prefix) = bytes.first_chunk::<HEADER_PREFIX_LEN>() else {
                return Err(DecodeError::TruncatedPrefix { len: bytes.len() });
            };
            let declared = i32::from_le_bytes(*prefix);
            let declared =
                usize::try_from(declared).map_err(|_| DecodeError::NegativeHeaderLength(declared))?;

            let available = bytes.len() - HEADER_PREFIX_LEN;
            if declared > available {
                return Err(DecodeError::HeaderOutOfBounds {
                    declared,
                    available,
                });
            }

            let header_end = HEADER_PREFIX_LEN + declared;
            let header = std::str::from_utf8(&bytes[HEADER_PREFIX_LEN..header_end])
                .map_err(|_| DecodeError::InvalidUtf8)?;
            let (kind, content) = parse_header(header)?;
            Ok(Frame {
                kind,
                content,
                payload: Some(bytes[header_end..].to_vec()),
            })
        }
    }
}

fn parse_header(text: &str) -> Result<(String, Value), DecodeError> {
    let value: Value =
        serde_json::from_str(text).map_err(|e| DecodeError::InvalidJson(e.to_string()))?;
    let Value::Object(mut map) = value else {
        return Err(DecodeError::NotAnObject);
    };
    let Some(Value::String(kind)) = map.remove("type") else {
        return Err(DecodeError::MissingField("type"));
    };
    let content = map
        .remove("content")
        .ok_or(DecodeError::MissingField("content"))?;
    Ok((kind, content))
}

/// Reinterprets a payload as little-endian `f32` samples.
pub fn payload_samples(payload: &[u8]) -> Result<Vec<f32>, DecodeError> {
    if payload.len() % SAMPLE_BYTES != 0 {
        return Err(DecodeError::MisalignedPayload { len: payload.len() });
    }
    Ok(payload
        .chunks_exact(SAMPLE_BYTES)
        .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect())
}

#[must_use]
pub fn samples_payload(samples: &[f32]) -> Vec<u8> {
    samples.iter().flat_map(|sample| sample.to_le_bytes()).collect()
}
