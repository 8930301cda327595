//! Binary span-context propagation.
//!
//! Implements the OpenCensus binary trace-context format carried in the
//! [`TRACE_CONTEXT_KEY`] metadata entry: a version byte followed by tagged
//! fields for the trace id, span id and trace options.

use bytes::{BufMut, Bytes, BytesMut};
use thiserror::Error;

use crate::model::{SpanContext, SpanId, TraceId, TraceOptions};

/// Metadata key under which the encoded span context travels.
pub const TRACE_CONTEXT_KEY: &str = "grpc-trace-bin";

const VERSION: u8 = 0;
const TRACE_ID_FIELD: u8 = 0;
const SPAN_ID_FIELD: u8 = 1;
const TRACE_OPTIONS_FIELD: u8 = 2;

const TRACE_ID_LEN: usize = 16;
const SPAN_ID_LEN: usize = 8;

/// Reasons an incoming trace token failed to decode.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum DecodeError {
    #[error("empty trace context")]
    Empty,
    #[error("unsupported trace context version {0}")]
    UnsupportedVersion(u8),
    #[error("missing trace id field")]
    MissingTraceId,
}

/// Encodes a span context into its 29-byte binary form.
pub fn to_binary(sc: &SpanContext) -> Bytes {
    let mut buf = BytesMut::with_capacity(4 + TRACE_ID_LEN + SPAN_ID_LEN + 1);
    buf.put_u8(VERSION);
    buf.put_u8(TRACE_ID_FIELD);
    buf.put_slice(&sc.trace_id.0);
    buf.put_u8(SPAN_ID_FIELD);
    buf.put_slice(&sc.span_id.0);
    buf.put_u8(TRACE_OPTIONS_FIELD);
    buf.put_u8(sc.trace_options.0);
    buf.freeze()
}

/// Decodes a binary trace token.
///
/// The trace id field is required; span id and options are optional and
/// default to zero when absent. Data after the recognized fields is
/// ignored, matching the reference decoder's permissiveness.
pub fn from_binary(b: &[u8]) -> Result<SpanContext, DecodeError> {
    let (&version, mut b) = b.split_first().ok_or(DecodeError::Empty)?;
    if version != VERSION {
        return Err(DecodeError::UnsupportedVersion(version));
    }

    let mut sc = SpanContext {
        trace_id: TraceId([0; TRACE_ID_LEN]),
        span_id: SpanId([0; SPAN_ID_LEN]),
        trace_options: TraceOptions(0),
    };

    if b.len() > TRACE_ID_LEN && b[0] == TRACE_ID_FIELD {
        let mut trace_id = [0u8; TRACE_ID_LEN];
        trace_id.copy_from_slice(&b[1..1 + TRACE_ID_LEN]);
        sc.trace_id = TraceId(trace_id);
        b = &b[1 + TRACE_ID_LEN..];
    } else {
        return Err(DecodeError::MissingTraceId);
    }

    if b.len() > SPAN_ID_LEN && b[0] == SPAN_ID_FIELD {
        let mut span_id = [0u8; SPAN_ID_LEN];
        span_id.copy_from_slice(&b[1..1 + SPAN_ID_LEN]);
        sc.span_id = SpanId(span_id);
        b = &b[1 + SPAN_ID_LEN..];
    }

    if b.len() >= 2 && b[0] == TRACE_OPTIONS_FIELD {
        sc.trace_options = TraceOptions(b[1]);
    }

    Ok(sc)
}
