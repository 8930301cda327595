//! Translation of RPC lifecycle events into span mutations.

use std::error::Error;
use std::fmt;

use rand::Rng;

use crate::status::{Code, RpcStatus};
use crate::trace::span::{Attribute, MessageEventKind, Span, Status};
use crate::trace::{
    truncate, CLIENT_ATTRIBUTE_KEY, COMPRESSED_BYTE_SIZE_ATTRIBUTE_KEY, FAIL_FAST_ATTRIBUTE_KEY,
    PAYLOAD_ATTRIBUTE_KEY, UNCOMPRESSED_BYTE_SIZE_ATTRIBUTE_KEY,
};

/// Content and declared sizes of a single RPC message.
pub struct PayloadInfo {
    /// The decoded message. Recorded on the span via its `Display`
    /// rendering, possibly truncated to the configured attribute limit.
    pub payload: Box<dyn fmt::Display + Send>,
    /// Size of the message before compression, in bytes.
    pub uncompressed_size: i64,
    /// Size of the message on the wire, in bytes.
    pub compressed_size: i64,
}

/// A lifecycle event for an in-flight call, as delivered by the transport.
///
/// Every call produces exactly one `Begin` and one `End`, with any number of
/// payload events in between; inbound and outbound payloads are independent
/// streams.
pub enum RpcEvent {
    /// The call has started. On the client side this fires after the span
    /// is already bound to the call.
    Begin { client: bool, fail_fast: bool },
    /// A message was received.
    InboundPayload(PayloadInfo),
    /// A message was sent.
    OutboundPayload(PayloadInfo),
    /// The call has finished, successfully or otherwise.
    End {
        error: Option<Box<dyn Error + Send + Sync>>,
    },
}

/// Source of message-event identifiers.
///
/// Payload events for many calls may be processed in parallel, so
/// implementations must be safe under concurrent invocation.
pub trait EventIdSource: Send + Sync {
    /// Returns a fresh non-negative event id.
    fn next_id(&self) -> i64;
}

/// Default id source, backed by the thread-local RNG.
#[derive(Clone, Copy, Debug, Default)]
pub struct RandomEventIds;

impl EventIdSource for RandomEventIds {
    fn next_id(&self) -> i64 {
        rand::thread_rng().gen_range(0..i64::MAX)
    }
}

/// Applies a lifecycle event to the span bound to its call.
///
/// `payload_attribute_length_limit` bounds the rendered `payload` attribute
/// in bytes; zero disables truncation. The declared byte sizes are recorded
/// as-is regardless of truncation.
pub fn handle_rpc(
    span: &mut dyn Span,
    event: RpcEvent,
    payload_attribute_length_limit: usize,
    event_ids: &dyn EventIdSource,
) {
    match event {
        RpcEvent::Begin { client, fail_fast } => {
            span.add_attributes(vec![
                Attribute::bool(CLIENT_ATTRIBUTE_KEY, client),
                Attribute::bool(FAIL_FAST_ATTRIBUTE_KEY, fail_fast),
            ]);
        }
        RpcEvent::InboundPayload(info) => {
            record_payload(
                span,
                info,
                payload_attribute_length_limit,
                MessageEventKind::Received,
                event_ids,
            );
        }
        RpcEvent::OutboundPayload(info) => {
            record_payload(
                span,
                info,
                payload_attribute_length_limit,
                MessageEventKind::Sent,
                event_ids,
            );
        }
        RpcEvent::End { error } => {
            if let Some(error) = error {
                span.set_status(classify_error(error.as_ref()));
            }
            span.end();
        }
    }
}

fn record_payload(
    span: &mut dyn Span,
    info: PayloadInfo,
    limit: usize,
    kind: MessageEventKind,
    event_ids: &dyn EventIdSource,
) {
    let mut payload = info.payload.to_string();
    if limit > 0 && payload.len() > limit {
        payload = truncate(&payload, limit);
    }

    span.add_attributes(vec![
        Attribute::string(PAYLOAD_ATTRIBUTE_KEY, payload),
        Attribute::i64(UNCOMPRESSED_BYTE_SIZE_ATTRIBUTE_KEY, info.uncompressed_size),
        Attribute::i64(COMPRESSED_BYTE_SIZE_ATTRIBUTE_KEY, info.compressed_size),
    ]);
    span.add_message_event(
        kind,
        event_ids.next_id(),
        info.uncompressed_size,
        info.compressed_size,
    );
}

fn classify_error(error: &(dyn Error + Send + Sync + 'static)) -> Status {
    match error.downcast_ref::<RpcStatus>() {
        Some(status) => Status {
            code: status.code() as i32,
            message: status.message().to_string(),
        },
        None => Status {
            code: Code::Internal as i32,
            message: error.to_string(),
        },
    }
}
