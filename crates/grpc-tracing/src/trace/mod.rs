//! Span binding and event translation for gRPC calls.

use crate::model::SpanContext;
use crate::trace::span::Span;

pub mod client;
pub mod events;
pub mod server;
pub mod span;

#[cfg(test)]
pub(crate) mod testutil;

pub const CLIENT_SPAN_NAME_PREFIX: &str = "gRPC.client";
pub const SERVER_SPAN_NAME_PREFIX: &str = "gRPC.server";

pub const CLIENT_ATTRIBUTE_KEY: &str = "client";
pub const FAIL_FAST_ATTRIBUTE_KEY: &str = "fail_fast";
pub const PAYLOAD_ATTRIBUTE_KEY: &str = "payload";
pub const UNCOMPRESSED_BYTE_SIZE_ATTRIBUTE_KEY: &str = "uncompressed_byte_size";
pub const COMPRESSED_BYTE_SIZE_ATTRIBUTE_KEY: &str = "compressed_byte_size";

/// Default bound on the rendered `payload` attribute, in bytes.
pub const STANDARD_PAYLOAD_ATTRIBUTE_SIZE_LIMIT: usize = 256;

/// Suffix appended to a payload rendering cut down to the attribute limit.
pub const PAYLOAD_TRUNCATED_MESSAGE: &str = "...[payload has been truncated]";

/// Per-call tracing state produced by a handler when a call starts.
///
/// Owns the span bound to the call. All lifecycle events for the call are
/// applied to this span, and the `End` event closes it. A context is never
/// shared between calls.
pub struct CallContext {
    pub(crate) span: Box<dyn Span>,
}

impl CallContext {
    pub(crate) fn new(span: Box<dyn Span>) -> Self {
        CallContext { span }
    }

    /// The identity of the span bound to this call.
    pub fn span_context(&self) -> SpanContext {
        self.span.span_context()
    }
}

/// Derives the span name for a call: the role prefix joined with the call's
/// fully-qualified method path, leading `/` stripped and the remaining `/`
/// separators replaced by `.`.
pub(crate) fn span_name(prefix: &str, full_method_name: &str) -> String {
    let method = full_method_name
        .strip_prefix('/')
        .unwrap_or(full_method_name)
        .replace('/', ".");
    format!("{prefix}.{method}")
}

/// Cuts a rendered payload down to at most `limit` bytes.
///
/// When the limit leaves room for [`PAYLOAD_TRUNCATED_MESSAGE`], the result
/// is a prefix plus the suffix, exactly `limit` bytes long; otherwise the
/// suffix is dropped and the rendering is cut at the limit. Cut points are
/// clamped down to char boundaries so the result stays valid UTF-8.
pub(crate) fn truncate(s: &str, limit: usize) -> String {
    if s.len() <= limit {
        return s.to_string();
    }
    if limit > PAYLOAD_TRUNCATED_MESSAGE.len() {
        let cut = floor_char_boundary(s, limit - PAYLOAD_TRUNCATED_MESSAGE.len());
        format!("{}{}", &s[..cut], PAYLOAD_TRUNCATED_MESSAGE)
    } else {
        s[..floor_char_boundary(s, limit)].to_string()
    }
}

fn floor_char_boundary(s: &str, index: usize) -> usize {
    let mut index = index.min(s.len());
    while !s.is_char_boundary(index) {
        index -= 1;
    }
    index
}
