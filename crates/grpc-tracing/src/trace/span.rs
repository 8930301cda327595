//! The capability surface this crate requires from a tracing backend.

use std::sync::Arc;

use crate::model::SpanContext;

/// A value recorded as a span attribute.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum AttributeValue {
    Bool(bool),
    I64(i64),
    String(String),
}

/// A key/value pair recorded on a span.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Attribute {
    pub key: &'static str,
    pub value: AttributeValue,
}

impl Attribute {
    pub fn bool(key: &'static str, value: bool) -> Self {
        Attribute {
            key,
            value: AttributeValue::Bool(value),
        }
    }

    pub fn i64(key: &'static str, value: i64) -> Self {
        Attribute {
            key,
            value: AttributeValue::I64(value),
        }
    }

    pub fn string(key: &'static str, value: impl Into<String>) -> Self {
        Attribute {
            key,
            value: AttributeValue::String(value.into()),
        }
    }
}

/// Direction of a message event recorded on a span.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MessageEventKind {
    Sent,
    Received,
}

/// Terminal status recorded on a span.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Status {
    pub code: i32,
    pub message: String,
}

/// The role a span plays in an RPC.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SpanKind {
    Client,
    Server,
}

/// Mutation surface of a live span.
///
/// A span is owned by the single call whose lifecycle events reference it,
/// so implementations need no synchronization of their own.
pub trait Span: Send {
    /// Records attributes on the span.
    fn add_attributes(&mut self, attributes: Vec<Attribute>);

    /// Records a message send/receive event.
    fn add_message_event(
        &mut self,
        kind: MessageEventKind,
        event_id: i64,
        uncompressed_byte_size: i64,
        compressed_byte_size: i64,
    );

    /// Sets the terminal status. Absent a call, backend defaults apply.
    fn set_status(&mut self, status: Status);

    /// Closes the span. Invoked exactly once, when the call ends.
    fn end(&mut self);

    /// The identity of this span.
    fn span_context(&self) -> SpanContext;
}

/// Parameters handed to a [`Sampler`] when a span is started.
pub struct SamplingParameters<'a> {
    pub parent_context: Option<SpanContext>,
    pub name: &'a str,
    pub has_remote_parent: bool,
}

/// A sampling decision source.
///
/// Handlers never invoke the sampler themselves; they forward it to the
/// [`Tracer`], which combines it with any inherited parent decision.
pub trait Sampler: Send + Sync {
    fn should_sample(&self, params: &SamplingParameters<'_>) -> bool;
}

/// Start-time options shared by every call bound through a handler.
#[derive(Clone, Default)]
pub struct StartOptions {
    /// Sampling decision source; `None` defers entirely to the backend.
    pub sampler: Option<Arc<dyn Sampler>>,
}

/// Handle to the tracing backend.
///
/// The backend owns span storage, id generation and sampling; this crate
/// only starts spans and mutates them through [`Span`].
pub trait Tracer: Send + Sync {
    /// Starts a new root span.
    fn start_span(
        &self,
        name: &str,
        kind: SpanKind,
        sampler: Option<&dyn Sampler>,
    ) -> Box<dyn Span>;

    /// Starts a span continuing a trace whose parent span lives in another
    /// process.
    fn start_span_with_remote_parent(
        &self,
        name: &str,
        kind: SpanKind,
        parent: SpanContext,
        sampler: Option<&dyn Sampler>,
    ) -> Box<dyn Span>;
}
