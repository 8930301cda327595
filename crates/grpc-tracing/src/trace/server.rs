//! Server-side (inbound) call binding.

use std::sync::Arc;

use crate::metadata::Metadata;
use crate::propagation::{self, TRACE_CONTEXT_KEY};
use crate::trace::events::{self, EventIdSource, RandomEventIds, RpcEvent};
use crate::trace::span::{Span, SpanKind, StartOptions, Tracer};
use crate::trace::{
    span_name, CallContext, SERVER_SPAN_NAME_PREFIX, STANDARD_PAYLOAD_ATTRIBUTE_SIZE_LIMIT,
};

/// Binds incoming calls to server spans, continuing the caller's trace when
/// a valid token is present in the incoming metadata.
///
/// Like [`crate::ClientHandler`], a handler is immutable shared
/// configuration; per-call state lives in the returned [`CallContext`].
pub struct ServerHandler {
    tracer: Arc<dyn Tracer>,
    start_options: StartOptions,
    payload_attribute_length_limit: usize,
    event_ids: Arc<dyn EventIdSource>,
}

impl ServerHandler {
    /// Creates a handler with default start options and the standard
    /// payload attribute limit.
    pub fn new(tracer: Arc<dyn Tracer>) -> Self {
        ServerHandler {
            tracer,
            start_options: StartOptions::default(),
            payload_attribute_length_limit: STANDARD_PAYLOAD_ATTRIBUTE_SIZE_LIMIT,
            event_ids: Arc::new(RandomEventIds),
        }
    }

    /// Replaces the start options applied to every call.
    pub fn with_start_options(mut self, start_options: StartOptions) -> Self {
        self.start_options = start_options;
        self
    }

    /// Replaces the payload attribute length limit. Zero disables
    /// truncation.
    pub fn with_payload_attribute_length_limit(mut self, limit: usize) -> Self {
        self.payload_attribute_length_limit = limit;
        self
    }

    /// Replaces the message event id source.
    pub fn with_event_id_source(mut self, event_ids: Arc<dyn EventIdSource>) -> Self {
        self.event_ids = event_ids;
        self
    }

    pub fn payload_attribute_length_limit(&self) -> usize {
        self.payload_attribute_length_limit
    }

    /// Starts the server span for an incoming call.
    ///
    /// If the incoming metadata carries a decodable `grpc-trace-bin` token
    /// the span continues the caller's trace as a remote child; an absent or
    /// malformed token falls back to a fresh root span. Malformed tokens
    /// never fail the call.
    pub fn tag_rpc(&self, full_method_name: &str, incoming: &Metadata) -> CallContext {
        let name = span_name(SERVER_SPAN_NAME_PREFIX, full_method_name);
        let sampler = self.start_options.sampler.as_deref();

        let span: Box<dyn Span> = match incoming.get_all(TRACE_CONTEXT_KEY).first() {
            Some(token) => match propagation::from_binary(token) {
                Ok(parent) => {
                    log::trace!(
                        "continuing trace {} for {name}",
                        parent.trace_id.serialize_std()
                    );
                    self.tracer
                        .start_span_with_remote_parent(&name, SpanKind::Server, parent, sampler)
                }
                Err(err) => {
                    log::debug!("malformed trace context for {name}, starting a new trace: {err}");
                    self.tracer.start_span(&name, SpanKind::Server, sampler)
                }
            },
            None => self.tracer.start_span(&name, SpanKind::Server, sampler),
        };

        CallContext::new(span)
    }

    /// Applies a lifecycle event to the call's span.
    pub fn handle_rpc(&self, ctx: &mut CallContext, event: RpcEvent) {
        events::handle_rpc(
            ctx.span.as_mut(),
            event,
            self.payload_attribute_length_limit,
            self.event_ids.as_ref(),
        );
    }
}
