//! Client-side (outbound) call binding.

use std::sync::Arc;

use crate::metadata::Metadata;
use crate::propagation::{self, TRACE_CONTEXT_KEY};
use crate::trace::events::{self, EventIdSource, RandomEventIds, RpcEvent};
use crate::trace::span::{SpanKind, StartOptions, Tracer};
use crate::trace::{
    span_name, CallContext, CLIENT_SPAN_NAME_PREFIX, STANDARD_PAYLOAD_ATTRIBUTE_SIZE_LIMIT,
};

/// Binds outgoing calls to client spans and propagates trace identity.
///
/// A handler is immutable configuration shared read-only across all
/// concurrent calls; per-call state lives in the [`CallContext`] returned
/// from [`ClientHandler::tag_rpc`].
pub struct ClientHandler {
    tracer: Arc<dyn Tracer>,
    start_options: StartOptions,
    payload_attribute_length_limit: usize,
    event_ids: Arc<dyn EventIdSource>,
}

impl ClientHandler {
    /// Creates a handler with default start options and the standard
    /// payload attribute limit.
    pub fn new(tracer: Arc<dyn Tracer>) -> Self {
        ClientHandler {
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

    /// Starts the client span for a call and writes its identity into the
    /// outgoing metadata under `grpc-trace-bin`.
    ///
    /// Every subsequent lifecycle event for the call must be applied to the
    /// returned context via [`ClientHandler::handle_rpc`].
    pub fn tag_rpc(&self, full_method_name: &str, outgoing: &mut Metadata) -> CallContext {
        let name = span_name(CLIENT_SPAN_NAME_PREFIX, full_method_name);
        let span = self.tracer.start_span(
            &name,
            SpanKind::Client,
            self.start_options.sampler.as_deref(),
        );
        outgoing.append(
            TRACE_CONTEXT_KEY,
            propagation::to_binary(&span.span_context()),
        );
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
