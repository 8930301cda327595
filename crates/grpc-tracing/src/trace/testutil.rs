//! Recording doubles for the tracing backend, shared by the handler and
//! translator tests.

use std::sync::{Arc, Mutex};

use crate::model::{SpanContext, SpanId, TraceId, TraceOptions};
use crate::trace::events::EventIdSource;
use crate::trace::span::{
    Attribute, AttributeValue, MessageEventKind, Sampler, SamplingParameters, Span, SpanKind,
    Status, Tracer,
};

/// Everything a [`RecordingSpan`] has been asked to record.
#[derive(Debug, Default)]
pub(crate) struct SpanData {
    pub attributes: Vec<Attribute>,
    pub messages: Vec<MessageRecord>,
    pub status: Option<Status>,
    pub ended: bool,
}

#[derive(Debug)]
pub(crate) struct MessageRecord {
    pub kind: MessageEventKind,
    pub event_id: i64,
    pub uncompressed_byte_size: i64,
    pub compressed_byte_size: i64,
}

/// Returns the recorded value for `key`, if any.
pub(crate) fn attribute(data: &SpanData, key: &str) -> Option<AttributeValue> {
    data.attributes
        .iter()
        .find(|a| a.key == key)
        .map(|a| a.value.clone())
}

/// Span double that records every mutation into a shared [`SpanData`].
pub(crate) struct RecordingSpan {
    context: SpanContext,
    data: Arc<Mutex<SpanData>>,
}

impl RecordingSpan {
    pub fn new(context: SpanContext) -> (Self, Arc<Mutex<SpanData>>) {
        let data = Arc::new(Mutex::new(SpanData::default()));
        (
            RecordingSpan {
                context,
                data: data.clone(),
            },
            data,
        )
    }

    pub fn with_fresh_context() -> (Self, Arc<Mutex<SpanData>>) {
        Self::new(SpanContext {
            trace_id: TraceId::generate(),
            span_id: SpanId::generate(),
            trace_options: TraceOptions(0),
        })
    }
}

impl Span for RecordingSpan {
    fn add_attributes(&mut self, mut attributes: Vec<Attribute>) {
        self.data.lock().unwrap().attributes.append(&mut attributes);
    }

    fn add_message_event(
        &mut self,
        kind: MessageEventKind,
        event_id: i64,
        uncompressed_byte_size: i64,
        compressed_byte_size: i64,
    ) {
        self.data.lock().unwrap().messages.push(MessageRecord {
            kind,
            event_id,
            uncompressed_byte_size,
            compressed_byte_size,
        });
    }

    fn set_status(&mut self, status: Status) {
        self.data.lock().unwrap().status = Some(status);
    }

    fn end(&mut self) {
        let mut data = self.data.lock().unwrap();
        assert!(!data.ended, "span ended twice");
        data.ended = true;
    }

    fn span_context(&self) -> SpanContext {
        self.context
    }
}

/// One span start observed by the [`RecordingTracer`].
pub(crate) struct StartRecord {
    pub name: String,
    pub kind: SpanKind,
    pub parent: Option<SpanContext>,
    pub had_sampler: bool,
    pub data: Arc<Mutex<SpanData>>,
}

/// Tracer double. Remote children inherit the parent's trace id and
/// sampling decision; a supplied sampler overrides the inherited decision.
#[derive(Default)]
pub(crate) struct RecordingTracer {
    pub starts: Mutex<Vec<StartRecord>>,
}

impl RecordingTracer {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn start(
        &self,
        name: &str,
        kind: SpanKind,
        parent: Option<SpanContext>,
        sampler: Option<&dyn Sampler>,
    ) -> Box<dyn Span> {
        let mut context = match parent {
            Some(parent) => SpanContext {
                trace_id: parent.trace_id,
                span_id: SpanId::generate(),
                trace_options: parent.trace_options,
            },
            None => SpanContext {
                trace_id: TraceId::generate(),
                span_id: SpanId::generate(),
                trace_options: TraceOptions(0),
            },
        };

        if let Some(sampler) = sampler {
            let sampled = sampler.should_sample(&SamplingParameters {
                parent_context: parent,
                name,
                has_remote_parent: parent.is_some(),
            });
            context.trace_options = context.trace_options.with_sampled(sampled);
        }

        let (span, data) = RecordingSpan::new(context);
        self.starts.lock().unwrap().push(StartRecord {
            name: name.to_string(),
            kind,
            parent,
            had_sampler: sampler.is_some(),
            data,
        });
        Box::new(span)
    }
}

impl Tracer for RecordingTracer {
    fn start_span(
        &self,
        name: &str,
        kind: SpanKind,
        sampler: Option<&dyn Sampler>,
    ) -> Box<dyn Span> {
        self.start(name, kind, None, sampler)
    }

    fn start_span_with_remote_parent(
        &self,
        name: &str,
        kind: SpanKind,
        parent: SpanContext,
        sampler: Option<&dyn Sampler>,
    ) -> Box<dyn Span> {
        self.start(name, kind, Some(parent), sampler)
    }
}

/// Sampler that always says yes.
pub(crate) struct AlwaysSample;

impl Sampler for AlwaysSample {
    fn should_sample(&self, _params: &SamplingParameters<'_>) -> bool {
        true
    }
}

/// Id source yielding a fixed value, for deterministic assertions.
pub(crate) struct FixedEventIds(pub i64);

impl EventIdSource for FixedEventIds {
    fn next_id(&self) -> i64 {
        self.0
    }
}
