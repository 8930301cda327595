use rand::RngCore;

#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq)]
pub struct TraceId(pub [u8; 16]);

#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq)]
pub struct SpanId(pub [u8; 8]);

impl TraceId {
    pub fn generate() -> Self {
        let mut trace_id = [0u8; 16];
        rand::thread_rng().fill_bytes(&mut trace_id);
        TraceId(trace_id)
    }

    pub fn serialize_std(&self) -> String {
        hex::encode(self.0)
    }

    pub fn parse_std(s: &str) -> Result<Self, hex::FromHexError> {
        let bytes = hex::decode(s)?;
        let trace_id: [u8; 16] = bytes
            .try_into()
            .map_err(|_| hex::FromHexError::InvalidStringLength)?;
        Ok(TraceId(trace_id))
    }
}

impl SpanId {
    pub fn generate() -> Self {
        let mut span_id = [0u8; 8];
        rand::thread_rng().fill_bytes(&mut span_id);
        SpanId(span_id)
    }

    pub fn serialize_std(&self) -> String {
        hex::encode(self.0)
    }

    pub fn parse_std(s: &str) -> Result<Self, hex::FromHexError> {
        let bytes = hex::decode(s)?;
        let span_id: [u8; 8] = bytes
            .try_into()
            .map_err(|_| hex::FromHexError::InvalidStringLength)?;
        Ok(SpanId(span_id))
    }
}

/// Per-trace option bits carried alongside the span identity.
/// Bit 0 is the sampling decision.
#[derive(Clone, Copy, Debug, Default, Hash, Eq, PartialEq)]
pub struct TraceOptions(pub u8);

impl TraceOptions {
    pub fn is_sampled(&self) -> bool {
        self.0 & 1 == 1
    }

    pub fn with_sampled(self, sampled: bool) -> Self {
        if sampled {
            TraceOptions(self.0 | 1)
        } else {
            TraceOptions(self.0 & !1)
        }
    }
}

/// The identity of a span: everything that crosses a process boundary when
/// a trace is continued on the receiving side.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct SpanContext {
    pub trace_id: TraceId,
    pub span_id: SpanId,
    pub trace_options: TraceOptions,
}
