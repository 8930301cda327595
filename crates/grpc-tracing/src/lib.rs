//! Tracing instrumentation for gRPC clients and servers.
//!
//! Each RPC becomes a single trace span, enriched with structured attributes
//! (payload rendering, byte sizes, terminal status) derived from the call's
//! lifecycle events. Trace identity is carried across the wire in the
//! `grpc-trace-bin` metadata entry so the receiving side can continue the
//! caller's trace as a remote child.
//!
//! The crate has two halves:
//!
//! - The binders, [`ClientHandler`] and [`ServerHandler`], which intercept a
//!   call's start, produce a span bound into the call's [`CallContext`], and
//!   handle context propagation in each direction.
//! - The event translator ([`trace::events`]), which maps subsequent
//!   lifecycle events for the call onto mutations of the bound span.
//!
//! The tracing backend itself (span storage, sampling, id generation,
//! export) stays behind the [`trace::span::Tracer`] trait; this crate never
//! stores or exports spans and never fails the call it instruments.

pub mod metadata;
pub mod model;
pub mod propagation;
pub mod status;
pub mod trace;

pub use metadata::Metadata;
pub use trace::client::ClientHandler;
pub use trace::server::ServerHandler;
pub use trace::CallContext;
