//! Stream event protocol: type + payload + envelope.
//!
//! This crate defines the wire shape of a single stream event and envelope injection.
//! It has no dependency on agent-core; agent-core bridges its internal `StreamEvent<S>`
//! into `ProtocolEvent` and calls `to_json`.

pub mod envelope;
pub mod event;

pub use envelope::{to_json, Envelope, EnvelopeState};
pub use event::{MessageRole, ProtocolEvent};
