//! In-process hooks for payout events.
//!
//! Register async callbacks on [`EventHooks`], turn them into [`EventHandlers`], start the handlers, and hand the
//! resulting [`EventProducers`] to the APIs that publish events.
mod channel;
mod event_types;
mod hooks;

pub use channel::{EventHandler, EventProducer, Handler};
pub use event_types::*;
pub use hooks::{EventHandlers, EventHooks, EventProducers};
