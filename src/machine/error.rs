//! Typed failures surfaced by the machine and the dispatcher.

use crate::core::{EventKind, FlowState};
use thiserror::Error;

/// Errors surfaced by [`FlowMachine`](crate::machine::FlowMachine) and
/// [`FlowService`](crate::service::FlowService).
///
/// The machine itself never panics: every authentication outcome is a state
/// plus context, and these errors cover only protocol misuse and teardown.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FlowError {
    /// A strict machine received an event its configuration does not
    /// accept. Lenient machines ignore such events instead.
    #[error("event {event} is not handled in state {state}")]
    UnhandledEvent {
        /// The rejected event kind.
        event: EventKind,
        /// The configuration that rejected it.
        state: FlowState,
    },

    /// An eventless cascade failed to settle within the hop limit.
    ///
    /// Unreachable with the built-in transition table; a cascade that loops
    /// can only come from a miswired guard.
    #[error("eventless transitions did not settle after {limit} hops (reached {state})")]
    UnsettledCascade {
        /// Hop limit that was exceeded.
        limit: usize,
        /// Configuration when the limit was hit.
        state: FlowState,
    },

    /// The flow has wound down; no further events are accepted.
    #[error("flow is closed")]
    Closed,
}
