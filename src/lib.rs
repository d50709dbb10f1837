//! Authflow: a hierarchical state machine driving a client-side
//! authentication flow.
//!
//! The controller governs credential entry, sign-in, sign-up, sign-out,
//! and one-time-password recovery as a statechart: compound states with
//! initial children, eventless transitions that re-evaluate derived
//! validity, a cancellable asynchronous authentication attempt, and a
//! deterministic error taxonomy. Rendering, transports, and session
//! persistence stay outside; they talk to the flow only through events and
//! snapshots.
//!
//! # Core Concepts
//!
//! - **[`FlowMachine`]**: synchronous engine owning one flow's state
//!   configuration, context, and history
//! - **[`Event`]**: the inbound vocabulary, `UPDATE` carrying field merges
//! - **[`Authenticator`]**: the single async capability the flow invokes
//! - **[`FlowService`]**: tokio-backed ingress that serializes events and
//!   attempt outcomes through one queue and publishes settled snapshots
//!
//! # Example
//!
//! Drive a whole sign-in round trip synchronously:
//!
//! ```rust
//! use authflow::core::{ContextPatch, Event};
//! use authflow::invoke::{AttemptOutcome, DenialCode};
//! use authflow::machine::{FlowMachine, SendOutcome};
//!
//! let mut flow = FlowMachine::new();
//!
//! flow.send(Event::update(
//!     ContextPatch::new().user_name("bob").password("x"),
//! ))
//! .unwrap();
//!
//! let attempt = match flow.send(Event::Authenticate).unwrap() {
//!     SendOutcome::Invoked(attempt) => attempt,
//!     other => panic!("expected an attempt, got {other:?}"),
//! };
//!
//! flow.resolve(AttemptOutcome::denied(
//!     attempt.generation,
//!     DenialCode::UNKNOWN_USER,
//! ));
//!
//! assert_eq!(flow.state().path(), "failure");
//! assert_eq!(flow.context().error, "Unknown user name");
//! assert_eq!(flow.context().password, "");
//! ```

pub mod core;
pub mod invoke;
pub mod machine;
pub mod service;

// Re-export the types a typical caller touches.
pub use crate::core::{ContextPatch, Event, EventKind, FlowContext, FlowState};
pub use crate::invoke::{
    AttemptOutcome, AuthAttempt, Authenticator, DenialCode, DirectoryAuthenticator,
};
pub use crate::machine::{FlowError, FlowMachine, FlowSnapshot, Resolution, SendOutcome};
pub use crate::service::FlowService;
