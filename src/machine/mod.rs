//! The imperative shell: a machine owning one flow's state and context.
//!
//! [`FlowMachine`] applies the transition table, runs eventless cascades to
//! completion, and resolves authentication outcomes. It is synchronous and
//! single-owner; the async ingress around it lives in [`crate::service`].

mod actions;
mod engine;
mod error;

pub use actions::failure_message;
pub use engine::{FlowMachine, FlowSnapshot, Resolution, SendOutcome};
pub use error::FlowError;
