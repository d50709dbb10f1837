//! Pure data and predicates behind the flow.
//!
//! This module contains the side-effect-free half of the controller:
//! - context values and the `UPDATE` merge payload
//! - inbound events and their discriminants
//! - the hierarchical state tree
//! - guard predicates over the context
//! - immutable transition history
//!
//! The imperative shell that owns and mutates a flow lives in
//! [`crate::machine`].

mod context;
mod event;
mod guard;
mod history;
mod state;

pub use context::{ContextPatch, FlowContext};
pub use event::{Event, EventKind};
pub use guard::{
    credentials_entered, email_well_formed, recovery_email_registered, REGISTERED_RECOVERY_EMAIL,
};
pub use history::{FlowHistory, TransitionRecord};
pub use state::{FlowState, ParseStateError, RecoveryState, SignInState};

pub(crate) use context::redact;
