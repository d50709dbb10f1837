//! Context mutations bound to transitions.
//!
//! Each action is a small named function the machine applies while moving
//! between states. The `UPDATE` merge itself lives on
//! [`FlowContext::apply`](crate::core::FlowContext::apply).

use crate::core::FlowContext;
use crate::invoke::DenialCode;

/// Message shown for the unknown-recipient recovery outcome.
pub(crate) const UNKNOWN_RECIPIENT_MESSAGE: &str = "Unknown email address";

/// Human-readable message for an authentication denial code.
///
/// This mapping is policy owned by the machine, not the invoker: the
/// invoker's codes stay opaque, and this table is the single place they
/// become copy.
///
/// # Example
///
/// ```rust
/// use authflow::invoke::DenialCode;
/// use authflow::machine::failure_message;
///
/// assert_eq!(failure_message(DenialCode::UNKNOWN_USER), "Unknown user name");
/// assert_eq!(failure_message(DenialCode::INVALID_PASSWORD), "Invalid password");
/// assert_eq!(failure_message(DenialCode(500)), "Authentication failed");
/// ```
pub fn failure_message(code: DenialCode) -> &'static str {
    match code {
        DenialCode::UNKNOWN_USER => "Unknown user name",
        DenialCode::INVALID_PASSWORD => "Invalid password",
        _ => "Authentication failed",
    }
}

/// Entering `authenticated`: mark the session and scrub the password.
pub(crate) fn finish_success(context: &mut FlowContext) {
    context.signed_in = true;
    context.password.clear();
    context.error.clear();
}

/// Entering `failure`: record the reason and scrub the password.
pub(crate) fn finish_denied(context: &mut FlowContext, code: DenialCode) {
    context.signed_in = false;
    context.password.clear();
    context.error = failure_message(code).to_string();
}

/// Leaving `authenticated` on `SIGNOUT`.
pub(crate) fn sign_out(context: &mut FlowContext) {
    context.signed_in = false;
}

/// Entering `unknownEmail`: record why the code was not sent.
pub(crate) fn flag_unknown_recipient(context: &mut FlowContext) {
    context.error = UNKNOWN_RECIPIENT_MESSAGE.to_string();
}
