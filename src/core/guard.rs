//! Guard predicates deciding eventless and guarded transitions.
//!
//! Guards are pure functions over [`FlowContext`]; the machine evaluates
//! them inside settle cascades and on the one synchronously guarded event.

use super::context::FlowContext;
use regex::Regex;
use std::sync::LazyLock;

/// The only address registered for one-time-password recovery.
///
/// Stands in for the out-of-scope recipient directory; the reference
/// environment knows exactly one recoverable account.
pub const REGISTERED_RECOVERY_EMAIL: &str = "user@company.com";

/// Permissive email shape check. Deliberately unanchored: this mirrors a
/// form-level plausibility test, not address validation.
static EMAIL_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\S+@\S+\.\S+").expect("email shape pattern compiles"));

/// Whether both credentials have been entered.
///
/// Decides the `signIn.check` routing: `ready` when this holds, `empty`
/// otherwise.
///
/// # Example
///
/// ```rust
/// use authflow::core::{credentials_entered, ContextPatch, FlowContext};
///
/// let mut context = FlowContext::default();
/// assert!(!credentials_entered(&context));
///
/// context.apply(ContextPatch::new().user_name("admin").password("hunter2"));
/// assert!(credentials_entered(&context));
/// ```
pub fn credentials_entered(context: &FlowContext) -> bool {
    !context.user_name.is_empty() && !context.password.is_empty()
}

/// Whether the entered email plausibly looks like an address.
///
/// Decides the `checkEmailEntered` routing: `readyToSend` when this holds,
/// `enterEmail` otherwise.
///
/// # Example
///
/// ```rust
/// use authflow::core::{email_well_formed, ContextPatch, FlowContext};
///
/// let mut context = FlowContext::default();
/// context.apply(ContextPatch::new().email("user@company.com"));
/// assert!(email_well_formed(&context));
///
/// context.apply(ContextPatch::new().email("not-an-address"));
/// assert!(!email_well_formed(&context));
/// ```
pub fn email_well_formed(context: &FlowContext) -> bool {
    EMAIL_SHAPE.is_match(&context.email)
}

/// Whether the entered email is registered for recovery.
///
/// Decides the `REQUEST_ONE_TIME_PASSWORD` branch: `oneTimePasswordSent`
/// when this holds, `unknownEmail` otherwise.
pub fn recovery_email_registered(context: &FlowContext) -> bool {
    context.email == REGISTERED_RECOVERY_EMAIL
}
