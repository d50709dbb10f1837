//! Flow context: the data one flow instance accumulates while it runs.
//!
//! The context is a plain record owned by the machine. States decide what
//! is allowed next; the context carries what has been entered so far and
//! what the last authentication attempt produced.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Mutable record behind one authentication flow.
///
/// Created with every field at its zero value when the flow starts, mutated
/// only by transition actions, and discarded with the flow. Two invariants
/// hold whenever the machine is settled:
///
/// - `signed_in` is `true` exactly while the flow is authenticated;
/// - `password` is scrubbed by the time any authentication outcome has been
///   processed, whatever that outcome was.
///
/// `error` carries the last human-readable failure reason and is meaningful
/// only in the failure and unknown-email states; elsewhere it may be stale.
///
/// Serializes with camelCase field names (`userName`, `signedIn`) to match
/// the boundary format.
///
/// # Example
///
/// ```rust
/// use authflow::core::{ContextPatch, FlowContext};
///
/// let mut context = FlowContext::default();
/// context.apply(ContextPatch::new().user_name("admin").password("hunter2"));
///
/// assert_eq!(context.user_name, "admin");
/// assert_eq!(context.password, "hunter2");
/// assert!(!context.signed_in);
/// ```
#[derive(Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FlowContext {
    /// Account name as entered; empty means "not entered".
    pub user_name: String,
    /// Password as entered; scrubbed when an attempt completes.
    pub password: String,
    /// Recovery email address; used only by the recovery sub-flow.
    pub email: String,
    /// Whether the flow currently holds a signed-in session.
    pub signed_in: bool,
    /// Last human-readable failure reason.
    pub error: String,
}

impl FlowContext {
    /// Merge a patch into the context.
    ///
    /// Fields absent from the patch keep their current value; fields present
    /// replace it, including replacement with an empty string.
    ///
    /// # Example
    ///
    /// ```rust
    /// use authflow::core::{ContextPatch, FlowContext};
    ///
    /// let mut context = FlowContext::default();
    /// context.apply(ContextPatch::new().user_name("admin"));
    /// context.apply(ContextPatch::new().password("hunter2"));
    /// context.apply(ContextPatch::new().user_name(""));
    ///
    /// assert_eq!(context.user_name, "");
    /// assert_eq!(context.password, "hunter2");
    /// ```
    pub fn apply(&mut self, patch: ContextPatch) {
        if let Some(user_name) = patch.user_name {
            self.user_name = user_name;
        }
        if let Some(password) = patch.password {
            self.password = password;
        }
        if let Some(email) = patch.email {
            self.email = email;
        }
    }
}

impl fmt::Debug for FlowContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FlowContext")
            .field("user_name", &self.user_name)
            .field("password", &redact(&self.password))
            .field("email", &self.email)
            .field("signed_in", &self.signed_in)
            .field("error", &self.error)
            .finish()
    }
}

/// Stand-in for a secret in `Debug` output. Empty stays visible because
/// "nothing entered yet" is not a secret.
pub(crate) fn redact(secret: &str) -> &'static str {
    if secret.is_empty() {
        ""
    } else {
        "<redacted>"
    }
}

/// Partial update merged into [`FlowContext`] by an `UPDATE` event.
///
/// Only the settable fields appear; `signed_in` and `error` are owned by
/// transition actions and cannot be patched from outside. Unset fields are
/// left untouched by the merge.
///
/// # Example
///
/// ```rust
/// use authflow::core::ContextPatch;
///
/// let patch = ContextPatch::new()
///     .user_name("admin")
///     .email("admin@company.com");
/// ```
#[derive(Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContextPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    user_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    email: Option<String>,
}

impl ContextPatch {
    /// Empty patch; applying it changes nothing but still re-runs the
    /// owning state's checks.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the user name field.
    pub fn user_name(mut self, value: impl Into<String>) -> Self {
        self.user_name = Some(value.into());
        self
    }

    /// Set the password field.
    pub fn password(mut self, value: impl Into<String>) -> Self {
        self.password = Some(value.into());
        self
    }

    /// Set the recovery email field.
    pub fn email(mut self, value: impl Into<String>) -> Self {
        self.email = Some(value.into());
        self
    }
}

impl fmt::Debug for ContextPatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContextPatch")
            .field("user_name", &self.user_name)
            .field(
                "password",
                &self.password.as_deref().map(redact),
            )
            .field("email", &self.email)
            .finish()
    }
}
