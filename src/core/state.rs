//! The flow's hierarchical state configuration.
//!
//! States form a fixed tree. A configuration is always one leaf plus all of
//! its ancestors, encoded as nested enums so a whole configuration is a
//! single `Copy` value and compound membership is plain pattern matching.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Leaves of the password recovery compound (`signIn.forgotPassword`).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum RecoveryState {
    /// Transient: routes to `ReadyToSend` or `EnterEmail` by email shape.
    CheckEmailEntered,
    /// Waiting for a plausible email address.
    EnterEmail,
    /// The address looks deliverable; a one-time password can be requested.
    ReadyToSend,
    /// A one-time password went out to the entered address.
    OneTimePasswordSent,
    /// The entered address is not registered for recovery.
    UnknownEmail,
}

/// States under the `signIn` compound.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum SignInState {
    /// Transient: routes to `Ready` or `Empty` by credential presence.
    Check,
    /// Credentials incomplete.
    Empty,
    /// Both credentials entered; authentication can start.
    Ready,
    /// Password recovery sub-flow.
    ForgotPassword(RecoveryState),
}

/// A complete state configuration of the flow.
///
/// The tree, with transient states marked:
///
/// ```text
/// signIn
/// ├── check            (transient)
/// ├── empty
/// ├── ready
/// └── forgotPassword
///     ├── checkEmailEntered   (transient)
///     ├── enterEmail
///     ├── readyToSend
///     ├── oneTimePasswordSent
///     └── unknownEmail
/// authenticating
/// authenticated
/// failure
/// signUp
/// registering
/// registered
/// ```
///
/// Configurations render as dotted paths and parse back from them; the
/// serde form is the path string.
///
/// # Example
///
/// ```rust
/// use authflow::core::FlowState;
///
/// let state = FlowState::forgot_password();
/// assert_eq!(state.path(), "signIn.forgotPassword.checkEmailEntered");
/// assert_eq!(state.name(), "checkEmailEntered");
/// assert!(state.is_transient());
///
/// let parsed: FlowState = "signIn.ready".parse().unwrap();
/// assert_eq!(parsed.name(), "ready");
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum FlowState {
    /// Credential entry, including the password recovery sub-flow.
    SignIn(SignInState),
    /// An authentication attempt is in flight.
    Authenticating,
    /// The flow holds a signed-in session.
    Authenticated,
    /// The last authentication attempt was denied.
    Failure,
    /// Registration form.
    SignUp,
    /// Registration submission in flight.
    Registering,
    /// Registration completed.
    Registered,
}

impl FlowState {
    /// Entry point of the `signIn` compound: its transient initial child.
    ///
    /// Every transition targeting `signIn` as a whole lands here, so stale
    /// sub-states are always discarded on re-entry.
    pub fn sign_in() -> Self {
        FlowState::SignIn(SignInState::Check)
    }

    /// Entry point of the `forgotPassword` compound: its transient initial
    /// child.
    pub fn forgot_password() -> Self {
        FlowState::SignIn(SignInState::ForgotPassword(RecoveryState::CheckEmailEntered))
    }

    /// Full dotted path of this configuration, root first.
    pub fn path(&self) -> &'static str {
        match self {
            FlowState::SignIn(SignInState::Check) => "signIn.check",
            FlowState::SignIn(SignInState::Empty) => "signIn.empty",
            FlowState::SignIn(SignInState::Ready) => "signIn.ready",
            FlowState::SignIn(SignInState::ForgotPassword(recovery)) => match recovery {
                RecoveryState::CheckEmailEntered => "signIn.forgotPassword.checkEmailEntered",
                RecoveryState::EnterEmail => "signIn.forgotPassword.enterEmail",
                RecoveryState::ReadyToSend => "signIn.forgotPassword.readyToSend",
                RecoveryState::OneTimePasswordSent => "signIn.forgotPassword.oneTimePasswordSent",
                RecoveryState::UnknownEmail => "signIn.forgotPassword.unknownEmail",
            },
            FlowState::Authenticating => "authenticating",
            FlowState::Authenticated => "authenticated",
            FlowState::Failure => "failure",
            FlowState::SignUp => "signUp",
            FlowState::Registering => "registering",
            FlowState::Registered => "registered",
        }
    }

    /// Name of the leaf state alone, without ancestors.
    pub fn name(&self) -> &'static str {
        match self.path().rsplit_once('.') {
            Some((_, leaf)) => leaf,
            None => self.path(),
        }
    }

    /// Whether this configuration is a transient (eventless) state.
    ///
    /// Transient states exist only inside a settle cascade; a settled
    /// machine is never resting in one.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            FlowState::SignIn(SignInState::Check)
                | FlowState::SignIn(SignInState::ForgotPassword(RecoveryState::CheckEmailEntered))
        )
    }
}

impl fmt::Display for FlowState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// A state path that does not name any configuration in the tree.
#[derive(Clone, PartialEq, Eq, Debug, Error)]
#[error("unrecognized state path: {0}")]
pub struct ParseStateError(pub String);

impl FromStr for FlowState {
    type Err = ParseStateError;

    fn from_str(path: &str) -> Result<Self, Self::Err> {
        use RecoveryState as Recovery;
        use SignInState as SignIn;

        let state = match path {
            "signIn.check" => FlowState::SignIn(SignIn::Check),
            "signIn.empty" => FlowState::SignIn(SignIn::Empty),
            "signIn.ready" => FlowState::SignIn(SignIn::Ready),
            "signIn.forgotPassword.checkEmailEntered" => {
                FlowState::SignIn(SignIn::ForgotPassword(Recovery::CheckEmailEntered))
            }
            "signIn.forgotPassword.enterEmail" => {
                FlowState::SignIn(SignIn::ForgotPassword(Recovery::EnterEmail))
            }
            "signIn.forgotPassword.readyToSend" => {
                FlowState::SignIn(SignIn::ForgotPassword(Recovery::ReadyToSend))
            }
            "signIn.forgotPassword.oneTimePasswordSent" => {
                FlowState::SignIn(SignIn::ForgotPassword(Recovery::OneTimePasswordSent))
            }
            "signIn.forgotPassword.unknownEmail" => {
                FlowState::SignIn(SignIn::ForgotPassword(Recovery::UnknownEmail))
            }
            "authenticating" => FlowState::Authenticating,
            "authenticated" => FlowState::Authenticated,
            "failure" => FlowState::Failure,
            "signUp" => FlowState::SignUp,
            "registering" => FlowState::Registering,
            "registered" => FlowState::Registered,
            other => return Err(ParseStateError(other.to_string())),
        };
        Ok(state)
    }
}

impl Serialize for FlowState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.path())
    }
}

impl<'de> Deserialize<'de> for FlowState {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let path = String::deserialize(deserializer)?;
        path.parse().map_err(serde::de::Error::custom)
    }
}
