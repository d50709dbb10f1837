//! The asynchronous verification capability.
//!
//! The machine never talks to a transport. Entering `authenticating` hands
//! the caller an [`AuthAttempt`]; whoever runs the flow calls an
//! [`Authenticator`] and feeds the [`AttemptOutcome`] back through
//! [`FlowMachine::resolve`](crate::machine::FlowMachine::resolve). The
//! generation carried by the attempt is what makes slow or superseded
//! resolutions safe to drop.

mod directory;

pub use directory::DirectoryAuthenticator;

use crate::core::redact;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::future::Future;

/// Opaque code explaining a denied verification attempt.
///
/// Codes `1` and `2` have named constants; the machine maps anything else
/// to a generic failure message.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct DenialCode(pub u32);

impl DenialCode {
    /// No account with the supplied user name.
    pub const UNKNOWN_USER: DenialCode = DenialCode(1);
    /// The account exists but the password does not match.
    pub const INVALID_PASSWORD: DenialCode = DenialCode(2);
}

impl fmt::Display for DenialCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A verification request captured when the flow enters `authenticating`.
///
/// Holds the credentials as entered plus the generation that ties the
/// eventual outcome back to this attempt.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthAttempt {
    /// Attempt generation, compared on resolution.
    pub generation: u64,
    /// User name to verify.
    pub user_name: String,
    /// Password to verify.
    pub password: String,
}

impl fmt::Debug for AuthAttempt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthAttempt")
            .field("generation", &self.generation)
            .field("user_name", &self.user_name)
            .field("password", &redact(&self.password))
            .finish()
    }
}

/// The single resolution of one verification attempt.
///
/// # Example
///
/// ```rust
/// use authflow::invoke::{AttemptOutcome, DenialCode};
///
/// let ok = AttemptOutcome::success(1);
/// assert_eq!(ok.result, Ok(()));
///
/// let denied = AttemptOutcome::denied(1, DenialCode::UNKNOWN_USER);
/// assert_eq!(denied.result, Err(DenialCode(1)));
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct AttemptOutcome {
    /// Generation of the attempt this outcome belongs to.
    pub generation: u64,
    /// Accept or reject decision.
    pub result: Result<(), DenialCode>,
}

impl AttemptOutcome {
    /// Outcome of an accepted attempt.
    pub fn success(generation: u64) -> Self {
        Self {
            generation,
            result: Ok(()),
        }
    }

    /// Outcome of a denied attempt.
    pub fn denied(generation: u64, code: DenialCode) -> Self {
        Self {
            generation,
            result: Err(code),
        }
    }
}

/// External credential verification, abstracted to a single async call.
///
/// Implementations resolve exactly once per call with acceptance or a
/// [`DenialCode`]. Latency is the implementation's business: the flow
/// tolerates slow resolutions by dropping the ones whose generation has
/// been superseded.
///
/// The success value is not modeled beyond "ok"; session tokens belong to
/// the out-of-scope transport layer.
pub trait Authenticator: Send + Sync + 'static {
    /// Verify one user name and password pair.
    fn verify(
        &self,
        user_name: &str,
        password: &str,
    ) -> impl Future<Output = Result<(), DenialCode>> + Send;
}
