//! In-memory reference authenticator.

use super::{Authenticator, DenialCode};
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::time::Duration;

/// Authenticator backed by an in-memory account table.
///
/// The reference double for tests and demos: verification compares the
/// supplied credentials against registered accounts after a fixed
/// artificial delay standing in for transport latency. An unknown user
/// denies with code `1`, a wrong password with code `2`.
///
/// # Example
///
/// ```rust
/// use authflow::invoke::{Authenticator, DenialCode, DirectoryAuthenticator};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let directory = DirectoryAuthenticator::new().with_account("admin", "hunter2");
///
/// assert_eq!(directory.verify("admin", "hunter2").await, Ok(()));
/// assert_eq!(
///     directory.verify("admin", "wrong").await,
///     Err(DenialCode::INVALID_PASSWORD)
/// );
/// assert_eq!(
///     directory.verify("nobody", "x").await,
///     Err(DenialCode::UNKNOWN_USER)
/// );
/// # }
/// ```
#[derive(Clone, Default)]
pub struct DirectoryAuthenticator {
    accounts: HashMap<String, String>,
    delay: Duration,
}

impl DirectoryAuthenticator {
    /// Empty directory with no artificial delay.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an account.
    pub fn with_account(
        mut self,
        user_name: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.accounts.insert(user_name.into(), password.into());
        self
    }

    /// Delay applied to every attempt before it resolves.
    ///
    /// Useful for observing the `authenticating` state or racing events
    /// against an in-flight attempt in tests.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    fn decide(&self, user_name: &str, password: &str) -> Result<(), DenialCode> {
        match self.accounts.get(user_name) {
            None => Err(DenialCode::UNKNOWN_USER),
            Some(registered) if registered.as_str() != password => {
                Err(DenialCode::INVALID_PASSWORD)
            }
            Some(_) => Ok(()),
        }
    }
}

impl Authenticator for DirectoryAuthenticator {
    fn verify(
        &self,
        user_name: &str,
        password: &str,
    ) -> impl Future<Output = Result<(), DenialCode>> + Send {
        let decision = self.decide(user_name, password);
        let delay = self.delay;
        async move {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            decision
        }
    }
}

impl fmt::Debug for DirectoryAuthenticator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Account passwords stay out of logs; the count is enough.
        f.debug_struct("DirectoryAuthenticator")
            .field("accounts", &self.accounts.len())
            .field("delay", &self.delay)
            .finish()
    }
}
