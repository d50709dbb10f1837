//! The flow machine: event dispatch, eventless cascades, outcome
//! resolution.

use crate::core::{
    credentials_entered, email_well_formed, recovery_email_registered, Event, EventKind,
    FlowContext, FlowHistory, FlowState, RecoveryState, SignInState, TransitionRecord,
};
use crate::invoke::{AttemptOutcome, AuthAttempt};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use super::actions;
use super::error::FlowError;

/// Hop limit for one eventless cascade. The deepest legitimate cascade is a
/// single hop (a check state routing to a leaf), so hitting this means the
/// guard wiring is broken.
const CASCADE_LIMIT: usize = 8;

/// What [`FlowMachine::send`] did with an event.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum SendOutcome {
    /// The event was accepted and the machine settled into a new
    /// configuration.
    Handled,
    /// The event was accepted and an authentication attempt must now be
    /// run; its outcome comes back through [`FlowMachine::resolve`].
    Invoked(AuthAttempt),
    /// The configuration does not accept this event kind; nothing changed.
    Ignored,
}

/// What [`FlowMachine::resolve`] did with an attempt outcome.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Resolution {
    /// The outcome matched the in-flight attempt and was applied.
    Applied,
    /// The outcome was superseded or arrived outside `authenticating`;
    /// state and context are untouched.
    Stale,
}

/// Point-in-time view of a settled flow, for the presentation layer.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct FlowSnapshot {
    /// Settled state configuration.
    pub state: FlowState,
    /// Context fields as of the last settled transition.
    pub context: FlowContext,
    /// Event kinds the configuration accepts, leaf handlers first.
    pub available: Vec<EventKind>,
}

/// Raw dispatch result, before the settle cascade runs.
enum Step {
    Moved(FlowState),
    Invoking(AuthAttempt),
}

/// A single authentication flow: current configuration, context, and
/// transition history.
///
/// Events go in through [`send`](FlowMachine::send); attempt outcomes come
/// back through [`resolve`](FlowMachine::resolve). Both process to
/// completion synchronously, including any eventless cascade, so a caller
/// only ever observes settled configurations.
///
/// A machine is lenient by default: events the configuration does not
/// accept are ignored. [`strict`](FlowMachine::strict) builds a machine
/// that surfaces them as [`FlowError::UnhandledEvent`] instead.
///
/// # Example
///
/// ```rust
/// use authflow::core::{ContextPatch, Event};
/// use authflow::invoke::AttemptOutcome;
/// use authflow::machine::{FlowMachine, SendOutcome};
///
/// let mut flow = FlowMachine::new();
/// assert_eq!(flow.state().path(), "signIn.empty");
///
/// flow.send(Event::update(
///     ContextPatch::new().user_name("admin").password("hunter2"),
/// ))
/// .unwrap();
/// assert_eq!(flow.state().path(), "signIn.ready");
///
/// let attempt = match flow.send(Event::Authenticate).unwrap() {
///     SendOutcome::Invoked(attempt) => attempt,
///     other => panic!("expected an attempt, got {other:?}"),
/// };
/// assert_eq!(flow.state().path(), "authenticating");
///
/// flow.resolve(AttemptOutcome::success(attempt.generation));
/// assert_eq!(flow.state().path(), "authenticated");
/// assert!(flow.context().signed_in);
/// assert_eq!(flow.context().password, "");
/// ```
#[derive(Clone, Debug)]
pub struct FlowMachine {
    id: Uuid,
    state: FlowState,
    context: FlowContext,
    history: FlowHistory,
    generation: u64,
    strict: bool,
}

impl FlowMachine {
    /// Create a flow at credential entry with a zeroed context.
    pub fn new() -> Self {
        Self::with_policy(false)
    }

    /// Create a flow that surfaces unhandled events as errors instead of
    /// ignoring them.
    pub fn strict() -> Self {
        Self::with_policy(true)
    }

    fn with_policy(strict: bool) -> Self {
        Self {
            id: Uuid::new_v4(),
            // A zeroed context cannot pass the credential guard, so the
            // sign-in check settles in `empty` without running it.
            state: FlowState::SignIn(SignInState::Empty),
            context: FlowContext::default(),
            history: FlowHistory::new(),
            generation: 0,
            strict,
        }
    }

    /// Instance id, for correlating log lines across concurrent flows.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Current settled configuration.
    pub fn state(&self) -> FlowState {
        self.state
    }

    /// Current context.
    pub fn context(&self) -> &FlowContext {
        &self.context
    }

    /// Settled transitions so far.
    pub fn history(&self) -> &FlowHistory {
        &self.history
    }

    /// Process one event to completion.
    ///
    /// Accepted events settle into a new configuration before this returns;
    /// [`SendOutcome::Invoked`] additionally hands the caller an
    /// authentication attempt to run. An event the configuration does not
    /// accept is [`SendOutcome::Ignored`] on a lenient machine and
    /// [`FlowError::UnhandledEvent`] on a strict one; either way the
    /// machine is untouched.
    pub fn send(&mut self, event: Event) -> Result<SendOutcome, FlowError> {
        let from = self.state;
        let kind = event.kind();

        let Some(step) = self.dispatch(event) else {
            if self.strict {
                return Err(FlowError::UnhandledEvent {
                    event: kind,
                    state: self.state,
                });
            }
            debug!(flow = %self.id, event = %kind, state = %self.state, "ignoring unhandled event");
            return Ok(SendOutcome::Ignored);
        };

        let (target, attempt) = match step {
            Step::Moved(target) => (target, None),
            Step::Invoking(attempt) => (FlowState::Authenticating, Some(attempt)),
        };

        self.state = self.settle(target)?;
        self.push_record(from, kind);
        debug!(flow = %self.id, event = %kind, from = %from, to = %self.state, "transition");

        Ok(match attempt {
            Some(attempt) => SendOutcome::Invoked(attempt),
            None => SendOutcome::Handled,
        })
    }

    /// Deliver the outcome of an authentication attempt.
    ///
    /// An outcome is applied only while the machine is still in
    /// `authenticating` *and* the outcome's generation matches the attempt
    /// in flight. Anything else is [`Resolution::Stale`]: late or duplicate
    /// resolutions never mutate a context that has moved on.
    pub fn resolve(&mut self, outcome: AttemptOutcome) -> Resolution {
        if self.state != FlowState::Authenticating || outcome.generation != self.generation {
            debug!(
                flow = %self.id,
                generation = outcome.generation,
                current = self.generation,
                state = %self.state,
                "dropping stale attempt outcome"
            );
            return Resolution::Stale;
        }

        let from = self.state;
        let (target, kind) = match outcome.result {
            Ok(()) => {
                actions::finish_success(&mut self.context);
                (FlowState::Authenticated, EventKind::Success)
            }
            Err(code) => {
                actions::finish_denied(&mut self.context, code);
                (FlowState::Failure, EventKind::Error)
            }
        };

        // Both outcome targets are settled leaves; no cascade can follow.
        self.state = target;
        self.push_record(from, kind);
        debug!(flow = %self.id, from = %from, to = %self.state, "attempt resolved");

        Resolution::Applied
    }

    /// Event kinds the current configuration accepts, in declaration
    /// order: leaf handlers first, then ancestor handlers.
    ///
    /// Meant for the boundary layer to enable and disable actions; sending
    /// a kind not listed here is exactly what `send` ignores or rejects.
    pub fn available_events(&self) -> Vec<EventKind> {
        use EventKind as E;
        use RecoveryState as Recovery;
        use SignInState as SignIn;

        match self.state {
            FlowState::SignIn(SignIn::Empty) => vec![E::Update, E::ForgotPassword, E::SignUp],
            FlowState::SignIn(SignIn::Ready) => {
                vec![E::Update, E::ForgotPassword, E::Authenticate, E::SignUp]
            }
            FlowState::SignIn(SignIn::ForgotPassword(Recovery::EnterEmail)) => {
                vec![E::Update, E::Cancel, E::SignUp]
            }
            FlowState::SignIn(SignIn::ForgotPassword(Recovery::ReadyToSend)) => {
                vec![E::Update, E::RequestOneTimePassword, E::Cancel, E::SignUp]
            }
            FlowState::SignIn(SignIn::ForgotPassword(
                Recovery::OneTimePasswordSent | Recovery::UnknownEmail,
            )) => vec![E::Ok, E::Cancel, E::SignUp],
            // Transient states are never settled and the invoking state
            // waits only for its outcome.
            FlowState::SignIn(SignIn::Check)
            | FlowState::SignIn(SignIn::ForgotPassword(Recovery::CheckEmailEntered))
            | FlowState::Authenticating => Vec::new(),
            FlowState::Authenticated => vec![E::SignOut],
            FlowState::Failure => vec![E::SignIn, E::SignUp],
            FlowState::SignUp => vec![E::SignIn, E::Register],
            FlowState::Registering => vec![E::Error, E::Success],
            FlowState::Registered => vec![E::SignIn],
        }
    }

    /// Snapshot of the settled state, context, and accepted events.
    pub fn snapshot(&self) -> FlowSnapshot {
        FlowSnapshot {
            state: self.state,
            context: self.context.clone(),
            available: self.available_events(),
        }
    }

    /// Transition lookup for one event, leaf handlers before ancestor
    /// handlers. Returns `None` when no handler in the active configuration
    /// matches; merge and exit actions run here.
    fn dispatch(&mut self, event: Event) -> Option<Step> {
        use RecoveryState as Recovery;
        use SignInState as SignIn;

        match (self.state, event) {
            // signIn leaves: credential entry.
            (FlowState::SignIn(SignIn::Empty | SignIn::Ready), Event::Update { data }) => {
                self.context.apply(data);
                Some(Step::Moved(FlowState::sign_in()))
            }
            (FlowState::SignIn(SignIn::Empty | SignIn::Ready), Event::ForgotPassword) => {
                Some(Step::Moved(FlowState::forgot_password()))
            }
            (FlowState::SignIn(SignIn::Ready), Event::Authenticate) => {
                self.generation += 1;
                Some(Step::Invoking(AuthAttempt {
                    generation: self.generation,
                    user_name: self.context.user_name.clone(),
                    password: self.context.password.clone(),
                }))
            }

            // forgotPassword leaves.
            (
                FlowState::SignIn(SignIn::ForgotPassword(
                    Recovery::EnterEmail | Recovery::ReadyToSend,
                )),
                Event::Update { data },
            ) => {
                self.context.apply(data);
                Some(Step::Moved(FlowState::forgot_password()))
            }
            (
                FlowState::SignIn(SignIn::ForgotPassword(Recovery::ReadyToSend)),
                Event::RequestOneTimePassword,
            ) => {
                if recovery_email_registered(&self.context) {
                    Some(Step::Moved(FlowState::SignIn(SignIn::ForgotPassword(
                        Recovery::OneTimePasswordSent,
                    ))))
                } else {
                    actions::flag_unknown_recipient(&mut self.context);
                    Some(Step::Moved(FlowState::SignIn(SignIn::ForgotPassword(
                        Recovery::UnknownEmail,
                    ))))
                }
            }
            (
                FlowState::SignIn(SignIn::ForgotPassword(Recovery::OneTimePasswordSent)),
                Event::Ok,
            ) => Some(Step::Moved(FlowState::sign_in())),
            (FlowState::SignIn(SignIn::ForgotPassword(Recovery::UnknownEmail)), Event::Ok) => {
                Some(Step::Moved(FlowState::SignIn(SignIn::ForgotPassword(
                    Recovery::EnterEmail,
                ))))
            }

            // forgotPassword compound: cancelling anywhere in recovery
            // returns to the credential check, credentials untouched.
            (FlowState::SignIn(SignIn::ForgotPassword(_)), Event::Cancel) => {
                Some(Step::Moved(FlowState::sign_in()))
            }

            // signIn compound.
            (FlowState::SignIn(_), Event::SignUp) => Some(Step::Moved(FlowState::SignUp)),

            // Top-level leaves.
            (FlowState::Authenticated, Event::SignOut) => {
                actions::sign_out(&mut self.context);
                Some(Step::Moved(FlowState::sign_in()))
            }
            (FlowState::Failure, Event::SignIn) => Some(Step::Moved(FlowState::sign_in())),
            (FlowState::Failure, Event::SignUp) => Some(Step::Moved(FlowState::SignUp)),
            (FlowState::SignUp, Event::SignIn) => Some(Step::Moved(FlowState::sign_in())),
            (FlowState::SignUp, Event::Register) => Some(Step::Moved(FlowState::Registering)),
            (FlowState::Registering, Event::Error) => Some(Step::Moved(FlowState::SignUp)),
            (FlowState::Registering, Event::Success) => Some(Step::Moved(FlowState::Registered)),
            (FlowState::Registered, Event::SignIn) => Some(Step::Moved(FlowState::sign_in())),

            _ => None,
        }
    }

    /// Run the eventless cascade from `target` until the configuration
    /// settles, re-evaluating guards over the current context each hop.
    fn settle(&self, target: FlowState) -> Result<FlowState, FlowError> {
        let mut current = target;
        for _ in 0..CASCADE_LIMIT {
            match self.advance(current) {
                Some(next) => current = next,
                None => return Ok(current),
            }
        }
        Err(FlowError::UnsettledCascade {
            limit: CASCADE_LIMIT,
            state: current,
        })
    }

    /// One eventless hop: transient states route by their guard, first
    /// satisfied guard wins, declared default otherwise. Settled states
    /// return `None`.
    fn advance(&self, state: FlowState) -> Option<FlowState> {
        use RecoveryState as Recovery;
        use SignInState as SignIn;

        match state {
            FlowState::SignIn(SignIn::Check) => Some(if credentials_entered(&self.context) {
                FlowState::SignIn(SignIn::Ready)
            } else {
                FlowState::SignIn(SignIn::Empty)
            }),
            FlowState::SignIn(SignIn::ForgotPassword(Recovery::CheckEmailEntered)) => {
                Some(if email_well_formed(&self.context) {
                    FlowState::SignIn(SignIn::ForgotPassword(Recovery::ReadyToSend))
                } else {
                    FlowState::SignIn(SignIn::ForgotPassword(Recovery::EnterEmail))
                })
            }
            _ => None,
        }
    }

    fn push_record(&mut self, from: FlowState, event: EventKind) {
        self.history = self.history.record(TransitionRecord {
            from,
            to: self.state,
            event,
            timestamp: Utc::now(),
        });
    }
}

impl Default for FlowMachine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ContextPatch;
    use crate::invoke::DenialCode;

    fn update(patch: ContextPatch) -> Event {
        Event::update(patch)
    }

    /// Machine driven to `signIn.ready` with admin credentials.
    fn ready_machine() -> FlowMachine {
        let mut flow = FlowMachine::new();
        flow.send(update(
            ContextPatch::new().user_name("admin").password("hunter2"),
        ))
        .unwrap();
        assert_eq!(flow.state().path(), "signIn.ready");
        flow
    }

    /// Machine driven into `authenticating`; returns the attempt.
    fn invoking_machine() -> (FlowMachine, AuthAttempt) {
        let mut flow = ready_machine();
        let attempt = match flow.send(Event::Authenticate).unwrap() {
            SendOutcome::Invoked(attempt) => attempt,
            other => panic!("expected an invoked attempt, got {other:?}"),
        };
        (flow, attempt)
    }

    #[test]
    fn fresh_flow_rests_in_empty() {
        let flow = FlowMachine::new();

        assert_eq!(flow.state().path(), "signIn.empty");
        assert_eq!(flow.context(), &FlowContext::default());
        assert!(flow.history().records().is_empty());
    }

    #[test]
    fn update_settles_by_credential_presence() {
        let mut flow = FlowMachine::new();

        flow.send(update(ContextPatch::new().user_name("admin"))).unwrap();
        assert_eq!(flow.state().path(), "signIn.empty");

        flow.send(update(ContextPatch::new().password("hunter2"))).unwrap();
        assert_eq!(flow.state().path(), "signIn.ready");

        flow.send(update(ContextPatch::new().password(""))).unwrap();
        assert_eq!(flow.state().path(), "signIn.empty");
    }

    #[test]
    fn callers_never_observe_transient_states() {
        let mut flow = FlowMachine::new();
        assert!(!flow.state().is_transient());

        flow.send(update(ContextPatch::new().user_name("admin"))).unwrap();
        assert!(!flow.state().is_transient());

        flow.send(Event::ForgotPassword).unwrap();
        assert!(!flow.state().is_transient());
    }

    #[test]
    fn authenticate_hands_out_the_entered_credentials() {
        let (flow, attempt) = invoking_machine();

        assert_eq!(flow.state().path(), "authenticating");
        assert_eq!(attempt.user_name, "admin");
        assert_eq!(attempt.password, "hunter2");
        assert_eq!(attempt.generation, 1);
    }

    #[test]
    fn successful_outcome_signs_in_and_scrubs_the_password() {
        let (mut flow, attempt) = invoking_machine();

        let resolution = flow.resolve(AttemptOutcome::success(attempt.generation));

        assert_eq!(resolution, Resolution::Applied);
        assert_eq!(flow.state().path(), "authenticated");
        assert!(flow.context().signed_in);
        assert_eq!(flow.context().password, "");
        assert_eq!(flow.context().user_name, "admin");
    }

    #[test]
    fn denial_codes_map_to_failure_messages() {
        for (code, message) in [
            (DenialCode::UNKNOWN_USER, "Unknown user name"),
            (DenialCode::INVALID_PASSWORD, "Invalid password"),
            (DenialCode(99), "Authentication failed"),
        ] {
            let (mut flow, attempt) = invoking_machine();

            flow.resolve(AttemptOutcome::denied(attempt.generation, code));

            assert_eq!(flow.state().path(), "failure");
            assert_eq!(flow.context().error, message);
            assert!(!flow.context().signed_in);
            assert_eq!(flow.context().password, "");
        }
    }

    #[test]
    fn stale_generation_outcome_is_dropped() {
        let (mut flow, attempt) = invoking_machine();
        let before = flow.context().clone();

        let resolution = flow.resolve(AttemptOutcome::success(attempt.generation + 1));

        assert_eq!(resolution, Resolution::Stale);
        assert_eq!(flow.state().path(), "authenticating");
        assert_eq!(flow.context(), &before);
    }

    #[test]
    fn duplicate_outcome_is_dropped() {
        let (mut flow, attempt) = invoking_machine();

        assert_eq!(
            flow.resolve(AttemptOutcome::success(attempt.generation)),
            Resolution::Applied
        );
        assert_eq!(
            flow.resolve(AttemptOutcome::denied(attempt.generation, DenialCode(3))),
            Resolution::Stale
        );

        assert_eq!(flow.state().path(), "authenticated");
        assert!(flow.context().signed_in);
    }

    #[test]
    fn outcome_outside_authenticating_is_dropped() {
        let mut flow = ready_machine();
        let before = flow.context().clone();

        let resolution = flow.resolve(AttemptOutcome::success(1));

        assert_eq!(resolution, Resolution::Stale);
        assert_eq!(flow.state().path(), "signIn.ready");
        assert_eq!(flow.context(), &before);
    }

    #[test]
    fn recovery_walk_reaches_one_time_password_sent() {
        let mut flow = ready_machine();

        flow.send(Event::ForgotPassword).unwrap();
        assert_eq!(flow.state().path(), "signIn.forgotPassword.enterEmail");

        flow.send(update(ContextPatch::new().email("bad"))).unwrap();
        assert_eq!(flow.state().path(), "signIn.forgotPassword.enterEmail");

        flow.send(update(ContextPatch::new().email("user@company.com")))
            .unwrap();
        assert_eq!(flow.state().path(), "signIn.forgotPassword.readyToSend");

        flow.send(Event::RequestOneTimePassword).unwrap();
        assert_eq!(
            flow.state().path(),
            "signIn.forgotPassword.oneTimePasswordSent"
        );
        assert_eq!(flow.context().error, "");

        // Credentials were untouched by the recovery walk, so the check
        // resettles in ready.
        flow.send(Event::Ok).unwrap();
        assert_eq!(flow.state().path(), "signIn.ready");
    }

    #[test]
    fn unregistered_email_flags_unknown_recipient() {
        let mut flow = ready_machine();
        flow.send(Event::ForgotPassword).unwrap();
        flow.send(update(ContextPatch::new().email("other@x.com"))).unwrap();
        assert_eq!(flow.state().path(), "signIn.forgotPassword.readyToSend");

        flow.send(Event::RequestOneTimePassword).unwrap();
        assert_eq!(flow.state().path(), "signIn.forgotPassword.unknownEmail");
        assert_eq!(flow.context().error, "Unknown email address");

        flow.send(Event::Ok).unwrap();
        assert_eq!(flow.state().path(), "signIn.forgotPassword.enterEmail");
    }

    #[test]
    fn cancel_returns_to_the_credential_check_from_every_recovery_leaf() {
        let walks: [&[Event]; 4] = [
            // enterEmail
            &[Event::ForgotPassword],
            // readyToSend
            &[
                Event::ForgotPassword,
                update(ContextPatch::new().email("user@company.com")),
            ],
            // oneTimePasswordSent
            &[
                Event::ForgotPassword,
                update(ContextPatch::new().email("user@company.com")),
                Event::RequestOneTimePassword,
            ],
            // unknownEmail
            &[
                Event::ForgotPassword,
                update(ContextPatch::new().email("other@x.com")),
                Event::RequestOneTimePassword,
            ],
        ];

        for walk in walks {
            let mut flow = ready_machine();
            for event in walk {
                flow.send(event.clone()).unwrap();
            }

            flow.send(Event::Cancel).unwrap();

            // Credentials survived recovery, so the check lands in ready.
            assert_eq!(flow.state().path(), "signIn.ready");
            assert_eq!(flow.context().user_name, "admin");
            assert_eq!(flow.context().password, "hunter2");
        }
    }

    #[test]
    fn cancel_with_cleared_credentials_lands_in_empty() {
        let mut flow = FlowMachine::new();
        flow.send(Event::ForgotPassword).unwrap();

        flow.send(Event::Cancel).unwrap();

        assert_eq!(flow.state().path(), "signIn.empty");
    }

    #[test]
    fn sign_in_after_failure_rechecks_stale_credentials() {
        let (mut flow, attempt) = invoking_machine();
        flow.resolve(AttemptOutcome::denied(
            attempt.generation,
            DenialCode::UNKNOWN_USER,
        ));
        assert_eq!(flow.state().path(), "failure");

        // The denial scrubbed the password, so the re-check cannot land in
        // ready.
        flow.send(Event::SignIn).unwrap();
        assert_eq!(flow.state().path(), "signIn.empty");
        assert_eq!(flow.context().user_name, "admin");
    }

    #[test]
    fn sign_out_returns_to_credential_entry() {
        let (mut flow, attempt) = invoking_machine();
        flow.resolve(AttemptOutcome::success(attempt.generation));

        flow.send(Event::SignOut).unwrap();

        assert_eq!(flow.state().path(), "signIn.empty");
        assert!(!flow.context().signed_in);
    }

    #[test]
    fn registration_branch_round_trip() {
        let mut flow = FlowMachine::new();

        flow.send(Event::SignUp).unwrap();
        assert_eq!(flow.state().path(), "signUp");

        flow.send(Event::Register).unwrap();
        assert_eq!(flow.state().path(), "registering");

        flow.send(Event::Error).unwrap();
        assert_eq!(flow.state().path(), "signUp");

        flow.send(Event::Register).unwrap();
        flow.send(Event::Success).unwrap();
        assert_eq!(flow.state().path(), "registered");

        flow.send(Event::SignIn).unwrap();
        assert_eq!(flow.state().path(), "signIn.empty");
    }

    #[test]
    fn sign_up_is_reachable_from_recovery_leaves() {
        let mut flow = ready_machine();
        flow.send(Event::ForgotPassword).unwrap();

        flow.send(Event::SignUp).unwrap();

        assert_eq!(flow.state().path(), "signUp");
    }

    #[test]
    fn unhandled_event_is_ignored_by_default() {
        let mut flow = FlowMachine::new();
        let before = flow.snapshot();

        let outcome = flow.send(Event::Authenticate).unwrap();

        assert_eq!(outcome, SendOutcome::Ignored);
        assert_eq!(flow.snapshot(), before);
        assert!(flow.history().records().is_empty());
    }

    #[test]
    fn strict_machine_surfaces_unhandled_events() {
        let mut flow = FlowMachine::strict();

        let error = flow.send(Event::Authenticate).unwrap_err();

        assert_eq!(
            error,
            FlowError::UnhandledEvent {
                event: EventKind::Authenticate,
                state: FlowState::SignIn(SignInState::Empty),
            }
        );
        assert_eq!(flow.state().path(), "signIn.empty");
    }

    #[test]
    fn strict_machine_accepts_declared_events() {
        let mut flow = FlowMachine::strict();

        flow.send(update(
            ContextPatch::new().user_name("admin").password("hunter2"),
        ))
        .unwrap();

        assert_eq!(flow.state().path(), "signIn.ready");
    }

    #[test]
    fn authenticate_is_unavailable_outside_ready() {
        let mut flow = FlowMachine::new();
        assert!(!flow.available_events().contains(&EventKind::Authenticate));
        assert_eq!(flow.send(Event::Authenticate).unwrap(), SendOutcome::Ignored);

        flow.send(update(
            ContextPatch::new().user_name("admin").password("hunter2"),
        ))
        .unwrap();
        assert!(flow.available_events().contains(&EventKind::Authenticate));
    }

    #[test]
    fn availability_lists_leaf_handlers_before_ancestors() {
        let flow = ready_machine();

        assert_eq!(
            flow.available_events(),
            vec![
                EventKind::Update,
                EventKind::ForgotPassword,
                EventKind::Authenticate,
                EventKind::SignUp,
            ]
        );
    }

    #[test]
    fn invoking_state_accepts_no_events() {
        let (mut flow, _attempt) = invoking_machine();

        assert!(flow.available_events().is_empty());
        assert_eq!(
            flow.send(update(ContextPatch::new().user_name("late"))).unwrap(),
            SendOutcome::Ignored
        );
        assert_eq!(flow.context().user_name, "admin");
    }

    #[test]
    fn history_folds_cascades_into_settled_records() {
        let (mut flow, attempt) = invoking_machine();
        flow.resolve(AttemptOutcome::success(attempt.generation));

        let visited: Vec<&str> = flow.history().visited().iter().map(FlowState::path).collect();

        assert_eq!(
            visited,
            vec!["signIn.empty", "signIn.ready", "authenticating", "authenticated"]
        );
        assert_eq!(
            flow.history().records().last().unwrap().event,
            EventKind::Success
        );
    }

    #[test]
    fn snapshot_reflects_the_settled_machine() {
        let flow = ready_machine();

        let snapshot = flow.snapshot();

        assert_eq!(snapshot.state, flow.state());
        assert_eq!(&snapshot.context, flow.context());
        assert_eq!(snapshot.available, flow.available_events());
    }

    #[test]
    fn snapshot_round_trips_through_json() {
        let snapshot = ready_machine().snapshot();

        let json = serde_json::to_string(&snapshot).unwrap();
        let back: FlowSnapshot = serde_json::from_str(&json).unwrap();

        assert_eq!(snapshot, back);
    }

    #[test]
    fn each_flow_has_its_own_identity() {
        let one = FlowMachine::new();
        let two = FlowMachine::new();

        assert_ne!(one.id(), two.id());
    }
}
