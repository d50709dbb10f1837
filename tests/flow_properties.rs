//! Property-based tests for the authentication flow machine.
//!
//! These replay randomly generated event and outcome sequences against
//! fresh machines and check the invariants that must hold at every rest
//! point, however the flow got there.

use authflow::core::{email_well_formed, ContextPatch, Event, EventKind, FlowContext, FlowState};
use authflow::invoke::{AttemptOutcome, DenialCode};
use authflow::machine::{FlowMachine, Resolution, SendOutcome};
use proptest::prelude::*;

const ALL_KINDS: [EventKind; 12] = [
    EventKind::Update,
    EventKind::Authenticate,
    EventKind::ForgotPassword,
    EventKind::RequestOneTimePassword,
    EventKind::Ok,
    EventKind::Cancel,
    EventKind::SignUp,
    EventKind::SignIn,
    EventKind::SignOut,
    EventKind::Register,
    EventKind::Success,
    EventKind::Error,
];

/// Every kind except `Update`, which needs a payload.
const SIGNAL_KINDS: &[EventKind] = &[
    EventKind::Authenticate,
    EventKind::ForgotPassword,
    EventKind::RequestOneTimePassword,
    EventKind::Ok,
    EventKind::Cancel,
    EventKind::SignUp,
    EventKind::SignIn,
    EventKind::SignOut,
    EventKind::Register,
    EventKind::Success,
    EventKind::Error,
];

/// One step a caller (or the invoker loopback) can take against a flow.
#[derive(Clone, Debug)]
enum Op {
    Send(Event),
    /// Resolve with the generation of the latest attempt handed out.
    ResolveCurrent(Result<(), DenialCode>),
    /// Resolve with a generation no attempt ever carried.
    ResolveStale(Result<(), DenialCode>),
}

prop_compose! {
    fn arbitrary_patch()(
        user_name in prop::option::of("[a-z]{0,6}"),
        password in prop::option::of("[a-z]{0,6}"),
        email in prop::option::of("[a-z@. ]{0,12}"),
    ) -> ContextPatch {
        let mut patch = ContextPatch::new();
        if let Some(value) = user_name {
            patch = patch.user_name(value);
        }
        if let Some(value) = password {
            patch = patch.password(value);
        }
        if let Some(value) = email {
            patch = patch.email(value);
        }
        patch
    }
}

fn arbitrary_event() -> impl Strategy<Value = Event> {
    prop_oneof![
        1 => arbitrary_patch().prop_map(Event::update),
        3 => prop::sample::select(SIGNAL_KINDS).prop_map(representative),
    ]
}

fn arbitrary_result() -> impl Strategy<Value = Result<(), DenialCode>> {
    prop_oneof![
        Just(Ok(())),
        (0u32..5).prop_map(|code| Err(DenialCode(code))),
    ]
}

fn arbitrary_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => arbitrary_event().prop_map(Op::Send),
        2 => arbitrary_result().prop_map(Op::ResolveCurrent),
        1 => arbitrary_result().prop_map(Op::ResolveStale),
    ]
}

/// Replay a sequence against a fresh lenient machine, wiring resolutions
/// to the generations actually handed out, the way a driver loop would.
fn replay(ops: &[Op]) -> FlowMachine {
    let mut flow = FlowMachine::new();
    let mut generation = 0;

    for op in ops {
        match op {
            Op::Send(event) => {
                if let Ok(SendOutcome::Invoked(attempt)) = flow.send(event.clone()) {
                    generation = attempt.generation;
                }
            }
            Op::ResolveCurrent(result) => {
                flow.resolve(AttemptOutcome {
                    generation,
                    result: *result,
                });
            }
            Op::ResolveStale(result) => {
                flow.resolve(AttemptOutcome {
                    generation: generation + 1_000,
                    result: *result,
                });
            }
        }
    }
    flow
}

/// A payload-bearing stand-in for each event kind.
fn representative(kind: EventKind) -> Event {
    match kind {
        EventKind::Update => Event::update(ContextPatch::new()),
        EventKind::Authenticate => Event::Authenticate,
        EventKind::ForgotPassword => Event::ForgotPassword,
        EventKind::RequestOneTimePassword => Event::RequestOneTimePassword,
        EventKind::Ok => Event::Ok,
        EventKind::Cancel => Event::Cancel,
        EventKind::SignUp => Event::SignUp,
        EventKind::SignIn => Event::SignIn,
        EventKind::SignOut => Event::SignOut,
        EventKind::Register => Event::Register,
        EventKind::Success => Event::Success,
        EventKind::Error => Event::Error,
    }
}

proptest! {
    #[test]
    fn machine_never_rests_in_a_transient_state(
        ops in prop::collection::vec(arbitrary_op(), 0..32)
    ) {
        let flow = replay(&ops);
        prop_assert!(!flow.state().is_transient(), "rested in {}", flow.state());
    }

    #[test]
    fn signed_in_exactly_while_authenticated(
        ops in prop::collection::vec(arbitrary_op(), 0..32)
    ) {
        let flow = replay(&ops);
        prop_assert_eq!(
            flow.context().signed_in,
            flow.state() == FlowState::Authenticated
        );
    }

    #[test]
    fn password_is_scrubbed_once_an_attempt_concluded(
        ops in prop::collection::vec(arbitrary_op(), 0..32)
    ) {
        let flow = replay(&ops);
        if matches!(flow.state(), FlowState::Authenticated | FlowState::Failure) {
            prop_assert_eq!(flow.context().password.as_str(), "");
        }
    }

    #[test]
    fn sign_in_settles_by_credential_presence(
        patches in prop::collection::vec(arbitrary_patch(), 0..8)
    ) {
        let mut flow = FlowMachine::new();
        let mut expected = FlowContext::default();

        for patch in patches {
            expected.apply(patch.clone());
            flow.send(Event::update(patch)).unwrap();
        }

        let ready = !expected.user_name.is_empty() && !expected.password.is_empty();
        prop_assert_eq!(
            flow.state().path(),
            if ready { "signIn.ready" } else { "signIn.empty" }
        );
    }

    #[test]
    fn recovery_settles_by_email_shape(
        emails in prop::collection::vec("[a-zA-Z@. ]{0,16}", 1..6)
    ) {
        let mut flow = FlowMachine::new();
        flow.send(Event::ForgotPassword).unwrap();

        let mut expected = FlowContext::default();
        for email in emails {
            expected.apply(ContextPatch::new().email(email.clone()));
            flow.send(Event::update(ContextPatch::new().email(email))).unwrap();
        }

        let target = if email_well_formed(&expected) {
            "signIn.forgotPassword.readyToSend"
        } else {
            "signIn.forgotPassword.enterEmail"
        };
        prop_assert_eq!(flow.state().path(), target);
    }

    #[test]
    fn availability_agrees_with_acceptance(
        ops in prop::collection::vec(arbitrary_op(), 0..24)
    ) {
        let flow = replay(&ops);
        let available = flow.available_events();

        for kind in ALL_KINDS {
            let mut probe = flow.clone();
            let before = probe.snapshot();
            let outcome = probe.send(representative(kind)).unwrap();
            let accepted = !matches!(outcome, SendOutcome::Ignored);

            prop_assert_eq!(
                accepted,
                available.contains(&kind),
                "kind {} in state {}",
                kind,
                flow.state()
            );
            if !accepted {
                prop_assert_eq!(probe.snapshot(), before);
                prop_assert_eq!(
                    probe.history().records().len(),
                    flow.history().records().len()
                );
            }
        }
    }

    #[test]
    fn stale_outcomes_leave_the_machine_untouched(
        ops in prop::collection::vec(arbitrary_op(), 0..24),
        result in arbitrary_result(),
    ) {
        let mut flow = replay(&ops);
        let before = flow.snapshot();

        let resolution = flow.resolve(AttemptOutcome {
            generation: u64::MAX,
            result,
        });

        prop_assert_eq!(resolution, Resolution::Stale);
        prop_assert_eq!(flow.snapshot(), before);
    }

    #[test]
    fn cancel_round_trips_to_the_credential_check(
        user_name in "[a-z]{0,8}",
        password in "[a-z]{0,8}",
        email in "[a-z@.]{0,14}",
    ) {
        let mut flow = FlowMachine::new();
        flow.send(Event::update(
            ContextPatch::new()
                .user_name(user_name.clone())
                .password(password.clone()),
        ))
        .unwrap();
        flow.send(Event::ForgotPassword).unwrap();
        flow.send(Event::update(ContextPatch::new().email(email))).unwrap();

        flow.send(Event::Cancel).unwrap();

        let expected = if user_name.is_empty() || password.is_empty() {
            "signIn.empty"
        } else {
            "signIn.ready"
        };
        prop_assert_eq!(flow.state().path(), expected);
        prop_assert_eq!(&flow.context().user_name, &user_name);
        prop_assert_eq!(&flow.context().password, &password);
    }

    #[test]
    fn history_destination_tracks_the_current_state(
        ops in prop::collection::vec(arbitrary_op(), 1..24)
    ) {
        let flow = replay(&ops);

        match flow.history().visited().last() {
            Some(last) => prop_assert_eq!(*last, flow.state()),
            // Nothing was accepted; the flow never left credential entry.
            None => prop_assert_eq!(flow.state().path(), "signIn.empty"),
        }
    }
}
