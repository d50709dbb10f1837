//! Sign-In Flow
//!
//! This example demonstrates the synchronous flow machine on its own,
//! with the caller playing the part of the authentication backend.
//!
//! Key concepts:
//! - Field updates re-checked by the credential guard
//! - Availability changing as the flow moves
//! - Resolving an attempt to success or failure
//! - The transition history kept along the way
//!
//! Run with: cargo run --example sign_in_flow

use authflow::{
    AttemptOutcome, ContextPatch, DenialCode, Event, FlowMachine, SendOutcome,
};

fn show(flow: &FlowMachine) {
    let available: Vec<_> = flow
        .available_events()
        .iter()
        .map(|kind| kind.as_str())
        .collect();
    println!("  state: {:<24} can send: [{}]", flow.state(), available.join(", "));
}

fn main() {
    println!("=== Sign-In Flow Example ===\n");

    let mut flow = FlowMachine::new();
    println!("Fresh flow:");
    show(&flow);

    // Scenario 1: filling in the form
    println!("\nScenario 1: Enter Credentials");
    flow.send(Event::update(ContextPatch::new().user_name("admin")))
        .unwrap();
    println!("  typed a user name only");
    show(&flow);

    flow.send(Event::update(ContextPatch::new().password("hunter2")))
        .unwrap();
    println!("  typed the password too");
    show(&flow);
    println!("  ✓ Both fields present, the flow is ready\n");

    // Scenario 2: a denied attempt
    println!("Scenario 2: Wrong Password");
    let attempt = match flow.send(Event::Authenticate).unwrap() {
        SendOutcome::Invoked(attempt) => attempt,
        other => panic!("expected an invocation, got {:?}", other),
    };
    show(&flow);

    flow.resolve(AttemptOutcome::denied(
        attempt.generation,
        DenialCode::INVALID_PASSWORD,
    ));
    show(&flow);
    println!("  ✗ Denied: {}", flow.context().error);
    println!("  password was scrubbed: {:?}\n", flow.context().password);

    // Scenario 3: trying again and succeeding
    println!("Scenario 3: Retry and Succeed");
    flow.send(Event::SignIn).unwrap();
    println!("  back to the form (user name survived)");
    show(&flow);

    flow.send(Event::update(ContextPatch::new().password("hunter2")))
        .unwrap();
    let attempt = match flow.send(Event::Authenticate).unwrap() {
        SendOutcome::Invoked(attempt) => attempt,
        other => panic!("expected an invocation, got {:?}", other),
    };
    flow.resolve(AttemptOutcome::success(attempt.generation));
    show(&flow);
    println!("  ✓ Signed in as {}\n", flow.context().user_name);

    // Scenario 4: signing out again
    println!("Scenario 4: Sign Out");
    flow.send(Event::SignOut).unwrap();
    show(&flow);
    println!("  ✓ Back at credential entry\n");

    println!("Everything the flow went through:");
    for record in flow.history().records() {
        println!("  {}", record);
    }

    println!("\nKey Takeaways:");
    println!("- UPDATE events merge fields; guards decide empty vs ready");
    println!("- AUTHENTICATE hands out an attempt for the caller to resolve");
    println!("- Denials scrub the password and leave a message behind");
    println!("- The history records every hop, including the outcomes");

    println!("\n=== Example Complete ===");
}
