//! Password Recovery
//!
//! This example demonstrates the forgot-password branch of the flow,
//! including the dead ends a user can wander into and back out of.
//!
//! Key concepts:
//! - Eventless re-checks routing on the email shape
//! - The unknown-address dead end and its acknowledgement
//! - Cancelling back to credential entry without losing fields
//! - One-time password delivery and return to sign-in
//!
//! Run with: cargo run --example password_recovery

use authflow::core::REGISTERED_RECOVERY_EMAIL;
use authflow::{ContextPatch, Event, FlowMachine};

fn show(flow: &FlowMachine) {
    println!("  state: {}", flow.state());
}

fn main() {
    println!("=== Password Recovery Example ===\n");

    let mut flow = FlowMachine::new();
    flow.send(Event::update(
        ContextPatch::new().user_name("admin").password("hunter2"),
    ))
    .unwrap();
    println!("Starting from a filled-in form:");
    show(&flow);

    // Scenario 1: drifting into recovery and straight back out
    println!("\nScenario 1: Cancel Recovery");
    flow.send(Event::ForgotPassword).unwrap();
    show(&flow);
    flow.send(Event::Cancel).unwrap();
    show(&flow);
    println!(
        "  ✓ Cancelled; credentials survived ({:?})",
        flow.context().user_name
    );

    // Scenario 2: a malformed address goes nowhere
    println!("\nScenario 2: Malformed Address");
    flow.send(Event::ForgotPassword).unwrap();
    flow.send(Event::update(ContextPatch::new().email("not-an-address")))
        .unwrap();
    show(&flow);
    println!("  ✗ Still entering; the shape check wants user@host.tld");

    // Scenario 3: well-formed but unregistered
    println!("\nScenario 3: Unknown Address");
    flow.send(Event::update(ContextPatch::new().email("nobody@company.com")))
        .unwrap();
    show(&flow);
    flow.send(Event::RequestOneTimePassword).unwrap();
    show(&flow);
    println!("  ✗ {}", flow.context().error);
    flow.send(Event::Ok).unwrap();
    show(&flow);
    println!("  acknowledged, back at the email form");

    // Scenario 4: the registered address goes through
    println!("\nScenario 4: Registered Address");
    flow.send(Event::update(
        ContextPatch::new().email(REGISTERED_RECOVERY_EMAIL),
    ))
    .unwrap();
    show(&flow);
    flow.send(Event::RequestOneTimePassword).unwrap();
    show(&flow);
    println!("  ✓ One-time password sent to {}", flow.context().email);
    flow.send(Event::Ok).unwrap();
    show(&flow);
    println!("  ✓ Back at sign-in to use it\n");

    println!("Everything the flow went through:");
    for record in flow.history().records() {
        println!("  {}", record);
    }

    println!("\nKey Takeaways:");
    println!("- The email form re-checks its guard after every update");
    println!("- Unknown addresses are a dead end with an explicit way back");
    println!("- CANCEL works from anywhere inside recovery");
    println!("- Finishing recovery lands back at credential entry");

    println!("\n=== Example Complete ===");
}
