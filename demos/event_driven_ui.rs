//! Event-Driven UI
//!
//! This example demonstrates the async service front: a renderer task
//! watches the snapshot channel while the main task plays the part of a
//! user clicking through a sign-in screen.
//!
//! Key concepts:
//! - Spawning a `FlowService` around an authenticator
//! - Subscribing to snapshots the way a screen would
//! - The authenticating state showing up while the backend is slow
//! - Teardown waking the renderer when the service is dropped
//!
//! Run with: cargo run --example event_driven_ui

use std::time::Duration;

use authflow::{ContextPatch, DirectoryAuthenticator, Event, FlowService};
use tokio::time::sleep;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "authflow=debug".into()),
        )
        .init();

    println!("=== Event-Driven UI Example ===\n");

    let service = FlowService::spawn(
        DirectoryAuthenticator::new()
            .with_account("admin", "hunter2")
            .with_delay(Duration::from_millis(300)),
    );

    // The "screen": prints every snapshot the service publishes.
    let mut snapshots = service.subscribe();
    let renderer = tokio::spawn(async move {
        loop {
            let line = {
                let snapshot = snapshots.borrow_and_update();
                let buttons: Vec<_> = snapshot
                    .available
                    .iter()
                    .map(|kind| kind.as_str())
                    .collect();
                format!(
                    "[screen] {:<24} buttons: [{}]",
                    snapshot.state,
                    buttons.join(", ")
                )
            };
            println!("{}", line);
            if snapshots.changed().await.is_err() {
                break;
            }
        }
        println!("[screen] service is gone, closing");
    });
    sleep(Duration::from_millis(20)).await;

    println!("[user]   types a user name");
    service
        .send(Event::update(ContextPatch::new().user_name("admin")))
        .unwrap();
    sleep(Duration::from_millis(20)).await;

    println!("[user]   types the password");
    service
        .send(Event::update(ContextPatch::new().password("hunter2")))
        .unwrap();
    sleep(Duration::from_millis(20)).await;

    println!("[user]   presses Sign In");
    service.send(Event::Authenticate).unwrap();

    // Long enough for the slow backend to come back.
    sleep(Duration::from_millis(600)).await;
    let snapshot = service.snapshot();
    println!("[user]   sees signed_in = {}", snapshot.context.signed_in);

    println!("[user]   presses Sign Out");
    service.send(Event::SignOut).unwrap();
    sleep(Duration::from_millis(20)).await;

    println!("[user]   closes the app");
    drop(service);
    let _ = renderer.await;

    println!("\nKey Takeaways:");
    println!("- The watch channel always holds the latest snapshot");
    println!("- Buttons come straight from the published availability");
    println!("- Slow backends surface as the authenticating state");
    println!("- Dropping the service tears the whole pipeline down");

    println!("\n=== Example Complete ===");
}
