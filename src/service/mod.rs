//! Event dispatcher: the single ingress the presentation layer drives.
//!
//! A [`FlowService`] owns a driver task that exclusively holds one
//! [`FlowMachine`]. Callers enqueue events without blocking and read
//! settled snapshots; authentication attempts run on their own tasks and
//! loop their outcomes back through the same queue as caller events, so an
//! outcome is always applied after the events enqueued before it arrived.

use crate::core::Event;
use crate::invoke::{AttemptOutcome, Authenticator};
use crate::machine::{FlowError, FlowMachine, FlowSnapshot, SendOutcome};
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::warn;

/// Everything the driver consumes, in arrival order.
enum Inbound {
    Event(Event),
    Outcome(AttemptOutcome),
}

/// Handle to a running flow.
///
/// Dropping the service tears the flow down: the driver stops, the context
/// is discarded with it, and pending attempt outcomes have nowhere to go.
/// Each service is fully independent; two open forms are two services.
///
/// # Example
///
/// ```rust
/// use authflow::core::{ContextPatch, Event};
/// use authflow::invoke::DirectoryAuthenticator;
/// use authflow::service::FlowService;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let service = FlowService::spawn(
///     DirectoryAuthenticator::new().with_account("admin", "hunter2"),
/// );
///
/// service
///     .send(Event::update(ContextPatch::new().user_name("admin")))
///     .unwrap();
///
/// let mut snapshots = service.subscribe();
/// snapshots.changed().await.unwrap();
/// assert_eq!(snapshots.borrow().context.user_name, "admin");
/// # }
/// ```
pub struct FlowService {
    inbound: mpsc::UnboundedSender<Inbound>,
    snapshots: watch::Receiver<FlowSnapshot>,
    driver: JoinHandle<()>,
}

impl FlowService {
    /// Start a fresh flow.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn spawn<A: Authenticator>(authenticator: A) -> Self {
        Self::with_machine(FlowMachine::new(), authenticator)
    }

    /// Start a flow around an existing machine, for a strict machine or a
    /// pre-seeded context.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn with_machine<A: Authenticator>(machine: FlowMachine, authenticator: A) -> Self {
        let (inbound_tx, inbound_rx) = mpsc::unbounded_channel();
        let (snapshot_tx, snapshot_rx) = watch::channel(machine.snapshot());
        let loopback = inbound_tx.clone();
        let driver = tokio::spawn(drive(
            machine,
            Arc::new(authenticator),
            inbound_rx,
            loopback,
            snapshot_tx,
        ));

        Self {
            inbound: inbound_tx,
            snapshots: snapshot_rx,
            driver,
        }
    }

    /// Enqueue one event for the flow.
    ///
    /// Never blocks; events are processed one at a time, in order, each to
    /// completion. Fails only with [`FlowError::Closed`] once the flow has
    /// wound down.
    pub fn send(&self, event: Event) -> Result<(), FlowError> {
        self.inbound
            .send(Inbound::Event(event))
            .map_err(|_| FlowError::Closed)
    }

    /// Latest settled snapshot.
    pub fn snapshot(&self) -> FlowSnapshot {
        self.snapshots.borrow().clone()
    }

    /// Subscribe to settled snapshots.
    ///
    /// Selector-style binding for a UI: await `changed()`, re-read, render.
    /// The receiver errors once the flow winds down.
    pub fn subscribe(&self) -> watch::Receiver<FlowSnapshot> {
        self.snapshots.clone()
    }
}

impl Drop for FlowService {
    fn drop(&mut self) {
        self.driver.abort();
    }
}

/// Driver loop. Exclusively owns the machine; everything arrives through
/// one queue, preserving the caller-then-outcome ordering guarantee.
async fn drive<A: Authenticator>(
    mut machine: FlowMachine,
    authenticator: Arc<A>,
    mut inbound: mpsc::UnboundedReceiver<Inbound>,
    loopback: mpsc::UnboundedSender<Inbound>,
    snapshots: watch::Sender<FlowSnapshot>,
) {
    while let Some(message) = inbound.recv().await {
        match message {
            Inbound::Event(event) => match machine.send(event) {
                Ok(SendOutcome::Invoked(attempt)) => {
                    let authenticator = Arc::clone(&authenticator);
                    let loopback = loopback.clone();
                    tokio::spawn(async move {
                        let result = authenticator
                            .verify(&attempt.user_name, &attempt.password)
                            .await;
                        let outcome = AttemptOutcome {
                            generation: attempt.generation,
                            result,
                        };
                        // A closed queue means the flow wound down while
                        // the attempt was in flight; the outcome has
                        // nowhere to go.
                        let _ = loopback.send(Inbound::Outcome(outcome));
                    });
                }
                Ok(_) => {}
                Err(error) => {
                    warn!(flow = %machine.id(), %error, "rejecting event");
                }
            },
            Inbound::Outcome(outcome) => {
                machine.resolve(outcome);
            }
        }
        snapshots.send_replace(machine.snapshot());
    }
}
