//! Transition history tracking.
//!
//! An immutable, timestamped log of settled transitions. Eventless hops are
//! folded into each record's destination, so history shows exactly what a
//! caller could have observed.

use super::event::EventKind;
use super::state::FlowState;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Record of one settled transition.
///
/// `to` is the configuration after any eventless cascade ran, never a
/// transient state. Attempt outcomes are recorded under the `SUCCESS` and
/// `ERROR` kinds, matching how they would look as events.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct TransitionRecord {
    /// Configuration before the event was processed.
    pub from: FlowState,
    /// Settled configuration afterwards.
    pub to: FlowState,
    /// What drove the transition.
    pub event: EventKind,
    /// When the transition settled.
    pub timestamp: DateTime<Utc>,
}

impl fmt::Display for TransitionRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} --{}--> {}", self.from, self.event, self.to)
    }
}

/// Ordered history of settled transitions.
///
/// History is immutable: [`record`](FlowHistory::record) returns a new
/// history with the record appended, leaving the original untouched.
///
/// # Example
///
/// ```rust
/// use authflow::core::{EventKind, FlowHistory, TransitionRecord};
/// use chrono::Utc;
///
/// let history = FlowHistory::new();
/// let history = history.record(TransitionRecord {
///     from: "signIn.empty".parse().unwrap(),
///     to: "signIn.ready".parse().unwrap(),
///     event: EventKind::Update,
///     timestamp: Utc::now(),
/// });
///
/// assert_eq!(history.records().len(), 1);
/// assert_eq!(history.visited().last().unwrap().path(), "signIn.ready");
/// ```
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct FlowHistory {
    records: Vec<TransitionRecord>,
}

impl FlowHistory {
    /// Create an empty history.
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    /// Append a record, returning a new history.
    ///
    /// Pure: the existing history is not mutated.
    ///
    /// # Example
    ///
    /// ```rust
    /// use authflow::core::{EventKind, FlowHistory, FlowState, TransitionRecord};
    /// use chrono::Utc;
    ///
    /// let history = FlowHistory::new();
    /// let grown = history.record(TransitionRecord {
    ///     from: FlowState::Failure,
    ///     to: "signIn.empty".parse().unwrap(),
    ///     event: EventKind::SignIn,
    ///     timestamp: Utc::now(),
    /// });
    ///
    /// assert_eq!(history.records().len(), 0);
    /// assert_eq!(grown.records().len(), 1);
    /// ```
    pub fn record(&self, record: TransitionRecord) -> Self {
        let mut records = self.records.clone();
        records.push(record);
        Self { records }
    }

    /// All records in order.
    pub fn records(&self) -> &[TransitionRecord] {
        &self.records
    }

    /// The configurations visited, in order: the first record's origin,
    /// then each destination.
    pub fn visited(&self) -> Vec<FlowState> {
        let mut visited = Vec::with_capacity(self.records.len() + 1);
        if let Some(first) = self.records.first() {
            visited.push(first.from);
        }
        for record in &self.records {
            visited.push(record.to);
        }
        visited
    }

    /// Wall-clock span from the first to the last record.
    ///
    /// `None` while the history is empty.
    pub fn duration(&self) -> Option<Duration> {
        let (first, last) = (self.records.first()?, self.records.last()?);
        last.timestamp
            .signed_duration_since(first.timestamp)
            .to_std()
            .ok()
    }
}
