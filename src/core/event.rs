//! Inbound events and their payload-free discriminants.
//!
//! Events are the only way a caller moves a flow forward. `UPDATE` carries
//! a field merge payload; every other event is a bare signal.

use super::context::ContextPatch;
use serde::{Deserialize, Serialize};
use std::fmt;

/// An inbound event delivered to the flow.
///
/// Serializes internally tagged to match the boundary format, e.g.
/// `{"type":"UPDATE","data":{"userName":"admin"}}` or
/// `{"type":"AUTHENTICATE"}`.
///
/// # Example
///
/// ```rust
/// use authflow::core::{ContextPatch, Event, EventKind};
///
/// let event = Event::update(ContextPatch::new().user_name("admin"));
/// assert_eq!(event.kind(), EventKind::Update);
/// ```
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Event {
    /// Merge the supplied fields into the context and re-run the owning
    /// state's checks.
    Update {
        /// Fields to merge.
        data: ContextPatch,
    },
    /// Start an authentication attempt with the entered credentials.
    Authenticate,
    /// Enter the password recovery sub-flow.
    ForgotPassword,
    /// Ask for a one-time password to be sent to the entered email.
    RequestOneTimePassword,
    /// Acknowledge the current recovery outcome.
    Ok,
    /// Abandon password recovery and return to credential entry.
    Cancel,
    /// Switch to the registration branch.
    #[serde(rename = "SIGNUP")]
    SignUp,
    /// Return to the sign-in branch.
    #[serde(rename = "SIGNIN")]
    SignIn,
    /// End the signed-in session.
    #[serde(rename = "SIGNOUT")]
    SignOut,
    /// Submit the registration form.
    Register,
    /// The registration submission succeeded.
    Success,
    /// The registration submission failed.
    Error,
}

impl Event {
    /// Build an `UPDATE` event carrying a patch.
    pub fn update(data: ContextPatch) -> Self {
        Event::Update { data }
    }

    /// The payload-free discriminant of this event.
    pub fn kind(&self) -> EventKind {
        match self {
            Event::Update { .. } => EventKind::Update,
            Event::Authenticate => EventKind::Authenticate,
            Event::ForgotPassword => EventKind::ForgotPassword,
            Event::RequestOneTimePassword => EventKind::RequestOneTimePassword,
            Event::Ok => EventKind::Ok,
            Event::Cancel => EventKind::Cancel,
            Event::SignUp => EventKind::SignUp,
            Event::SignIn => EventKind::SignIn,
            Event::SignOut => EventKind::SignOut,
            Event::Register => EventKind::Register,
            Event::Success => EventKind::Success,
            Event::Error => EventKind::Error,
        }
    }
}

/// Discriminant set for [`Event`], used wherever the payload is irrelevant:
/// availability reporting, history records, log fields.
///
/// Displays as the wire name carried in the `type` tag.
///
/// # Example
///
/// ```rust
/// use authflow::core::EventKind;
///
/// assert_eq!(EventKind::RequestOneTimePassword.to_string(), "REQUEST_ONE_TIME_PASSWORD");
/// assert_eq!(EventKind::SignUp.to_string(), "SIGNUP");
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventKind {
    /// `UPDATE`
    Update,
    /// `AUTHENTICATE`
    Authenticate,
    /// `FORGOT_PASSWORD`
    ForgotPassword,
    /// `REQUEST_ONE_TIME_PASSWORD`
    RequestOneTimePassword,
    /// `OK`
    Ok,
    /// `CANCEL`
    Cancel,
    /// `SIGNUP`
    #[serde(rename = "SIGNUP")]
    SignUp,
    /// `SIGNIN`
    #[serde(rename = "SIGNIN")]
    SignIn,
    /// `SIGNOUT`
    #[serde(rename = "SIGNOUT")]
    SignOut,
    /// `REGISTER`
    Register,
    /// `SUCCESS`
    Success,
    /// `ERROR`
    Error,
}

impl EventKind {
    /// Wire name of the event kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Update => "UPDATE",
            EventKind::Authenticate => "AUTHENTICATE",
            EventKind::ForgotPassword => "FORGOT_PASSWORD",
            EventKind::RequestOneTimePassword => "REQUEST_ONE_TIME_PASSWORD",
            EventKind::Ok => "OK",
            EventKind::Cancel => "CANCEL",
            EventKind::SignUp => "SIGNUP",
            EventKind::SignIn => "SIGNIN",
            EventKind::SignOut => "SIGNOUT",
            EventKind::Register => "REGISTER",
            EventKind::Success => "SUCCESS",
            EventKind::Error => "ERROR",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
