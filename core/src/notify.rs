//! Outbound notification contract.
//!
//! The engine emits a [`Notice`] for every externally visible outcome. The
//! sink is strictly best-effort: delivery failures are logged by callers and
//! never fail or roll back the operation that produced the notice.

use crate::types::{EventSnapshot, Money, Role, UserId};
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// Who a notice is addressed to
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Recipient {
    /// A single user
    User(UserId),
    /// Everyone registered on the event
    Broadcast,
}

/// What happened
#[derive(Clone, Debug, PartialEq)]
pub enum NoticeKind {
    /// The user was seated on a roster
    Admitted {
        /// The roster joined
        role: Role,
        /// What the user was charged, if anything
        charged: Option<Money>,
    },
    /// The user was queued on a waitlist
    Waitlisted {
        /// The waitlist joined
        role: Role,
        /// Zero-based queue position
        position: usize,
    },
    /// The user was promoted from a waitlist onto the roster
    Promoted {
        /// The roster joined
        role: Role,
        /// What the user was charged on promotion, if anything
        charged: Option<Money>,
    },
    /// The user's cancellation was processed
    RemovalConfirmed {
        /// The roster or waitlist the user left
        role: Role,
    },
    /// A refund was issued to the user
    RefundIssued {
        /// The amount returned, net of the processing fee
        amount: Money,
    },
    /// The event was cancelled by an organizer
    EventCancelled,
    /// A new event was opened for registration
    EventCreated,
}

/// A single outbound notification
#[derive(Clone, Debug, PartialEq)]
pub struct Notice {
    /// Addressee
    pub recipient: Recipient,
    /// What happened
    pub kind: NoticeKind,
    /// Event state at the time of the notice
    pub event: EventSnapshot,
}

/// Errors from the notification sink
#[derive(Debug, Error)]
pub enum NotifyError {
    /// The underlying delivery channel failed
    #[error("notification delivery failed: {0}")]
    Delivery(String),
}

/// Boxed future returned by sink operations
pub type NotifyFuture = Pin<Box<dyn Future<Output = Result<(), NotifyError>> + Send>>;

/// Delivery channel for outbound notices
pub trait NotificationSink: Send + Sync {
    /// Dispatches one notice. Best-effort; errors are logged, not propagated.
    fn dispatch(&self, notice: Notice) -> NotifyFuture;
}
