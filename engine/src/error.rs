//! Engine-level error taxonomy.
//!
//! Every operation surfaces exactly one of these; callers can rely on the
//! variant to tell precondition failures (safe to re-present to the user)
//! apart from payment and storage failures (which may require operator
//! attention).

use chrono::{DateTime, Utc};
use matchday_core::error::RosterError;
use matchday_core::gateway::GatewayError;
use matchday_core::store::StoreError;
use matchday_core::types::{Role, UserId};
use thiserror::Error;

/// Errors produced by reconciliation engine operations
#[derive(Debug, Error)]
pub enum EngineError {
    /// No event document exists for the identifier
    #[error("event not found")]
    EventNotFound,

    /// The event is cancelled and accepts no further operations
    #[error("event is not active")]
    EventNotActive,

    /// The user already holds a seat or waitlist slot on this event
    #[error("user {user_id} is already registered")]
    DuplicateMembership {
        /// The user attempting to register twice
        user_id: UserId,
    },

    /// The user holds no seat or waitlist slot on this event
    #[error("user {user_id} is not registered")]
    NotRegistered {
        /// The unregistered user
        user_id: UserId,
    },

    /// The requested role does not exist on this event
    #[error("this event does not field a {role} roster")]
    RoleUnavailable {
        /// The unsupported role
        role: Role,
    },

    /// A paid seat was requested without payment details
    #[error("payment details are required for a paid {role} seat")]
    PaymentRequired {
        /// The paid role
        role: Role,
    },

    /// Self-service cancellation is no longer allowed this close to kickoff
    #[error("cancellation window closed at {closes_at}")]
    CancellationWindowClosed {
        /// When the window closed
        closes_at: DateTime<Utc>,
    },

    /// The gateway refused or failed to settle the charge
    #[error("payment capture failed: {reason}")]
    PaymentCaptureFailed {
        /// The underlying gateway failure
        reason: GatewayError,
    },

    /// The gateway refused or failed to issue the refund
    #[error("refund failed: {reason}")]
    RefundFailed {
        /// The underlying gateway failure
        reason: GatewayError,
    },

    /// A transition produced a document that fails its invariants
    #[error("capacity invariant violated: {detail}")]
    CapacityInvariantViolation {
        /// Which invariant failed and how
        detail: String,
    },

    /// Concurrent writers kept winning the commit race past the retry budget
    #[error("operation abandoned after repeated concurrent modification")]
    ConcurrentModification,

    /// Event setup parameters are invalid
    #[error("invalid event: {reason}")]
    InvalidEvent {
        /// What was wrong with the setup parameters
        reason: String,
    },

    /// The store failed for a reason other than a version conflict
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<RosterError> for EngineError {
    fn from(error: RosterError) -> Self {
        match error {
            RosterError::DuplicateMembership { user_id } => Self::DuplicateMembership { user_id },
            RosterError::NotRegistered { user_id } => Self::NotRegistered { user_id },
            RosterError::RoleUnavailable { role } => Self::RoleUnavailable { role },
            RosterError::EventNotActive => Self::EventNotActive,
            RosterError::InvalidEvent { reason } => Self::InvalidEvent { reason },
            RosterError::InvariantViolation { detail } => {
                Self::CapacityInvariantViolation { detail }
            }
            // A full roster is handled by waitlisting, never surfaced raw;
            // reaching here means a transition was applied out of order.
            RosterError::RosterFull { role } => Self::CapacityInvariantViolation {
                detail: format!("{role} roster full during admission"),
            },
        }
    }
}
