//! Errors produced by pure roster transitions.

use crate::types::{Role, UserId};
use thiserror::Error;

/// Error raised by a roster transition that cannot be applied
///
/// These are pure precondition failures; nothing external has happened when
/// one is returned, so callers may retry against fresher state or surface the
/// failure directly.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RosterError {
    /// The user already holds a roster seat or waitlist slot on this event
    #[error("user {user_id} is already registered for this event")]
    DuplicateMembership {
        /// The user attempting to register twice
        user_id: UserId,
    },

    /// The user holds no roster seat or waitlist slot on this event
    #[error("user {user_id} is not registered for this event")]
    NotRegistered {
        /// The unregistered user
        user_id: UserId,
    },

    /// The roster for the requested role is at capacity
    #[error("the {role} roster is full")]
    RosterFull {
        /// The role whose roster is full
        role: Role,
    },

    /// The requested role does not exist on this event
    #[error("this event does not field a {role} roster")]
    RoleUnavailable {
        /// The unsupported role
        role: Role,
    },

    /// The event is not accepting this transition
    #[error("event is not active")]
    EventNotActive,

    /// Event setup parameters are invalid
    #[error("invalid event: {reason}")]
    InvalidEvent {
        /// What was wrong with the setup parameters
        reason: String,
    },

    /// A structural invariant no longer holds on the document
    #[error("capacity invariant violated: {detail}")]
    InvariantViolation {
        /// Which invariant failed and how
        detail: String,
    },
}
