//! Outcome types returned by engine operations.

use matchday_core::types::{Money, Role, UserId};

/// Result of a join request
#[derive(Clone, Debug, PartialEq)]
pub enum JoinOutcome {
    /// The user was seated on the roster
    Admitted {
        /// The roster joined
        role: Role,
        /// The amount captured, if the seat was paid
        charged: Option<Money>,
    },
    /// The roster was full; the user was queued instead
    Waitlisted {
        /// The waitlist joined
        role: Role,
        /// Zero-based queue position
        position: usize,
    },
}

/// What happened to the waitlist after a seat opened up
#[derive(Clone, Debug, PartialEq)]
pub enum PromotionReport {
    /// The waitlist was empty or no seat was open
    None,
    /// The head of the waitlist took the seat
    Promoted {
        /// The promoted user
        user_id: UserId,
        /// The amount captured on promotion, if the seat was paid
        charged: Option<Money>,
    },
    /// The head could not be charged and stays at the head of the queue
    Failed {
        /// The user whose promotion failed
        user_id: UserId,
        /// Why the capture failed
        reason: String,
    },
}

/// Result of a member cancelling their registration
#[derive(Clone, Debug, PartialEq)]
pub struct CancellationOutcome {
    /// The standing the user gave up
    pub removed_from: RemovedFrom,
    /// The refund issued, net of the processing fee, if the user had been
    /// charged
    pub refund: Option<Money>,
    /// What happened to the waitlist afterwards
    pub promotion: PromotionReport,
}

/// The standing a cancelling member held
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RemovedFrom {
    /// A confirmed roster seat
    Roster(Role),
    /// A waitlist slot
    Waitlist(Role),
}

impl RemovedFrom {
    /// The role the standing was for
    #[must_use]
    pub const fn role(&self) -> Role {
        match self {
            Self::Roster(role) | Self::Waitlist(role) => *role,
        }
    }
}

/// Result of an organizer cancelling a whole event
#[derive(Clone, Debug, PartialEq)]
pub struct EventCancellation {
    /// Users refunded successfully, with the net amounts returned
    pub refunded: Vec<(UserId, Money)>,
    /// Users whose refunds failed, with the gateway's reason
    pub failures: Vec<(UserId, String)>,
}
