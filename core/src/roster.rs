//! The pickup-event roster aggregate.
//!
//! [`MatchEvent`] is a pure state machine: every transition validates its
//! preconditions against in-memory state and mutates the document, with no
//! clocks, payments, or storage involved. The reconciliation engine loads a
//! document, applies transitions, and commits the result atomically, so any
//! transition here may be re-applied to a freshly loaded document when a
//! concurrent writer wins the commit race.

use crate::error::RosterError;
use crate::types::{
    EventId, EventSnapshot, EventStatus, LedgerEntry, Money, PaymentAuthorization, Role, UserId,
};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Hours before kickoff after which self-service cancellation closes
pub const CANCELLATION_WINDOW_HOURS: i64 = 24;

/// Setup parameters for a new event
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NewMatchEvent {
    /// Event title
    pub title: String,
    /// Player roster capacity
    pub max_players: u32,
    /// Goalkeeper roster capacity (ignored unless `include_goalkeepers`)
    pub max_goalkeepers: u32,
    /// Whether the event fields a separate goalkeeper roster
    pub include_goalkeepers: bool,
    /// Cost per player (zero for free events)
    pub player_cost: Money,
    /// Cost per goalkeeper (zero for free events)
    pub goalkeeper_cost: Money,
    /// Kickoff time
    pub starts_at: DateTime<Utc>,
    /// End time
    pub ends_at: DateTime<Utc>,
}

/// Where a user currently stands on an event
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Membership {
    /// The user holds a confirmed roster seat
    Rostered {
        /// The roster the user occupies
        role: Role,
    },
    /// The user is queued on a waitlist
    Waitlisted {
        /// The waitlist the user is queued on
        role: Role,
        /// Zero-based queue position
        position: usize,
    },
}

impl Membership {
    /// The role this membership is for, regardless of standing
    #[must_use]
    pub const fn role(&self) -> Role {
        match self {
            Self::Rostered { role } | Self::Waitlisted { role, .. } => *role,
        }
    }
}

/// A pickup event document: immutable setup plus mutable registration state.
///
/// Rosters and waitlists are ordered vectors; waitlist order is strictly
/// first-come-first-served and promotion only ever takes the head. The ledger
/// maps each paying member to their payment record.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MatchEvent {
    /// Event identifier
    pub event_id: EventId,
    /// Event title
    pub title: String,
    /// Player roster capacity
    pub max_players: u32,
    /// Goalkeeper roster capacity
    pub max_goalkeepers: u32,
    /// Whether the event fields a goalkeeper roster
    pub include_goalkeepers: bool,
    /// Cost per player
    pub player_cost: Money,
    /// Cost per goalkeeper
    pub goalkeeper_cost: Money,
    /// Kickoff time
    pub starts_at: DateTime<Utc>,
    /// End time
    pub ends_at: DateTime<Utc>,
    /// Confirmed players, in admission order
    pub players: Vec<UserId>,
    /// Confirmed goalkeepers, in admission order
    pub goalkeepers: Vec<UserId>,
    /// Player waitlist, head first
    pub player_waitlist: Vec<UserId>,
    /// Goalkeeper waitlist, head first
    pub goalkeeper_waitlist: Vec<UserId>,
    /// Payment record per paying member
    pub ledger: HashMap<UserId, LedgerEntry>,
    /// Users whose charges have been refunded
    pub refunded: Vec<UserId>,
    /// Lifecycle status
    pub status: EventStatus,
}

impl MatchEvent {
    /// Creates an event document from validated setup parameters.
    ///
    /// # Errors
    ///
    /// Returns [`RosterError::InvalidEvent`] for an empty title, a zero
    /// player capacity, a goalkeeper roster with zero capacity, or an end
    /// time not after the start time.
    pub fn create(event_id: EventId, setup: NewMatchEvent) -> Result<Self, RosterError> {
        if setup.title.trim().is_empty() {
            return Err(RosterError::InvalidEvent {
                reason: "title must not be empty".to_string(),
            });
        }
        if setup.max_players == 0 {
            return Err(RosterError::InvalidEvent {
                reason: "player capacity must be at least 1".to_string(),
            });
        }
        if setup.include_goalkeepers && setup.max_goalkeepers == 0 {
            return Err(RosterError::InvalidEvent {
                reason: "goalkeeper capacity must be at least 1".to_string(),
            });
        }
        if setup.ends_at <= setup.starts_at {
            return Err(RosterError::InvalidEvent {
                reason: "event must end after it starts".to_string(),
            });
        }

        Ok(Self {
            event_id,
            title: setup.title,
            max_players: setup.max_players,
            max_goalkeepers: if setup.include_goalkeepers {
                setup.max_goalkeepers
            } else {
                0
            },
            include_goalkeepers: setup.include_goalkeepers,
            player_cost: setup.player_cost,
            goalkeeper_cost: setup.goalkeeper_cost,
            starts_at: setup.starts_at,
            ends_at: setup.ends_at,
            players: Vec::new(),
            goalkeepers: Vec::new(),
            player_waitlist: Vec::new(),
            goalkeeper_waitlist: Vec::new(),
            ledger: HashMap::new(),
            refunded: Vec::new(),
            status: EventStatus::Active,
        })
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    /// Whether the event is accepting registration transitions
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == EventStatus::Active
    }

    /// The confirmed roster for a role
    #[must_use]
    pub fn roster(&self, role: Role) -> &[UserId] {
        match role {
            Role::Player => &self.players,
            Role::Goalkeeper => &self.goalkeepers,
        }
    }

    /// The waitlist for a role, head first
    #[must_use]
    pub fn waitlist(&self, role: Role) -> &[UserId] {
        match role {
            Role::Player => &self.player_waitlist,
            Role::Goalkeeper => &self.goalkeeper_waitlist,
        }
    }

    /// Capacity of the roster for a role
    #[must_use]
    pub const fn capacity(&self, role: Role) -> u32 {
        match role {
            Role::Player => self.max_players,
            Role::Goalkeeper => self.max_goalkeepers,
        }
    }

    /// Cost of a seat for a role
    #[must_use]
    pub const fn cost_for(&self, role: Role) -> Money {
        match role {
            Role::Player => self.player_cost,
            Role::Goalkeeper => self.goalkeeper_cost,
        }
    }

    /// Whether the roster for a role has an open seat
    #[must_use]
    pub fn seat_available(&self, role: Role) -> bool {
        self.role_supported(role) && (self.roster(role).len() as u32) < self.capacity(role)
    }

    /// Whether this event fields a roster for the role at all
    #[must_use]
    pub const fn role_supported(&self, role: Role) -> bool {
        match role {
            Role::Player => true,
            Role::Goalkeeper => self.include_goalkeepers,
        }
    }

    /// The user's current standing on this event, if any
    #[must_use]
    pub fn membership_of(&self, user_id: UserId) -> Option<Membership> {
        for role in [Role::Player, Role::Goalkeeper] {
            if self.roster(role).contains(&user_id) {
                return Some(Membership::Rostered { role });
            }
            if let Some(position) = self.waitlist(role).iter().position(|u| *u == user_id) {
                return Some(Membership::Waitlisted { role, position });
            }
        }
        None
    }

    /// The latest instant at which a member may still self-cancel
    #[must_use]
    pub fn cancellation_deadline(&self) -> DateTime<Utc> {
        self.starts_at - Duration::hours(CANCELLATION_WINDOW_HOURS)
    }

    /// Whether a user's charge has been refunded
    #[must_use]
    pub fn is_refunded(&self, user_id: UserId) -> bool {
        self.refunded.contains(&user_id)
    }

    /// Read-only snapshot for outbound notifications
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn snapshot(&self) -> EventSnapshot {
        EventSnapshot {
            event_id: self.event_id,
            title: self.title.clone(),
            starts_at: self.starts_at,
            ends_at: self.ends_at,
            player_cost: self.player_cost,
            goalkeeper_cost: self.goalkeeper_cost,
            max_players: self.max_players,
            max_goalkeepers: self.max_goalkeepers,
            include_goalkeepers: self.include_goalkeepers,
            players_registered: self.players.len() as u32,
            goalkeepers_registered: self.goalkeepers.len() as u32,
            status: self.status,
        }
    }

    // ------------------------------------------------------------------
    // Transitions
    // ------------------------------------------------------------------

    /// Seats a user on the roster for a role.
    ///
    /// # Errors
    ///
    /// Fails when the event is not active, the role has no roster, the user
    /// already holds a seat or slot, or the roster is full.
    pub fn admit(&mut self, user_id: UserId, role: Role) -> Result<(), RosterError> {
        self.ensure_active()?;
        self.ensure_unregistered(user_id)?;
        if !self.role_supported(role) {
            return Err(RosterError::RoleUnavailable { role });
        }
        if !self.seat_available(role) {
            return Err(RosterError::RosterFull { role });
        }
        self.roster_mut(role).push(user_id);
        Ok(())
    }

    /// Queues a user at the tail of the waitlist for a role, returning the
    /// zero-based position they were given.
    ///
    /// # Errors
    ///
    /// Fails when the event is not active, the role has no roster, or the
    /// user already holds a seat or slot.
    pub fn enqueue_waitlist(&mut self, user_id: UserId, role: Role) -> Result<usize, RosterError> {
        self.ensure_active()?;
        self.ensure_unregistered(user_id)?;
        if !self.role_supported(role) {
            return Err(RosterError::RoleUnavailable { role });
        }
        let waitlist = self.waitlist_mut(role);
        waitlist.push(user_id);
        Ok(waitlist.len() - 1)
    }

    /// Stores collected payment details for a user as an uncaptured ledger
    /// entry. Overwrites nothing: a user who already has an entry keeps it.
    ///
    /// # Errors
    ///
    /// Fails with [`RosterError::NotRegistered`] when the user holds no seat
    /// or waitlist slot.
    pub fn record_authorization(
        &mut self,
        user_id: UserId,
        payment: PaymentAuthorization,
        amount: Money,
    ) -> Result<(), RosterError> {
        if self.membership_of(user_id).is_none() {
            return Err(RosterError::NotRegistered { user_id });
        }
        self.ledger
            .entry(user_id)
            .or_insert_with(|| LedgerEntry::uncaptured(payment, amount));
        Ok(())
    }

    /// Marks a user's ledger entry as captured. A stale refund marker from
    /// an earlier membership is cleared; the user is a paying member again.
    ///
    /// # Errors
    ///
    /// Fails with [`RosterError::NotRegistered`] when the user has no ledger
    /// entry to settle.
    pub fn record_capture(
        &mut self,
        user_id: UserId,
        charge: crate::types::ChargeId,
    ) -> Result<(), RosterError> {
        let entry = self
            .ledger
            .get_mut(&user_id)
            .ok_or(RosterError::NotRegistered { user_id })?;
        entry.charge = Some(charge);
        self.refunded.retain(|u| *u != user_id);
        Ok(())
    }

    /// Removes a user from whichever roster or waitlist holds them,
    /// returning the membership they held.
    ///
    /// The ledger entry is left in place so the caller can settle a refund
    /// against it before discarding it.
    ///
    /// # Errors
    ///
    /// Fails with [`RosterError::NotRegistered`] when the user holds no seat
    /// or waitlist slot.
    pub fn remove_member(&mut self, user_id: UserId) -> Result<Membership, RosterError> {
        let membership = self
            .membership_of(user_id)
            .ok_or(RosterError::NotRegistered { user_id })?;
        match membership {
            Membership::Rostered { role } => {
                self.roster_mut(role).retain(|u| *u != user_id);
            }
            Membership::Waitlisted { role, .. } => {
                self.waitlist_mut(role).retain(|u| *u != user_id);
            }
        }
        Ok(membership)
    }

    /// Marks a user's charge as refunded and drops their ledger entry.
    pub fn record_refund(&mut self, user_id: UserId) {
        if !self.refunded.contains(&user_id) {
            self.refunded.push(user_id);
        }
        self.ledger.remove(&user_id);
    }

    /// Moves the waitlist head for a role onto the roster, returning the
    /// promoted user. Returns `None` when the waitlist is empty or the
    /// roster has no open seat.
    pub fn promote_head(&mut self, role: Role) -> Option<UserId> {
        if !self.seat_available(role) || self.waitlist(role).is_empty() {
            return None;
        }
        let user_id = self.waitlist_mut(role).remove(0);
        self.roster_mut(role).push(user_id);
        Some(user_id)
    }

    /// The user next in line for a role, without moving them
    #[must_use]
    pub fn waitlist_head(&self, role: Role) -> Option<UserId> {
        self.waitlist(role).first().copied()
    }

    /// Transitions the event into its terminal cancelled state
    pub fn mark_cancelled(&mut self) {
        self.status = EventStatus::Cancelled;
    }

    // ------------------------------------------------------------------
    // Invariants
    // ------------------------------------------------------------------

    /// Verifies the document's structural invariants.
    ///
    /// Checked by the engine before every commit; a violation means a
    /// transition bug, not bad input, and aborts the write.
    ///
    /// # Errors
    ///
    /// Returns [`RosterError::InvariantViolation`] naming the first failed
    /// check: occupancy above capacity, a user appearing in more than one
    /// roster or waitlist, a populated waitlist alongside an open seat, or
    /// goalkeeper structures on an event without a goalkeeper roster.
    pub fn check_invariants(&self) -> Result<(), RosterError> {
        for role in [Role::Player, Role::Goalkeeper] {
            if self.roster(role).len() as u64 > u64::from(self.capacity(role)) {
                return Err(RosterError::InvariantViolation {
                    detail: format!(
                        "{role} roster holds {} of {} seats",
                        self.roster(role).len(),
                        self.capacity(role)
                    ),
                });
            }
            if !self.waitlist(role).is_empty() && self.seat_available(role) {
                return Err(RosterError::InvariantViolation {
                    detail: format!("{role} waitlist populated while a seat is open"),
                });
            }
        }

        if !self.include_goalkeepers
            && (!self.goalkeepers.is_empty() || !self.goalkeeper_waitlist.is_empty())
        {
            return Err(RosterError::InvariantViolation {
                detail: "goalkeeper registrations on an event without a goalkeeper roster"
                    .to_string(),
            });
        }

        // Ledger entries must belong to current members with a capture state
        // matching their standing. A cancelled event legitimately retains
        // entries for members whose refund failed, so this only binds while
        // active.
        if self.is_active() {
            for (user_id, entry) in &self.ledger {
                match self.membership_of(*user_id) {
                    None => {
                        return Err(RosterError::InvariantViolation {
                            detail: format!("ledger entry for non-member {user_id}"),
                        });
                    }
                    Some(Membership::Rostered { .. }) if !entry.is_captured() => {
                        return Err(RosterError::InvariantViolation {
                            detail: format!("rostered user {user_id} holds an uncaptured charge"),
                        });
                    }
                    Some(Membership::Waitlisted { .. }) if entry.is_captured() => {
                        return Err(RosterError::InvariantViolation {
                            detail: format!("waitlisted user {user_id} holds a captured charge"),
                        });
                    }
                    Some(_) => {}
                }
            }
        }

        let mut seen = std::collections::HashSet::new();
        let all = self
            .players
            .iter()
            .chain(&self.goalkeepers)
            .chain(&self.player_waitlist)
            .chain(&self.goalkeeper_waitlist);
        for user_id in all {
            if !seen.insert(*user_id) {
                return Err(RosterError::InvariantViolation {
                    detail: format!("user {user_id} appears in more than one roster or waitlist"),
                });
            }
            // A cancelled event keeps its final rosters alongside the
            // refunded set; disjointness only binds while active.
            if self.is_active() && self.refunded.contains(user_id) {
                return Err(RosterError::InvariantViolation {
                    detail: format!("refunded user {user_id} still holds a seat or slot"),
                });
            }
        }

        Ok(())
    }

    // ------------------------------------------------------------------
    // Internal helpers
    // ------------------------------------------------------------------

    fn ensure_active(&self) -> Result<(), RosterError> {
        if self.is_active() {
            Ok(())
        } else {
            Err(RosterError::EventNotActive)
        }
    }

    // The refunded set counts as membership history: a user who cancelled
    // and took their money back does not get to rejoin the same event.
    fn ensure_unregistered(&self, user_id: UserId) -> Result<(), RosterError> {
        if self.membership_of(user_id).is_some() || self.is_refunded(user_id) {
            Err(RosterError::DuplicateMembership { user_id })
        } else {
            Ok(())
        }
    }

    fn roster_mut(&mut self, role: Role) -> &mut Vec<UserId> {
        match role {
            Role::Player => &mut self.players,
            Role::Goalkeeper => &mut self.goalkeepers,
        }
    }

    fn waitlist_mut(&mut self, role: Role) -> &mut Vec<UserId> {
        match role {
            Role::Player => &mut self.player_waitlist,
            Role::Goalkeeper => &mut self.goalkeeper_waitlist,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::{AuthorizationId, ChargeId, PaymentMethodId};
    use chrono::TimeZone;

    fn setup(max_players: u32, include_goalkeepers: bool) -> MatchEvent {
        let starts_at = Utc.with_ymd_and_hms(2026, 9, 12, 18, 0, 0).unwrap();
        MatchEvent::create(
            EventId::new(),
            NewMatchEvent {
                title: "Saturday pickup".to_string(),
                max_players,
                max_goalkeepers: 2,
                include_goalkeepers,
                player_cost: Money::from_cents(2000),
                goalkeeper_cost: Money::from_cents(0),
                starts_at,
                ends_at: starts_at + Duration::hours(2),
            },
        )
        .unwrap()
    }

    fn payment(tag: &str) -> PaymentAuthorization {
        PaymentAuthorization {
            authorization: AuthorizationId::new(format!("pi_{tag}")),
            payment_method: PaymentMethodId::new(format!("pm_{tag}")),
        }
    }

    #[test]
    fn create_rejects_bad_setup() {
        let starts_at = Utc.with_ymd_and_hms(2026, 9, 12, 18, 0, 0).unwrap();
        let base = NewMatchEvent {
            title: "Pickup".to_string(),
            max_players: 10,
            max_goalkeepers: 2,
            include_goalkeepers: true,
            player_cost: Money::from_cents(2000),
            goalkeeper_cost: Money::from_cents(1000),
            starts_at,
            ends_at: starts_at + Duration::hours(2),
        };

        let mut no_title = base.clone();
        no_title.title = "  ".to_string();
        assert!(matches!(
            MatchEvent::create(EventId::new(), no_title),
            Err(RosterError::InvalidEvent { .. })
        ));

        let mut no_players = base.clone();
        no_players.max_players = 0;
        assert!(MatchEvent::create(EventId::new(), no_players).is_err());

        let mut no_keepers = base.clone();
        no_keepers.max_goalkeepers = 0;
        assert!(MatchEvent::create(EventId::new(), no_keepers).is_err());

        let mut backwards = base;
        backwards.ends_at = backwards.starts_at;
        assert!(MatchEvent::create(EventId::new(), backwards).is_err());
    }

    #[test]
    fn admit_fills_seats_then_rejects() {
        let mut event = setup(2, false);
        let (a, b, c) = (UserId::new(), UserId::new(), UserId::new());

        event.admit(a, Role::Player).unwrap();
        event.admit(b, Role::Player).unwrap();
        assert!(!event.seat_available(Role::Player));
        assert_eq!(
            event.admit(c, Role::Player),
            Err(RosterError::RosterFull { role: Role::Player })
        );
    }

    #[test]
    fn duplicate_membership_rejected_across_structures() {
        let mut event = setup(1, true);
        let user = UserId::new();

        event.admit(user, Role::Player).unwrap();
        assert_eq!(
            event.enqueue_waitlist(user, Role::Player),
            Err(RosterError::DuplicateMembership { user_id: user })
        );
        assert_eq!(
            event.admit(user, Role::Goalkeeper),
            Err(RosterError::DuplicateMembership { user_id: user })
        );
    }

    #[test]
    fn goalkeeper_role_requires_goalkeeper_roster() {
        let mut event = setup(4, false);
        let user = UserId::new();
        assert_eq!(
            event.admit(user, Role::Goalkeeper),
            Err(RosterError::RoleUnavailable {
                role: Role::Goalkeeper
            })
        );
    }

    #[test]
    fn waitlist_is_fifo() {
        let mut event = setup(1, false);
        let (a, b, c) = (UserId::new(), UserId::new(), UserId::new());

        event.admit(a, Role::Player).unwrap();
        assert_eq!(event.enqueue_waitlist(b, Role::Player).unwrap(), 0);
        assert_eq!(event.enqueue_waitlist(c, Role::Player).unwrap(), 1);

        event.remove_member(a).unwrap();
        let promoted = event.promote_head(Role::Player).unwrap();
        assert_eq!(promoted, b);
        assert_eq!(event.waitlist(Role::Player), &[c]);
        assert_eq!(event.roster(Role::Player), &[b]);
    }

    #[test]
    fn promote_head_requires_open_seat() {
        let mut event = setup(1, false);
        let (a, b) = (UserId::new(), UserId::new());
        event.admit(a, Role::Player).unwrap();
        event.enqueue_waitlist(b, Role::Player).unwrap();

        assert_eq!(event.promote_head(Role::Player), None);
        event.remove_member(a).unwrap();
        assert_eq!(event.promote_head(Role::Player), Some(b));
    }

    #[test]
    fn remove_member_reports_prior_standing() {
        let mut event = setup(1, false);
        let (a, b) = (UserId::new(), UserId::new());
        event.admit(a, Role::Player).unwrap();
        event.enqueue_waitlist(b, Role::Player).unwrap();

        assert_eq!(
            event.remove_member(b).unwrap(),
            Membership::Waitlisted {
                role: Role::Player,
                position: 0
            }
        );
        assert_eq!(
            event.remove_member(a).unwrap(),
            Membership::Rostered { role: Role::Player }
        );
        assert_eq!(
            event.remove_member(a),
            Err(RosterError::NotRegistered { user_id: a })
        );
    }

    #[test]
    fn ledger_capture_and_refund_flow() {
        let mut event = setup(2, false);
        let user = UserId::new();
        event.admit(user, Role::Player).unwrap();
        event
            .record_authorization(user, payment("a"), Money::from_cents(2000))
            .unwrap();
        assert!(!event.ledger[&user].is_captured());

        event
            .record_capture(user, ChargeId::new("ch_a".to_string()))
            .unwrap();
        assert!(event.ledger[&user].is_captured());

        event.record_refund(user);
        assert!(event.is_refunded(user));
        assert!(!event.ledger.contains_key(&user));
    }

    #[test]
    fn record_authorization_requires_membership() {
        let mut event = setup(2, false);
        let stranger = UserId::new();
        assert_eq!(
            event.record_authorization(stranger, payment("x"), Money::from_cents(2000)),
            Err(RosterError::NotRegistered { user_id: stranger })
        );
    }

    #[test]
    fn refunded_users_cannot_rejoin() {
        let mut event = setup(2, false);
        let user = UserId::new();
        event.admit(user, Role::Player).unwrap();
        event
            .record_authorization(user, payment("r"), Money::from_cents(2000))
            .unwrap();
        event
            .record_capture(user, ChargeId::new("ch_r".to_string()))
            .unwrap();
        event.remove_member(user).unwrap();
        event.record_refund(user);

        assert_eq!(
            event.admit(user, Role::Player),
            Err(RosterError::DuplicateMembership { user_id: user })
        );
        assert_eq!(
            event.enqueue_waitlist(user, Role::Player),
            Err(RosterError::DuplicateMembership { user_id: user })
        );
    }

    #[test]
    fn capture_clears_stale_refund_marker() {
        let mut event = setup(2, false);
        let user = UserId::new();
        event.admit(user, Role::Player).unwrap();
        event
            .record_authorization(user, payment("s"), Money::from_cents(2000))
            .unwrap();
        event.refunded.push(user);
        event
            .record_capture(user, ChargeId::new("ch_s".to_string()))
            .unwrap();
        assert!(!event.is_refunded(user));
    }

    #[test]
    fn cancelled_event_rejects_transitions() {
        let mut event = setup(2, false);
        event.mark_cancelled();
        assert_eq!(
            event.admit(UserId::new(), Role::Player),
            Err(RosterError::EventNotActive)
        );
        assert_eq!(
            event.enqueue_waitlist(UserId::new(), Role::Player),
            Err(RosterError::EventNotActive)
        );
    }

    #[test]
    fn invariants_catch_corrupted_documents() {
        let mut event = setup(1, false);
        let user = UserId::new();
        event.admit(user, Role::Player).unwrap();
        assert!(event.check_invariants().is_ok());

        // Same user forced onto the waitlist as well.
        event.player_waitlist.push(user);
        assert!(matches!(
            event.check_invariants(),
            Err(RosterError::InvariantViolation { .. })
        ));

        let mut overfull = setup(1, false);
        overfull.players.push(UserId::new());
        overfull.players.push(UserId::new());
        assert!(overfull.check_invariants().is_err());

        let mut gap = setup(2, false);
        gap.player_waitlist.push(UserId::new());
        assert!(gap.check_invariants().is_err());

        let mut ghost = setup(1, false);
        let returned = UserId::new();
        ghost.admit(returned, Role::Player).unwrap();
        ghost.refunded.push(returned);
        assert!(ghost.check_invariants().is_err());
    }

    #[test]
    fn invariants_tie_ledger_entries_to_membership() {
        let mut event = setup(2, false);
        let seated = UserId::new();
        let queued = UserId::new();
        event.admit(seated, Role::Player).unwrap();
        event
            .record_authorization(seated, payment("seated"), Money::from_cents(2000))
            .unwrap();

        // Rostered members back their seat with a settled charge.
        assert!(matches!(
            event.check_invariants(),
            Err(RosterError::InvariantViolation { .. })
        ));
        event
            .record_capture(seated, ChargeId::new("ch_seated".to_string()))
            .unwrap();
        assert!(event.check_invariants().is_ok());

        // Waitlisted members hold their details uncaptured.
        event.admit(UserId::new(), Role::Player).unwrap();
        event.enqueue_waitlist(queued, Role::Player).unwrap();
        event
            .record_authorization(queued, payment("queued"), Money::from_cents(2000))
            .unwrap();
        assert!(event.check_invariants().is_ok());
        if let Some(entry) = event.ledger.get_mut(&queued) {
            entry.charge = Some(ChargeId::new("ch_queued".to_string()));
        }
        assert!(event.check_invariants().is_err());

        // An entry for a user with no seat or slot is a leak.
        let mut orphaned = setup(2, false);
        let member = UserId::new();
        orphaned.admit(member, Role::Player).unwrap();
        orphaned
            .record_authorization(member, payment("m"), Money::from_cents(2000))
            .unwrap();
        orphaned
            .record_capture(member, ChargeId::new("ch_m".to_string()))
            .unwrap();
        orphaned.players.clear();
        assert!(orphaned.check_invariants().is_err());

        // A cancelled event keeps entries whose refunds failed.
        orphaned.mark_cancelled();
        assert!(orphaned.check_invariants().is_ok());
    }

    #[test]
    fn cancellation_deadline_precedes_kickoff_by_a_day() {
        let event = setup(2, false);
        assert_eq!(
            event.cancellation_deadline(),
            event.starts_at - Duration::hours(24)
        );
    }
}
