//! Domain types for the pickup-soccer roster core.
//!
//! Value objects and identifiers shared by the roster aggregate, the payment
//! gateway contract, and the reconciliation engine. Amounts are cents-based to
//! avoid floating-point arithmetic errors; external processor handles
//! (authorizations, payment methods, charges) are opaque strings issued by the
//! gateway.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

// ============================================================================
// Identifiers
// ============================================================================

/// Unique identifier for a pickup event
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventId(Uuid);

impl EventId {
    /// Creates a new random `EventId`
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create an `EventId` from a `Uuid`
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the inner UUID
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for EventId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a registered user
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(Uuid);

impl UserId {
    /// Creates a new random `UserId`
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a `UserId` from a `Uuid`
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the inner UUID
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Gateway-issued handle for a pre-created charge authorization
///
/// Opaque on our side; the payment processor mints these when a charge intent
/// is created and expects them back verbatim on capture.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AuthorizationId(String);

impl AuthorizationId {
    /// Wraps a processor-issued authorization handle
    #[must_use]
    pub const fn new(id: String) -> Self {
        Self(id)
    }

    /// Returns the handle as a string reference
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AuthorizationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Gateway-issued handle for a stored payment method
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PaymentMethodId(String);

impl PaymentMethodId {
    /// Wraps a processor-issued payment method handle
    #[must_use]
    pub const fn new(id: String) -> Self {
        Self(id)
    }

    /// Returns the handle as a string reference
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PaymentMethodId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Gateway-issued handle for a settled charge
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChargeId(String);

impl ChargeId {
    /// Wraps a processor-issued charge handle
    #[must_use]
    pub const fn new(id: String) -> Self {
        Self(id)
    }

    /// Returns the handle as a string reference
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChargeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Gateway-issued handle for a refund
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RefundId(String);

impl RefundId {
    /// Wraps a processor-issued refund handle
    #[must_use]
    pub const fn new(id: String) -> Self {
        Self(id)
    }

    /// Returns the handle as a string reference
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RefundId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Card fingerprint used to deduplicate saved payment methods
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CardFingerprint(String);

impl CardFingerprint {
    /// Wraps a processor-computed card fingerprint
    #[must_use]
    pub const fn new(fingerprint: String) -> Self {
        Self(fingerprint)
    }

    /// Returns the fingerprint as a string reference
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// ISO 4217 currency code, lowercase as the processor expects it
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Currency(String);

impl Currency {
    /// Wraps a currency code
    #[must_use]
    pub const fn new(code: String) -> Self {
        Self(code)
    }

    /// Canadian dollars, the launch currency
    #[must_use]
    pub fn cad() -> Self {
        Self("cad".to_string())
    }

    /// Returns the code as a string reference
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Currency {
    fn default() -> Self {
        Self::cad()
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Reference identifying a user to the payment processor
///
/// The gateway resolves this into its own customer record, creating one on
/// first use and reusing it afterwards.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CustomerRef {
    /// The user this customer record belongs to
    pub user_id: UserId,
    /// Email passed through to the processor's customer record
    pub email: String,
}

impl CustomerRef {
    /// Creates a new `CustomerRef`
    #[must_use]
    pub const fn new(user_id: UserId, email: String) -> Self {
        Self { user_id, email }
    }
}

impl fmt::Display for CustomerRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.user_id)
    }
}

// ============================================================================
// Money Value Object (cents-based to avoid floating point errors)
// ============================================================================

/// Processing fee the payment processor keeps per charge: 2.9% + 30 cents.
///
/// This is a fixed business rule, not per-event configuration: refunds are
/// always issued net of this fee so the payer absorbs the non-recoverable
/// processing cost.
pub const PROCESSING_FEE_PERMILLE: u64 = 29;

/// Flat component of the processing fee, in cents
pub const PROCESSING_FEE_FLAT_CENTS: u64 = 30;

/// Represents money in cents to avoid floating-point arithmetic errors
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Money(u64);

impl Money {
    /// Creates a `Money` value from cents
    #[must_use]
    pub const fn from_cents(cents: u64) -> Self {
        Self(cents)
    }

    /// Creates a `Money` value from dollars
    ///
    /// # Panics
    ///
    /// Panics if the conversion would overflow (dollars * 100 > `u64::MAX`).
    #[must_use]
    #[allow(clippy::panic)]
    pub const fn from_dollars(dollars: u64) -> Self {
        match dollars.checked_mul(100) {
            Some(cents) => Self(cents),
            None => panic!("Money::from_dollars overflow"),
        }
    }

    /// Returns the amount in cents
    #[must_use]
    pub const fn cents(&self) -> u64 {
        self.0
    }

    /// Checks if the amount is zero
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Adds two money amounts with overflow checking
    #[must_use]
    pub const fn checked_add(self, other: Self) -> Option<Self> {
        match self.0.checked_add(other.0) {
            Some(result) => Some(Self(result)),
            None => None,
        }
    }

    /// Subtracts two money amounts (returns None if result would be negative)
    #[must_use]
    pub const fn checked_sub(self, other: Self) -> Option<Self> {
        if self.0 >= other.0 {
            Some(Self(self.0 - other.0))
        } else {
            None
        }
    }

    /// The processing fee withheld by the payment processor for this amount.
    ///
    /// `round(amount * 0.029) + 30` cents, rounding half up to mirror the
    /// processor's own arithmetic.
    #[must_use]
    pub const fn processing_fee(self) -> Self {
        let percent = (self.0 * PROCESSING_FEE_PERMILLE + 500) / 1000;
        Self(percent + PROCESSING_FEE_FLAT_CENTS)
    }

    /// The amount refundable for a charge of this size, net of the
    /// processing fee. Saturates at zero for charges smaller than the fee.
    #[must_use]
    pub const fn refund_after_fee(self) -> Self {
        Self(self.0.saturating_sub(self.processing_fee().0))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${}.{:02}", self.0 / 100, self.0 % 100)
    }
}

// ============================================================================
// Roles and status
// ============================================================================

/// The role a user occupies at a pickup event
///
/// Players and goalkeepers have independently capacitated rosters, separate
/// waitlists, and separate pricing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Outfield player
    Player,
    /// Goalkeeper
    Goalkeeper,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Player => write!(f, "player"),
            Self::Goalkeeper => write!(f, "goalkeeper"),
        }
    }
}

/// Event lifecycle status
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventStatus {
    /// Accepting joins, cancellations, and promotions
    Active,
    /// Terminal: no further admission or promotion processing
    Cancelled,
}

// ============================================================================
// Payment ledger
// ============================================================================

/// Payment details a user supplies when joining a paid event
///
/// The charge intent is pre-created through the gateway before the join
/// request reaches the engine; the engine captures it only when the user is
/// actually admitted to a roster.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentAuthorization {
    /// Pre-created charge authorization
    pub authorization: AuthorizationId,
    /// Payment method to capture with
    pub payment_method: PaymentMethodId,
}

/// Per-user payment record on an event document
///
/// The authorization and payment method are stored as soon as payment details
/// are collected (roster join or waitlist join); `charge` is populated only
/// after a successful capture. Waitlisted users therefore carry an entry with
/// `charge: None` until promotion.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    /// The stored charge authorization
    pub authorization: AuthorizationId,
    /// Payment method collected alongside the authorization
    pub payment_method: PaymentMethodId,
    /// The settled charge, once captured
    pub charge: Option<ChargeId>,
    /// The amount the authorization was created for
    pub amount: Money,
}

impl LedgerEntry {
    /// Creates an uncaptured ledger entry from collected payment details
    #[must_use]
    pub fn uncaptured(payment: PaymentAuthorization, amount: Money) -> Self {
        Self {
            authorization: payment.authorization,
            payment_method: payment.payment_method,
            charge: None,
            amount,
        }
    }

    /// Whether this entry holds a settled charge
    #[must_use]
    pub const fn is_captured(&self) -> bool {
        self.charge.is_some()
    }
}

// ============================================================================
// Notification snapshot
// ============================================================================

/// Read-only snapshot of an event attached to outbound notifications
///
/// Carries the fields the notification collaborator needs to render a
/// message; content formatting itself happens downstream of the sink.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EventSnapshot {
    /// Event identifier
    pub event_id: EventId,
    /// Event title
    pub title: String,
    /// When the event starts
    pub starts_at: DateTime<Utc>,
    /// When the event ends
    pub ends_at: DateTime<Utc>,
    /// Cost per player
    pub player_cost: Money,
    /// Cost per goalkeeper
    pub goalkeeper_cost: Money,
    /// Player roster capacity
    pub max_players: u32,
    /// Goalkeeper roster capacity
    pub max_goalkeepers: u32,
    /// Whether the event fields a goalkeeper roster
    pub include_goalkeepers: bool,
    /// Current player roster occupancy
    pub players_registered: u32,
    /// Current goalkeeper roster occupancy
    pub goalkeepers_registered: u32,
    /// Event status at snapshot time
    pub status: EventStatus,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn processing_fee_matches_processor_arithmetic() {
        // 2000 cents: round(2000 * 0.029) = 58, + 30 flat = 88
        assert_eq!(Money::from_cents(2000).processing_fee(), Money::from_cents(88));
        assert_eq!(
            Money::from_cents(2000).refund_after_fee(),
            Money::from_cents(1912)
        );
    }

    #[test]
    fn processing_fee_rounds_half_up() {
        // 1000 cents: 29.0 exactly -> 29 + 30 = 59, leaving 941 refundable
        assert_eq!(Money::from_cents(1000).processing_fee(), Money::from_cents(59));
        assert_eq!(
            Money::from_cents(1000).refund_after_fee(),
            Money::from_cents(941)
        );
        // 1500 cents: 43.5 rounds up to 44, + 30 = 74
        assert_eq!(Money::from_cents(1500).processing_fee(), Money::from_cents(74));
    }

    #[test]
    fn refund_saturates_for_tiny_charges() {
        // Fee (31 cents) exceeds a 25-cent charge; nothing refundable.
        assert_eq!(
            Money::from_cents(25).refund_after_fee(),
            Money::from_cents(0)
        );
    }

    #[test]
    fn money_display_formats_cents() {
        assert_eq!(Money::from_cents(1912).to_string(), "$19.12");
        assert_eq!(Money::from_cents(5).to_string(), "$0.05");
    }

    #[test]
    fn ledger_entry_capture_state() {
        let payment = PaymentAuthorization {
            authorization: AuthorizationId::new("pi_123".to_string()),
            payment_method: PaymentMethodId::new("pm_456".to_string()),
        };
        let mut entry = LedgerEntry::uncaptured(payment, Money::from_cents(1000));
        assert!(!entry.is_captured());

        entry.charge = Some(ChargeId::new("ch_789".to_string()));
        assert!(entry.is_captured());
    }
}
