//! Core domain for pickup-event rosters, waitlists, and payment
//! reconciliation.
//!
//! This crate is the functional core: the [`roster::MatchEvent`] aggregate
//! and its pure transitions, plus the contracts the imperative shell depends
//! on — durable storage ([`store::RosterStore`]), the card processor
//! ([`gateway::PaymentGateway`]), outbound notices
//! ([`notify::NotificationSink`]), and time ([`environment::Clock`]).
//!
//! Nothing here performs I/O. The reconciliation engine (in
//! `matchday-engine`) composes these pieces and owns every side effect.

pub mod environment;
pub mod error;
pub mod gateway;
pub mod notify;
pub mod roster;
pub mod store;
pub mod types;

pub use environment::{Clock, SystemClock};
pub use error::RosterError;
pub use gateway::{Authorization, Capture, GatewayError, PaymentGateway, Refund};
pub use notify::{Notice, NoticeKind, NotificationSink, Recipient};
pub use roster::{MatchEvent, Membership, NewMatchEvent, CANCELLATION_WINDOW_HOURS};
pub use store::{RosterStore, StoreError, Version};
pub use types::{
    AuthorizationId, CardFingerprint, ChargeId, Currency, CustomerRef, EventId, EventSnapshot,
    EventStatus, LedgerEntry, Money, PaymentAuthorization, PaymentMethodId, RefundId, Role, UserId,
};
