//! Deterministic fixtures shared across engine and integration tests.

use crate::mocks::FixedClock;
use chrono::{Duration, TimeZone, Utc};
use matchday_core::environment::Clock;
use matchday_core::types::{
    AuthorizationId, CustomerRef, Money, PaymentAuthorization, PaymentMethodId, UserId,
};
use matchday_core::NewMatchEvent;

/// Fixed clock pinned to a known instant: 2026-06-01 12:00:00 UTC
#[must_use]
#[allow(clippy::missing_panics_doc)]
pub fn test_clock() -> FixedClock {
    FixedClock::new(
        Utc.with_ymd_and_hms(2026, 6, 1, 12, 0, 0)
            .single()
            .unwrap_or_else(Utc::now),
    )
}

/// A paid event kicking off 72 hours after [`test_clock`], so the
/// cancellation window is comfortably open.
#[must_use]
pub fn paid_event(max_players: u32, include_goalkeepers: bool) -> NewMatchEvent {
    let starts_at = test_clock().now() + Duration::hours(72);
    NewMatchEvent {
        title: "Thursday pickup".to_string(),
        max_players,
        max_goalkeepers: 2,
        include_goalkeepers,
        player_cost: Money::from_cents(2000),
        goalkeeper_cost: Money::from_cents(1000),
        starts_at,
        ends_at: starts_at + Duration::hours(2),
    }
}

/// Payment details tagged for readable assertions
#[must_use]
pub fn payment(tag: &str) -> PaymentAuthorization {
    PaymentAuthorization {
        authorization: AuthorizationId::new(format!("pi_{tag}")),
        payment_method: PaymentMethodId::new(format!("pm_{tag}")),
    }
}

/// A customer reference with a derived test email
#[must_use]
pub fn test_customer(user_id: UserId) -> CustomerRef {
    CustomerRef::new(user_id, format!("{user_id}@test.local"))
}
