//! Property tests: arbitrary interleavings of roster transitions never leave
//! a document that fails its structural invariants, and waitlist order is
//! preserved under churn.

#![allow(clippy::unwrap_used)]

use chrono::{Duration, TimeZone, Utc};
use matchday_core::types::{AuthorizationId, ChargeId, PaymentAuthorization, PaymentMethodId};
use matchday_core::{EventId, MatchEvent, Membership, Money, NewMatchEvent, Role, UserId};
use proptest::prelude::*;
use uuid::Uuid;

#[derive(Clone, Debug)]
enum Op {
    Join { user: u8, role: Role },
    Leave { user: u8 },
    Promote { role: Role },
}

fn op_strategy() -> impl Strategy<Value = Op> {
    let role = prop_oneof![Just(Role::Player), Just(Role::Goalkeeper)];
    prop_oneof![
        (0u8..24, role.clone()).prop_map(|(user, role)| Op::Join { user, role }),
        (0u8..24).prop_map(|user| Op::Leave { user }),
        role.prop_map(|role| Op::Promote { role }),
    ]
}

fn user(n: u8) -> UserId {
    UserId::from_uuid(Uuid::from_u128(u128::from(n) + 1))
}

fn fresh_event(max_players: u32, max_goalkeepers: u32) -> MatchEvent {
    let starts_at = Utc.with_ymd_and_hms(2026, 9, 12, 18, 0, 0).unwrap();
    MatchEvent::create(
        EventId::new(),
        NewMatchEvent {
            title: "Property pickup".to_string(),
            max_players,
            max_goalkeepers,
            include_goalkeepers: max_goalkeepers > 0,
            player_cost: Money::from_cents(2000),
            goalkeeper_cost: Money::from_cents(1000),
            starts_at,
            ends_at: starts_at + Duration::hours(2),
        },
    )
    .unwrap()
}

fn payment(n: u8) -> PaymentAuthorization {
    PaymentAuthorization {
        authorization: AuthorizationId::new(format!("pi_{n}")),
        payment_method: PaymentMethodId::new(format!("pm_{n}")),
    }
}

fn capture(event: &mut MatchEvent, u: UserId, n: u8) {
    event.record_capture(u, ChargeId::new(format!("ch_{n}"))).unwrap();
}

/// Applies one operation the way the engine would: joins take a paid seat
/// with a captured charge or queue with the authorization stored uncaptured,
/// departures drop the ledger entry and trigger a promotion pass that
/// captures the head's stored authorization.
fn apply(event: &mut MatchEvent, op: &Op) {
    match op {
        Op::Join { user: n, role } => {
            let u = user(*n);
            if event.membership_of(u).is_some() || !event.role_supported(*role) {
                return;
            }
            if event.seat_available(*role) {
                event.admit(u, *role).unwrap();
                event
                    .record_authorization(u, payment(*n), event.cost_for(*role))
                    .unwrap();
                capture(event, u, *n);
            } else {
                event.enqueue_waitlist(u, *role).unwrap();
                event
                    .record_authorization(u, payment(*n), event.cost_for(*role))
                    .unwrap();
            }
        }
        Op::Leave { user: n } => {
            let u = user(*n);
            if let Ok(membership) = event.remove_member(u) {
                event.ledger.remove(&u);
                if let Membership::Rostered { role } = membership {
                    if let Some(head) = event.promote_head(role) {
                        capture(event, head, head_tag(head));
                    }
                }
            }
        }
        Op::Promote { role } => {
            if let Some(head) = event.promote_head(*role) {
                capture(event, head, head_tag(head));
            }
        }
    }
}

// Recovers the small test index a UserId was minted from.
#[allow(clippy::cast_possible_truncation)]
fn head_tag(u: UserId) -> u8 {
    (u.as_uuid().as_u128() - 1) as u8
}

proptest! {
    #[test]
    fn invariants_hold_under_arbitrary_churn(
        ops in prop::collection::vec(op_strategy(), 0..80),
        max_players in 1u32..6,
        max_goalkeepers in 0u32..3,
    ) {
        let mut event = fresh_event(max_players, max_goalkeepers);
        for op in &ops {
            apply(&mut event, op);
            prop_assert!(event.check_invariants().is_ok());
        }
    }

    #[test]
    fn waitlist_order_is_stable_under_churn(ops in prop::collection::vec(op_strategy(), 0..80)) {
        let mut event = fresh_event(2, 1);
        let mut expected: Vec<UserId> = Vec::new();

        for op in &ops {
            // Track the expected player waitlist shadow-copy style.
            match op {
                Op::Join { user: n, role: Role::Player } => {
                    let u = user(*n);
                    if event.membership_of(u).is_none() && !event.seat_available(Role::Player) {
                        expected.push(u);
                    }
                }
                Op::Leave { user: n } => {
                    let u = user(*n);
                    match event.membership_of(u) {
                        Some(Membership::Waitlisted { role: Role::Player, .. }) => {
                            expected.retain(|x| *x != u);
                        }
                        Some(Membership::Rostered { role: Role::Player }) => {
                            // The head is promoted once the seat frees up.
                            if !expected.is_empty() {
                                expected.remove(0);
                            }
                        }
                        _ => {}
                    }
                }
                _ => {}
            }
            apply(&mut event, op);
            prop_assert_eq!(event.waitlist(Role::Player), expected.as_slice());
        }
    }
}
