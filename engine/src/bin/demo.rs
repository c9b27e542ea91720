//! Roster Reconciliation Demo
//!
//! Walks the full lifecycle against in-memory collaborators:
//! - Event creation
//! - Paid joins until the roster fills, then waitlisting
//! - A cancellation with fee-withheld refund and charge-on-promotion
//! - Organizer cancellation with concurrent refunds
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin demo
//! ```

use matchday_core::environment::Clock;
use matchday_core::types::{CardFingerprint, Currency, Money, Role, UserId};
use matchday_core::{NewMatchEvent, PaymentAuthorization, PaymentGateway};
use matchday_engine::{Engine, EngineConfig, JoinOutcome};
use matchday_testing::fixtures::test_customer;
use matchday_testing::mocks::{FixedClock, InMemoryRosterStore, RecordingSink, ScriptedPaymentGateway};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,matchday_engine=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    println!("\n⚽ ============================================");
    println!("   Matchday Roster Engine - Live Demo");
    println!("============================================\n");

    let config = EngineConfig::from_env();
    let currency = Currency::new(config.currency.clone());
    println!("⚙️  Currency: {currency}\n");

    let store = Arc::new(InMemoryRosterStore::new());
    let gateway = Arc::new(ScriptedPaymentGateway::new());
    let sink = Arc::new(RecordingSink::new());
    let clock = Arc::new(FixedClock::new(chrono::Utc::now()));
    let engine = Engine::new(
        store,
        gateway.clone(),
        sink.clone(),
        clock.clone(),
        config,
    );

    // Step 1: open an event with two paid player seats.
    println!("1️⃣  Creating event (2 player seats, $20.00 each)...");
    let starts_at = clock.now() + chrono::Duration::hours(72);
    let snapshot = engine
        .create_event(NewMatchEvent {
            title: "Thursday Night Pickup".to_string(),
            max_players: 2,
            max_goalkeepers: 0,
            include_goalkeepers: false,
            player_cost: Money::from_cents(2000),
            goalkeeper_cost: Money::from_cents(0),
            starts_at,
            ends_at: starts_at + chrono::Duration::hours(2),
        })
        .await?;
    let event_id = snapshot.event_id;
    println!("   ✓ Event {event_id} created\n");

    // Step 2: three users join; the third lands on the waitlist.
    println!("2️⃣  Three users join...");
    let users: Vec<UserId> = (0..3).map(|_| UserId::new()).collect();
    for user_id in &users {
        let customer = test_customer(*user_id);
        let method = gateway
            .attach_payment_method(
                customer.clone(),
                CardFingerprint::new(format!("fp_{user_id}")),
            )
            .await?;
        let authorization = gateway
            .create_authorization(customer, Money::from_cents(2000), currency.clone())
            .await?;
        let outcome = engine
            .join(
                event_id,
                *user_id,
                Role::Player,
                Some(PaymentAuthorization {
                    authorization: authorization.id,
                    payment_method: method,
                }),
            )
            .await?;
        match outcome {
            JoinOutcome::Admitted { charged, .. } => {
                println!("   ✓ {user_id} admitted (charged {:?})", charged.map(|m| m.to_string()));
            }
            JoinOutcome::Waitlisted { position, .. } => {
                println!("   ✓ {user_id} waitlisted at position {position}");
            }
        }
    }
    println!();

    // Step 3: the first player cancels; refund is net of the processing fee
    // and the waitlist head is charged and promoted.
    println!("3️⃣  First player cancels...");
    let outcome = engine.cancel_membership(event_id, users[0]).await?;
    println!(
        "   ✓ Refunded {:?}, promotion: {:?}\n",
        outcome.refund.map(|m| m.to_string()),
        outcome.promotion
    );

    // Step 4: the organizer cancels the whole event.
    println!("4️⃣  Organizer cancels the event...");
    let cancellation = engine.cancel_event(event_id).await?;
    for (user_id, amount) in &cancellation.refunded {
        println!("   ✓ {user_id} refunded {amount}");
    }
    for (user_id, reason) in &cancellation.failures {
        println!("   ✗ {user_id} refund failed: {reason}");
    }

    println!("\n📬 {} notices dispatched", sink.notices().len());
    println!("💳 {} gateway calls made", gateway.calls().len());
    println!("\n✓ Demo complete");
    Ok(())
}
