//! # Matchday Testing
//!
//! Test doubles and fixtures for the roster reconciliation engine.
//!
//! This crate provides:
//! - In-memory implementations of the environment traits
//! - A scriptable payment gateway with call recording and failure injection
//! - Deterministic clocks and event fixtures
//!
//! ## Example
//!
//! ```ignore
//! use matchday_testing::mocks::{InMemoryRosterStore, ScriptedPaymentGateway, RecordingSink};
//! use matchday_testing::fixtures::test_clock;
//!
//! #[tokio::test]
//! async fn test_join_flow() {
//!     let store = Arc::new(InMemoryRosterStore::new());
//!     let gateway = Arc::new(ScriptedPaymentGateway::new());
//!     let sink = Arc::new(RecordingSink::new());
//!     let engine = Engine::new(store, gateway, sink, Arc::new(test_clock()));
//!     // ...
//! }
//! ```

pub mod fixtures;
pub mod mocks;

pub use fixtures::{paid_event, payment, test_clock, test_customer};
pub use mocks::{
    FixedClock, GatewayCall, InMemoryRosterStore, RecordingSink, ScriptedPaymentGateway,
};
