//! Mock implementations of the environment traits.

use chrono::{DateTime, Utc};
use matchday_core::environment::Clock;
use matchday_core::gateway::{
    Authorization, Capture, GatewayError, GatewayFuture, PaymentGateway, Refund,
};
use matchday_core::notify::{Notice, NotificationSink, NotifyError, NotifyFuture};
use matchday_core::roster::MatchEvent;
use matchday_core::store::{RosterStore, StoreError, StoreFuture, Version};
use matchday_core::types::{
    AuthorizationId, CardFingerprint, ChargeId, Currency, CustomerRef, EventId, Money,
    PaymentMethodId, RefundId,
};
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

/// Fixed clock for deterministic tests
///
/// Always returns the same time, making tests reproducible.
#[derive(Debug, Clone)]
pub struct FixedClock {
    time: DateTime<Utc>,
}

impl FixedClock {
    /// Create a new fixed clock with the given time
    #[must_use]
    pub const fn new(time: DateTime<Utc>) -> Self {
        Self { time }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.time
    }
}

// ============================================================================
// In-memory roster store
// ============================================================================

/// In-memory [`RosterStore`] with real compare-and-swap semantics.
///
/// Documents are stored serialized so that every load hands back an
/// independent copy, exactly as a remote document store would. Commits bump
/// the version and fail with [`StoreError::VersionConflict`] when the
/// expected version is stale, which makes this store good enough to exercise
/// the engine's retry path with genuinely racing tasks.
#[derive(Clone, Default)]
pub struct InMemoryRosterStore {
    documents: Arc<Mutex<HashMap<EventId, (Version, String)>>>,
}

impl InMemoryRosterStore {
    /// Creates an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current version of a stored document, if present
    #[must_use]
    pub fn version_of(&self, event_id: EventId) -> Option<Version> {
        self.documents
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .get(&event_id)
            .map(|(version, _)| *version)
    }
}

impl RosterStore for InMemoryRosterStore {
    fn load(&self, event_id: EventId) -> StoreFuture<(MatchEvent, Version)> {
        let documents = Arc::clone(&self.documents);
        Box::pin(async move {
            let guard = documents
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner);
            let (version, raw) = guard
                .get(&event_id)
                .ok_or(StoreError::NotFound { event_id })?;
            let document: MatchEvent = serde_json::from_str(raw)
                .map_err(|e| StoreError::Serialization(e.to_string()))?;
            Ok((document, *version))
        })
    }

    fn commit(&self, expected: Version, document: MatchEvent) -> StoreFuture<Version> {
        let documents = Arc::clone(&self.documents);
        Box::pin(async move {
            let mut guard = documents
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner);
            let event_id = document.event_id;
            let slot = guard
                .get_mut(&event_id)
                .ok_or(StoreError::NotFound { event_id })?;
            if slot.0 != expected {
                return Err(StoreError::VersionConflict {
                    expected,
                    actual: slot.0,
                });
            }
            let raw = serde_json::to_string(&document)
                .map_err(|e| StoreError::Serialization(e.to_string()))?;
            let next = expected.next();
            *slot = (next, raw);
            Ok(next)
        })
    }

    fn insert(&self, document: MatchEvent) -> StoreFuture<Version> {
        let documents = Arc::clone(&self.documents);
        Box::pin(async move {
            let mut guard = documents
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner);
            let event_id = document.event_id;
            if guard.contains_key(&event_id) {
                return Err(StoreError::AlreadyExists { event_id });
            }
            let raw = serde_json::to_string(&document)
                .map_err(|e| StoreError::Serialization(e.to_string()))?;
            guard.insert(event_id, (Version::initial(), raw));
            Ok(Version::initial())
        })
    }

    fn list_events(&self) -> StoreFuture<Vec<EventId>> {
        let documents = Arc::clone(&self.documents);
        Box::pin(async move {
            let guard = documents
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner);
            Ok(guard.keys().copied().collect())
        })
    }
}

// ============================================================================
// Scripted payment gateway
// ============================================================================

/// One recorded gateway invocation
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GatewayCall {
    /// `create_authorization` was called
    CreateAuthorization {
        /// The customer the authorization was created for
        customer: CustomerRef,
        /// The amount
        amount: Money,
        /// The currency the charge is denominated in
        currency: Currency,
    },
    /// `capture` was called
    Capture {
        /// The authorization being settled
        authorization: AuthorizationId,
        /// The payment method used
        payment_method: PaymentMethodId,
    },
    /// `refund` was called
    Refund {
        /// The charge being refunded
        charge: ChargeId,
        /// The amount refunded
        amount: Money,
    },
    /// `attach_payment_method` was called
    AttachPaymentMethod {
        /// The customer the method was saved for
        customer: CustomerRef,
        /// The card fingerprint
        fingerprint: CardFingerprint,
    },
}

#[derive(Default)]
struct GatewayState {
    calls: Vec<GatewayCall>,
    capture_failures: VecDeque<GatewayError>,
    refund_failures: VecDeque<GatewayError>,
    authorization_failures: VecDeque<GatewayError>,
    // (user, cents) -> open authorization, for customer-level idempotency
    open_authorizations: HashMap<(String, u64), AuthorizationId>,
    authorized_amounts: HashMap<AuthorizationId, Money>,
    captured: HashMap<AuthorizationId, ChargeId>,
    // (user, fingerprint) -> stored method, for card dedup
    saved_methods: HashMap<(String, String), PaymentMethodId>,
}

/// Scriptable in-memory [`PaymentGateway`].
///
/// Successful by default: authorizations, captures, and refunds all succeed
/// and mint sequential handles. Failures are injected per operation with the
/// `fail_next_*` methods and consumed in order. Every call is recorded for
/// assertion, and the processor-side behaviors the engine relies on are
/// faithful: repeated authorization requests for the same customer and
/// amount return the same open authorization, capturing consumes it, and
/// saving a card twice returns the existing payment method handle.
#[derive(Clone, Default)]
pub struct ScriptedPaymentGateway {
    state: Arc<Mutex<GatewayState>>,
    sequence: Arc<AtomicU64>,
}

impl ScriptedPaymentGateway {
    /// Creates a gateway that succeeds on every call
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a failure for the next `create_authorization` call
    pub fn fail_next_authorization(&self, error: GatewayError) {
        self.lock().authorization_failures.push_back(error);
    }

    /// Queues a failure for the next `capture` call
    pub fn fail_next_capture(&self, error: GatewayError) {
        self.lock().capture_failures.push_back(error);
    }

    /// Queues a failure for the next `refund` call
    pub fn fail_next_refund(&self, error: GatewayError) {
        self.lock().refund_failures.push_back(error);
    }

    /// All calls made so far, in order
    #[must_use]
    pub fn calls(&self) -> Vec<GatewayCall> {
        self.lock().calls.clone()
    }

    /// The refund calls made so far, in order
    #[must_use]
    pub fn refunds(&self) -> Vec<(ChargeId, Money)> {
        self.lock()
            .calls
            .iter()
            .filter_map(|call| match call {
                GatewayCall::Refund { charge, amount } => Some((charge.clone(), *amount)),
                _ => None,
            })
            .collect()
    }

    /// The capture calls made so far, in order
    #[must_use]
    pub fn captures(&self) -> Vec<AuthorizationId> {
        self.lock()
            .calls
            .iter()
            .filter_map(|call| match call {
                GatewayCall::Capture { authorization, .. } => Some(authorization.clone()),
                _ => None,
            })
            .collect()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, GatewayState> {
        self.state
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn next_handle(&self, prefix: &str) -> String {
        let n = self.sequence.fetch_add(1, Ordering::Relaxed);
        format!("{prefix}_{n}")
    }
}

impl PaymentGateway for ScriptedPaymentGateway {
    fn create_authorization(
        &self,
        customer: CustomerRef,
        amount: Money,
        currency: Currency,
    ) -> GatewayFuture<Authorization> {
        let this = self.clone();
        Box::pin(async move {
            let handle = this.next_handle("pi");
            let mut state = this.lock();
            state.calls.push(GatewayCall::CreateAuthorization {
                customer: customer.clone(),
                amount,
                currency,
            });
            if let Some(error) = state.authorization_failures.pop_front() {
                return Err(error);
            }
            let key = (customer.user_id.to_string(), amount.cents());
            let id = state
                .open_authorizations
                .entry(key)
                .or_insert_with(|| AuthorizationId::new(handle))
                .clone();
            state.authorized_amounts.insert(id.clone(), amount);
            Ok(Authorization { id, amount })
        })
    }

    fn capture(
        &self,
        authorization: AuthorizationId,
        payment_method: PaymentMethodId,
    ) -> GatewayFuture<Capture> {
        let this = self.clone();
        Box::pin(async move {
            let handle = this.next_handle("ch");
            let mut state = this.lock();
            state.calls.push(GatewayCall::Capture {
                authorization: authorization.clone(),
                payment_method,
            });
            if let Some(error) = state.capture_failures.pop_front() {
                return Err(error);
            }
            if state.captured.contains_key(&authorization) {
                return Err(GatewayError::AuthorizationExpired { authorization });
            }
            let charge = ChargeId::new(handle);
            let amount = state
                .authorized_amounts
                .get(&authorization)
                .copied()
                .unwrap_or(Money::from_cents(0));
            state.captured.insert(authorization.clone(), charge.clone());
            state
                .open_authorizations
                .retain(|_, open| *open != authorization);
            Ok(Capture { charge, amount })
        })
    }

    fn refund(&self, charge: ChargeId, amount: Money) -> GatewayFuture<Refund> {
        let this = self.clone();
        Box::pin(async move {
            let handle = this.next_handle("re");
            let mut state = this.lock();
            state.calls.push(GatewayCall::Refund {
                charge: charge.clone(),
                amount,
            });
            if let Some(error) = state.refund_failures.pop_front() {
                return Err(error);
            }
            Ok(Refund {
                id: RefundId::new(handle),
                amount,
            })
        })
    }

    fn attach_payment_method(
        &self,
        customer: CustomerRef,
        fingerprint: CardFingerprint,
    ) -> GatewayFuture<PaymentMethodId> {
        let this = self.clone();
        Box::pin(async move {
            let handle = this.next_handle("pm");
            let mut state = this.lock();
            state.calls.push(GatewayCall::AttachPaymentMethod {
                customer: customer.clone(),
                fingerprint: fingerprint.clone(),
            });
            let key = (
                customer.user_id.to_string(),
                fingerprint.as_str().to_string(),
            );
            let id = state
                .saved_methods
                .entry(key)
                .or_insert_with(|| PaymentMethodId::new(handle))
                .clone();
            Ok(id)
        })
    }
}

// ============================================================================
// Recording notification sink
// ============================================================================

/// [`NotificationSink`] that records every dispatched notice.
///
/// Set `fail_deliveries` to make every dispatch fail, for verifying that
/// notification failures never affect operation outcomes.
#[derive(Clone, Default)]
pub struct RecordingSink {
    notices: Arc<Mutex<Vec<Notice>>>,
    fail_deliveries: Arc<AtomicBool>,
}

impl RecordingSink {
    /// Creates a sink that accepts every notice
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent dispatch fail
    pub fn fail_deliveries(&self) {
        self.fail_deliveries.store(true, Ordering::Relaxed);
    }

    /// All notices dispatched so far, in order (including failed deliveries)
    #[must_use]
    pub fn notices(&self) -> Vec<Notice> {
        self.notices
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }
}

impl NotificationSink for RecordingSink {
    fn dispatch(&self, notice: Notice) -> NotifyFuture {
        let notices = Arc::clone(&self.notices);
        let fail = self.fail_deliveries.load(Ordering::Relaxed);
        Box::pin(async move {
            notices
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner)
                .push(notice);
            if fail {
                return Err(NotifyError::Delivery("scripted failure".to_string()));
            }
            Ok(())
        })
    }
}
