//! # Matchday Engine
//!
//! The imperative shell around the roster core: loads event documents,
//! applies pure transitions, talks to the payment gateway, and commits the
//! result with optimistic concurrency.
//!
//! ## Reconciliation model
//!
//! Every operation follows the same shape:
//!
//! 1. Serialize against other in-process work on the same event.
//! 2. Load the document and its version.
//! 3. Validate preconditions and perform any payment side effects.
//! 4. Apply pure transitions, check invariants, commit with the loaded
//!    version.
//! 5. On a version conflict, re-derive the whole decision from a fresh load
//!    and try again.
//!
//! Money movements are guarded so a retry loop never captures or refunds the
//! same amount twice: a capture or refund that succeeded before a lost
//! commit race is reused on the next attempt. If a capture turns out to be
//! for a decision that no longer holds (the seat vanished while we raced), a
//! compensating refund of the full amount is issued before the operation
//! reports failure.

pub mod config;
pub mod error;
pub mod outcome;
pub mod retry;

pub use config::EngineConfig;
pub use error::EngineError;
pub use outcome::{
    CancellationOutcome, EventCancellation, JoinOutcome, PromotionReport, RemovedFrom,
};
pub use retry::RetryPolicy;

use matchday_core::environment::Clock;
use matchday_core::gateway::{Capture, GatewayError, PaymentGateway, Refund};
use matchday_core::notify::{Notice, NoticeKind, NotificationSink, Recipient};
use matchday_core::roster::{MatchEvent, Membership, NewMatchEvent};
use matchday_core::store::{RosterStore, StoreError, Version};
use matchday_core::types::{
    AuthorizationId, ChargeId, EventId, EventSnapshot, Money, PaymentAuthorization,
    PaymentMethodId, Role, UserId,
};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, PoisonError};

/// The roster reconciliation engine.
///
/// Holds its collaborators as trait objects so storage, payments,
/// notifications, and time can all be swapped for test doubles. Cloning is
/// cheap and shares the per-event lock table, so one engine value can be
/// shared across tasks.
#[derive(Clone)]
pub struct Engine {
    store: Arc<dyn RosterStore>,
    gateway: Arc<dyn PaymentGateway>,
    sink: Arc<dyn NotificationSink>,
    clock: Arc<dyn Clock>,
    config: EngineConfig,
    locks: Arc<Mutex<HashMap<EventId, Arc<tokio::sync::Mutex<()>>>>>,
}

impl Engine {
    /// Creates an engine over the given collaborators
    #[must_use]
    pub fn new(
        store: Arc<dyn RosterStore>,
        gateway: Arc<dyn PaymentGateway>,
        sink: Arc<dyn NotificationSink>,
        clock: Arc<dyn Clock>,
        config: EngineConfig,
    ) -> Self {
        Self {
            store,
            gateway,
            sink,
            clock,
            config,
            locks: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    // ------------------------------------------------------------------
    // Operations
    // ------------------------------------------------------------------

    /// Opens a new event for registration.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidEvent`] for bad setup parameters or a
    /// kickoff in the past, and [`EngineError::Store`] if the insert fails.
    pub async fn create_event(&self, setup: NewMatchEvent) -> Result<EventSnapshot, EngineError> {
        if setup.starts_at <= self.clock.now() {
            return Err(EngineError::InvalidEvent {
                reason: "event must start in the future".to_string(),
            });
        }
        let document = MatchEvent::create(EventId::new(), setup)?;
        let snapshot = document.snapshot();
        self.store.insert(document).await?;
        tracing::info!(event_id = %snapshot.event_id, title = %snapshot.title, "event created");
        self.dispatch(Notice {
            recipient: Recipient::Broadcast,
            kind: NoticeKind::EventCreated,
            event: snapshot.clone(),
        })
        .await;
        Ok(snapshot)
    }

    /// Registers a user for an event.
    ///
    /// When a seat is open the user is admitted; for a paid seat their
    /// pre-created authorization is captured first, so a committed admission
    /// always has a settled charge behind it. When the roster is full the
    /// user joins the waitlist tail and their payment details are stored
    /// uncaptured, to be charged only on promotion.
    ///
    /// # Errors
    ///
    /// Precondition failures ([`EngineError::DuplicateMembership`],
    /// [`EngineError::EventNotActive`], [`EngineError::RoleUnavailable`],
    /// [`EngineError::PaymentRequired`]) leave no trace. A capture failure
    /// surfaces as [`EngineError::PaymentCaptureFailed`] with no state
    /// change. [`EngineError::ConcurrentModification`] means the commit race
    /// was lost past the retry budget; any charge taken along the way has
    /// been refunded in full.
    pub async fn join(
        &self,
        event_id: EventId,
        user_id: UserId,
        role: Role,
        payment: Option<PaymentAuthorization>,
    ) -> Result<JoinOutcome, EngineError> {
        let lock = self.event_lock(event_id);
        let _guard = lock.lock().await;

        let policy = self.config.commit_retry_policy();
        let mut captured: Option<(ChargeId, Money)> = None;
        let mut attempt = 0;

        loop {
            let (mut doc, version) = self.load(event_id).await?;

            // A past event is closed to registration even when never cancelled.
            if !doc.is_active() || self.clock.now() >= doc.starts_at {
                self.release_charge(captured.take(), event_id).await;
                return Err(EngineError::EventNotActive);
            }
            // A refunded user counts as already registered: they cancelled,
            // took their money back, and do not get the seat again.
            if doc.membership_of(user_id).is_some() || doc.is_refunded(user_id) {
                self.release_charge(captured.take(), event_id).await;
                return Err(EngineError::DuplicateMembership { user_id });
            }
            if !doc.role_supported(role) {
                self.release_charge(captured.take(), event_id).await;
                return Err(EngineError::RoleUnavailable { role });
            }

            let cost = doc.cost_for(role);

            if doc.seat_available(role) {
                let mut charged = None;
                if !cost.is_zero() {
                    let Some(pay) = payment.clone() else {
                        return Err(EngineError::PaymentRequired { role });
                    };
                    let (charge, amount) = match &captured {
                        Some((charge, amount)) => (charge.clone(), *amount),
                        None => {
                            let capture = self
                                .capture_once(
                                    pay.authorization.clone(),
                                    pay.payment_method.clone(),
                                )
                                .await
                                .map_err(|reason| EngineError::PaymentCaptureFailed { reason })?;
                            captured = Some((capture.charge.clone(), cost));
                            (capture.charge, cost)
                        }
                    };
                    doc.admit(user_id, role)?;
                    doc.record_authorization(user_id, pay, amount)?;
                    doc.record_capture(user_id, charge)?;
                    charged = Some(amount);
                } else {
                    doc.admit(user_id, role)?;
                }
                doc.check_invariants()?;

                match self.store.commit(version, doc.clone()).await {
                    Ok(_) => {
                        tracing::info!(
                            event_id = %event_id,
                            user_id = %user_id,
                            role = %role,
                            charged = charged.map(|m| m.cents()),
                            "user admitted"
                        );
                        self.dispatch(Notice {
                            recipient: Recipient::User(user_id),
                            kind: NoticeKind::Admitted { role, charged },
                            event: doc.snapshot(),
                        })
                        .await;
                        return Ok(JoinOutcome::Admitted { role, charged });
                    }
                    Err(StoreError::VersionConflict { .. }) if attempt < policy.max_retries => {
                        tracing::warn!(event_id = %event_id, attempt, "join lost commit race");
                        policy.wait(attempt).await;
                        attempt += 1;
                    }
                    Err(StoreError::VersionConflict { .. }) => {
                        self.release_charge(captured.take(), event_id).await;
                        return Err(EngineError::ConcurrentModification);
                    }
                    Err(error) => {
                        self.release_charge(captured.take(), event_id).await;
                        return Err(error.into());
                    }
                }
            } else {
                // The seat we captured for disappeared between attempts;
                // return the money rather than seating the user elsewhere.
                if captured.is_some() {
                    self.release_charge(captured.take(), event_id).await;
                    return Err(EngineError::ConcurrentModification);
                }

                let position = doc.enqueue_waitlist(user_id, role)?;
                if !cost.is_zero() {
                    let Some(pay) = payment.clone() else {
                        return Err(EngineError::PaymentRequired { role });
                    };
                    doc.record_authorization(user_id, pay, cost)?;
                }
                doc.check_invariants()?;

                match self.store.commit(version, doc.clone()).await {
                    Ok(_) => {
                        tracing::info!(
                            event_id = %event_id,
                            user_id = %user_id,
                            role = %role,
                            position,
                            "user waitlisted"
                        );
                        self.dispatch(Notice {
                            recipient: Recipient::User(user_id),
                            kind: NoticeKind::Waitlisted { role, position },
                            event: doc.snapshot(),
                        })
                        .await;
                        return Ok(JoinOutcome::Waitlisted { role, position });
                    }
                    Err(StoreError::VersionConflict { .. }) if attempt < policy.max_retries => {
                        tracing::warn!(event_id = %event_id, attempt, "join lost commit race");
                        policy.wait(attempt).await;
                        attempt += 1;
                    }
                    Err(StoreError::VersionConflict { .. }) => {
                        return Err(EngineError::ConcurrentModification);
                    }
                    Err(error) => return Err(error.into()),
                }
            }
        }
    }

    /// Cancels a user's registration.
    ///
    /// Rostered members must cancel before the window closes; they are
    /// refunded net of the processing fee and the freed seat is offered to
    /// the waitlist head, who is charged on promotion. Waitlisted members
    /// may leave at any time; their stored authorization is discarded
    /// uncaptured and nothing is refunded.
    ///
    /// # Errors
    ///
    /// [`EngineError::RefundFailed`] leaves the member in place so the
    /// cancellation can be retried once the gateway recovers.
    pub async fn cancel_membership(
        &self,
        event_id: EventId,
        user_id: UserId,
    ) -> Result<CancellationOutcome, EngineError> {
        let lock = self.event_lock(event_id);
        let _guard = lock.lock().await;

        let policy = self.config.commit_retry_policy();
        let mut refund_issued: Option<(ChargeId, Money)> = None;
        let mut refund_settled = false;
        let mut promotion_capture: Option<(UserId, ChargeId, Money)> = None;
        let mut attempt = 0;

        loop {
            let (mut doc, version) = self.load(event_id).await?;

            if !doc.is_active() {
                return Err(EngineError::EventNotActive);
            }
            if doc.membership_of(user_id).is_none() {
                return Err(EngineError::NotRegistered { user_id });
            }

            let closes_at =
                doc.starts_at - chrono::Duration::hours(self.config.cancellation_window_hours);
            if self.clock.now() >= closes_at {
                return Err(EngineError::CancellationWindowClosed { closes_at });
            }

            // Refund a captured charge exactly once across retries.
            let ledger_entry = doc.ledger.get(&user_id).cloned();
            if !refund_settled {
                if let Some(entry) = &ledger_entry {
                    if let Some(charge) = &entry.charge {
                        let net = entry.amount.refund_after_fee();
                        if !net.is_zero() {
                            let refund: Refund = self
                                .refund_with_retry(charge.clone(), net)
                                .await
                                .map_err(|reason| EngineError::RefundFailed { reason })?;
                            tracing::info!(
                                event_id = %event_id,
                                user_id = %user_id,
                                refund_id = %refund.id,
                                amount = net.cents(),
                                "cancellation refund issued"
                            );
                            refund_issued = Some((charge.clone(), net));
                        }
                        refund_settled = true;
                    }
                }
            }

            let removed = match doc.remove_member(user_id)? {
                Membership::Rostered { role } => RemovedFrom::Roster(role),
                Membership::Waitlisted { role, .. } => RemovedFrom::Waitlist(role),
            };
            if refund_settled {
                doc.record_refund(user_id);
            } else {
                // Uncaptured authorization: drop it and let it expire.
                doc.ledger.remove(&user_id);
            }

            let promotion = if matches!(removed, RemovedFrom::Roster(_)) {
                self.promote_into_seat(&mut doc, removed.role(), &mut promotion_capture)
                    .await?
            } else {
                PromotionReport::None
            };

            doc.check_invariants()?;

            match self.store.commit(version, doc.clone()).await {
                Ok(_) => {
                    tracing::info!(
                        event_id = %event_id,
                        user_id = %user_id,
                        role = %removed.role(),
                        refunded = refund_issued.as_ref().map(|(_, m)| m.cents()),
                        "membership cancelled"
                    );
                    let snapshot = doc.snapshot();
                    self.dispatch(Notice {
                        recipient: Recipient::User(user_id),
                        kind: NoticeKind::RemovalConfirmed {
                            role: removed.role(),
                        },
                        event: snapshot.clone(),
                    })
                    .await;
                    if let Some((_, amount)) = &refund_issued {
                        self.dispatch(Notice {
                            recipient: Recipient::User(user_id),
                            kind: NoticeKind::RefundIssued { amount: *amount },
                            event: snapshot.clone(),
                        })
                        .await;
                    }
                    if let PromotionReport::Promoted { user_id: promoted, charged } = &promotion {
                        self.dispatch(Notice {
                            recipient: Recipient::User(*promoted),
                            kind: NoticeKind::Promoted {
                                role: removed.role(),
                                charged: *charged,
                            },
                            event: snapshot,
                        })
                        .await;
                    }
                    return Ok(CancellationOutcome {
                        removed_from: removed,
                        refund: refund_issued.map(|(_, amount)| amount),
                        promotion,
                    });
                }
                Err(StoreError::VersionConflict { .. }) if attempt < policy.max_retries => {
                    tracing::warn!(event_id = %event_id, attempt, "cancellation lost commit race");
                    policy.wait(attempt).await;
                    attempt += 1;
                }
                Err(StoreError::VersionConflict { .. }) => {
                    // The money moved but the membership removal never landed.
                    if let Some((charge, amount)) = &refund_issued {
                        tracing::error!(
                            event_id = %event_id,
                            user_id = %user_id,
                            charge = %charge,
                            amount = amount.cents(),
                            "refund issued but cancellation exhausted its commit budget, reconcile manually"
                        );
                    }
                    return Err(EngineError::ConcurrentModification);
                }
                Err(error) => return Err(error.into()),
            }
        }
    }

    /// Offers one open seat for a role to the waitlist head.
    ///
    /// Normally promotion happens as part of [`Self::cancel_membership`];
    /// this operation exists for reconciliation sweeps after a promotion
    /// failure (a declined card, say) left a seat open with a populated
    /// waitlist.
    ///
    /// # Errors
    ///
    /// Storage and concurrency failures as for the other operations. A
    /// failed capture is not an error here; it is reported in the
    /// [`PromotionReport`].
    pub async fn promote(
        &self,
        event_id: EventId,
        role: Role,
    ) -> Result<PromotionReport, EngineError> {
        let lock = self.event_lock(event_id);
        let _guard = lock.lock().await;

        let policy = self.config.commit_retry_policy();
        let mut promotion_capture: Option<(UserId, ChargeId, Money)> = None;
        let mut attempt = 0;

        loop {
            let (mut doc, version) = self.load(event_id).await?;
            if !doc.is_active() {
                return Err(EngineError::EventNotActive);
            }
            if !doc.role_supported(role) {
                return Err(EngineError::RoleUnavailable { role });
            }

            let report = self
                .promote_into_seat(&mut doc, role, &mut promotion_capture)
                .await?;
            if matches!(report, PromotionReport::None | PromotionReport::Failed { .. }) {
                return Ok(report);
            }
            doc.check_invariants()?;

            match self.store.commit(version, doc.clone()).await {
                Ok(_) => {
                    if let PromotionReport::Promoted { user_id, charged } = &report {
                        tracing::info!(
                            event_id = %event_id,
                            user_id = %user_id,
                            role = %role,
                            charged = charged.map(|m| m.cents()),
                            "waitlist head promoted"
                        );
                        self.dispatch(Notice {
                            recipient: Recipient::User(*user_id),
                            kind: NoticeKind::Promoted {
                                role,
                                charged: *charged,
                            },
                            event: doc.snapshot(),
                        })
                        .await;
                    }
                    return Ok(report);
                }
                Err(StoreError::VersionConflict { .. }) if attempt < policy.max_retries => {
                    policy.wait(attempt).await;
                    attempt += 1;
                }
                Err(StoreError::VersionConflict { .. }) => {
                    return Err(EngineError::ConcurrentModification);
                }
                Err(error) => return Err(error.into()),
            }
        }
    }

    /// Cancels a whole event on behalf of an organizer.
    ///
    /// Every captured charge is refunded net of the processing fee, with the
    /// refunds issued concurrently and each failure collected rather than
    /// aborting the rest. The event is then marked cancelled regardless of
    /// refund failures; users whose refunds failed keep their ledger entries
    /// for manual reconciliation. Waitlisted users were never charged and
    /// get no refund.
    ///
    /// # Errors
    ///
    /// [`EngineError::EventNotActive`] if the event is already cancelled;
    /// otherwise storage failures.
    pub async fn cancel_event(&self, event_id: EventId) -> Result<EventCancellation, EngineError> {
        let lock = self.event_lock(event_id);
        let _guard = lock.lock().await;

        let policy = self.config.commit_retry_policy();
        let mut refunded: Vec<(UserId, Money)> = Vec::new();
        let mut failures: Vec<(UserId, String)> = Vec::new();
        let mut settled: HashSet<UserId> = HashSet::new();
        let mut first_load = true;
        let mut attempt = 0;

        let snapshot = loop {
            let (mut doc, version) = self.load(event_id).await?;
            if !doc.is_active() {
                if first_load {
                    return Err(EngineError::EventNotActive);
                }
                // Another organizer finished the cancellation while we raced;
                // the refunds we issued still stand.
                break doc.snapshot();
            }
            first_load = false;

            // Each lost commit race means a concurrent writer may have landed
            // a fresh capture, so refund targets are re-derived from the
            // current ledger every time around. Already-settled users are
            // skipped; each charge moves money at most once.
            let targets: Vec<(UserId, ChargeId, Money)> = doc
                .ledger
                .iter()
                .filter(|&(user_id, _)| !settled.contains(user_id))
                .filter_map(|(user_id, entry)| {
                    entry
                        .charge
                        .as_ref()
                        .map(|charge| (*user_id, charge.clone(), entry.amount.refund_after_fee()))
                })
                .collect();

            // Fan the refunds out concurrently; each one is independent.
            let results = futures::future::join_all(targets.into_iter().map(
                |(user_id, charge, net)| async move {
                    if net.is_zero() {
                        return (user_id, Ok(net));
                    }
                    match self.refund_with_retry(charge, net).await {
                        Ok(_) => (user_id, Ok(net)),
                        Err(error) => (user_id, Err(error)),
                    }
                },
            ))
            .await;

            for (user_id, result) in results {
                settled.insert(user_id);
                match result {
                    Ok(net) => refunded.push((user_id, net)),
                    Err(error) => {
                        tracing::error!(
                            event_id = %event_id,
                            user_id = %user_id,
                            error = %error,
                            "event cancellation refund failed"
                        );
                        failures.push((user_id, error.to_string()));
                    }
                }
            }

            for (user_id, _) in &refunded {
                doc.record_refund(*user_id);
            }
            // Uncaptured authorizations are simply left to expire.
            doc.ledger.retain(|_, entry| entry.is_captured());
            doc.mark_cancelled();

            match self.store.commit(version, doc.clone()).await {
                Ok(_) => break doc.snapshot(),
                Err(StoreError::VersionConflict { .. }) if attempt < policy.max_retries => {
                    policy.wait(attempt).await;
                    attempt += 1;
                }
                Err(StoreError::VersionConflict { .. }) => {
                    return Err(EngineError::ConcurrentModification);
                }
                Err(error) => return Err(error.into()),
            }
        };

        tracing::info!(
            event_id = %event_id,
            refunded = refunded.len(),
            failures = failures.len(),
            "event cancelled"
        );
        for (user_id, amount) in &refunded {
            self.dispatch(Notice {
                recipient: Recipient::User(*user_id),
                kind: NoticeKind::RefundIssued { amount: *amount },
                event: snapshot.clone(),
            })
            .await;
        }
        self.dispatch(Notice {
            recipient: Recipient::Broadcast,
            kind: NoticeKind::EventCancelled,
            event: snapshot,
        })
        .await;

        Ok(EventCancellation { refunded, failures })
    }

    /// Loads the current document and version for inspection.
    ///
    /// # Errors
    ///
    /// [`EngineError::EventNotFound`] when no document exists.
    pub async fn inspect(&self, event_id: EventId) -> Result<(MatchEvent, Version), EngineError> {
        self.load(event_id).await
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    async fn load(&self, event_id: EventId) -> Result<(MatchEvent, Version), EngineError> {
        match self.store.load(event_id).await {
            Ok(loaded) => Ok(loaded),
            Err(StoreError::NotFound { .. }) => Err(EngineError::EventNotFound),
            Err(error) => Err(error.into()),
        }
    }

    /// Attempts to move the waitlist head for `role` onto the roster,
    /// charging their stored authorization first for paid seats.
    ///
    /// `settled` carries a capture across commit retries so the head is
    /// never charged twice. A capture failure leaves the head in place; the
    /// queue is never skipped past them.
    async fn promote_into_seat(
        &self,
        doc: &mut MatchEvent,
        role: Role,
        settled: &mut Option<(UserId, ChargeId, Money)>,
    ) -> Result<PromotionReport, EngineError> {
        if !doc.seat_available(role) {
            return Ok(PromotionReport::None);
        }
        let Some(head) = doc.waitlist_head(role) else {
            return Ok(PromotionReport::None);
        };

        let cost = doc.cost_for(role);
        if cost.is_zero() {
            doc.promote_head(role);
            return Ok(PromotionReport::Promoted {
                user_id: head,
                charged: None,
            });
        }

        let Some(entry) = doc.ledger.get(&head).cloned() else {
            tracing::warn!(user_id = %head, "waitlist head has no stored authorization");
            return Ok(PromotionReport::Failed {
                user_id: head,
                reason: "no stored payment authorization".to_string(),
            });
        };
        if entry.charge.is_some() {
            doc.promote_head(role);
            return Ok(PromotionReport::Promoted {
                user_id: head,
                charged: None,
            });
        }

        let (charge, amount) = match settled {
            Some((user_id, charge, amount)) if *user_id == head => (charge.clone(), *amount),
            _ => {
                match self
                    .capture_once(entry.authorization.clone(), entry.payment_method.clone())
                    .await
                {
                    Ok(capture) => {
                        *settled = Some((head, capture.charge.clone(), cost));
                        (capture.charge, cost)
                    }
                    Err(error) => {
                        tracing::warn!(
                            user_id = %head,
                            error = %error,
                            "promotion capture failed, head keeps their place"
                        );
                        return Ok(PromotionReport::Failed {
                            user_id: head,
                            reason: error.to_string(),
                        });
                    }
                }
            }
        };

        doc.promote_head(role);
        doc.record_capture(head, charge)?;
        Ok(PromotionReport::Promoted {
            user_id: head,
            charged: Some(amount),
        })
    }

    /// Captures exactly once, surfacing failures verbatim. A timed-out
    /// capture is ambiguous on the processor side, so it is never retried;
    /// the operation fails and the user tries again explicitly.
    async fn capture_once(
        &self,
        authorization: AuthorizationId,
        payment_method: PaymentMethodId,
    ) -> Result<Capture, GatewayError> {
        self.gateway.capture(authorization, payment_method).await
    }

    async fn refund_with_retry(
        &self,
        charge: ChargeId,
        amount: Money,
    ) -> Result<Refund, GatewayError> {
        let policy = self.config.gateway_retry_policy();
        retry::retry_transient(
            &policy,
            || self.gateway.refund(charge.clone(), amount),
            GatewayError::is_retryable,
        )
        .await
    }

    /// Returns a captured charge in full after its admission was invalidated.
    ///
    /// The full amount (not net of fee) comes back because the user received
    /// nothing for it. A failure here is logged for manual reconciliation;
    /// there is nothing further the operation can do.
    async fn release_charge(&self, captured: Option<(ChargeId, Money)>, event_id: EventId) {
        if let Some((charge, amount)) = captured {
            tracing::warn!(
                event_id = %event_id,
                charge = %charge,
                amount = amount.cents(),
                "releasing charge for invalidated admission"
            );
            if let Err(error) = self.refund_with_retry(charge.clone(), amount).await {
                tracing::error!(
                    event_id = %event_id,
                    charge = %charge,
                    error = %error,
                    "compensating refund failed, manual reconciliation required"
                );
            }
        }
    }

    async fn dispatch(&self, notice: Notice) {
        if let Err(error) = self.sink.dispatch(notice).await {
            tracing::warn!(error = %error, "notification delivery failed");
        }
    }

    fn event_lock(&self, event_id: EventId) -> Arc<tokio::sync::Mutex<()>> {
        let mut locks = self
            .locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        Arc::clone(locks.entry(event_id).or_default())
    }
}
