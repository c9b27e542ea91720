//! Payment processor contract.
//!
//! Thin, typed facade over a card processor's API. Authorizations are
//! created ahead of admission and captured only once a seat is actually
//! granted; refunds are issued net of the non-recoverable processing fee.
//! All operations are remote calls and may fail independently of roster
//! state, which is why capture and refund results are recorded back onto the
//! document rather than assumed.

use crate::types::{
    AuthorizationId, CardFingerprint, ChargeId, Currency, CustomerRef, Money, PaymentMethodId,
    RefundId,
};
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// Errors from the payment gateway
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GatewayError {
    /// The processor declined the charge
    #[error("card declined: {reason}")]
    Declined {
        /// Processor-supplied decline reason
        reason: String,
    },

    /// The stored authorization is no longer capturable
    #[error("authorization {authorization} has expired")]
    AuthorizationExpired {
        /// The expired authorization
        authorization: AuthorizationId,
    },

    /// The payment method is unknown or unusable
    #[error("invalid payment method: {reason}")]
    InvalidPaymentMethod {
        /// What the processor objected to
        reason: String,
    },

    /// The processor did not answer in time
    #[error("gateway request timed out")]
    Timeout,

    /// The processor is unreachable or returned a server error
    #[error("gateway unavailable: {reason}")]
    Unavailable {
        /// Transport or server-side failure detail
        reason: String,
    },
}

impl GatewayError {
    /// Whether retrying the same call might succeed
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Timeout | Self::Unavailable { .. })
    }
}

/// A created (but not yet captured) charge authorization
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Authorization {
    /// Processor handle for the authorization
    pub id: AuthorizationId,
    /// Amount the authorization was created for
    pub amount: Money,
}

/// A settled charge
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Capture {
    /// Processor handle for the settled charge
    pub charge: ChargeId,
    /// Amount settled
    pub amount: Money,
}

/// An issued refund
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Refund {
    /// Processor handle for the refund
    pub id: RefundId,
    /// Amount returned to the payer, net of the processing fee
    pub amount: Money,
}

/// Boxed future returned by gateway operations
pub type GatewayFuture<T> = Pin<Box<dyn Future<Output = Result<T, GatewayError>> + Send>>;

/// Card processor operations the engine depends on.
///
/// Dyn-compatible; the engine holds an `Arc<dyn PaymentGateway>`.
pub trait PaymentGateway: Send + Sync {
    /// Creates a charge authorization for a customer.
    ///
    /// Idempotent per customer and amount: repeated calls for the same
    /// customer reuse an existing open authorization instead of minting a
    /// duplicate. The currency is fixed at event setup, never negotiated
    /// per call.
    fn create_authorization(
        &self,
        customer: CustomerRef,
        amount: Money,
        currency: Currency,
    ) -> GatewayFuture<Authorization>;

    /// Settles a previously created authorization with a payment method.
    fn capture(
        &self,
        authorization: AuthorizationId,
        payment_method: PaymentMethodId,
    ) -> GatewayFuture<Capture>;

    /// Refunds `amount` of a settled charge.
    fn refund(&self, charge: ChargeId, amount: Money) -> GatewayFuture<Refund>;

    /// Stores a payment method against a customer.
    ///
    /// Deduplicated by card fingerprint: saving a card the customer already
    /// has on file returns the existing handle.
    fn attach_payment_method(
        &self,
        customer: CustomerRef,
        fingerprint: CardFingerprint,
    ) -> GatewayFuture<PaymentMethodId>;
}
