use thiserror::Error;

use crate::{
    db_types::Cents,
    traits::{CheckoutRequest, CheckoutSessionRef, ExternalBalance, GatewayBankAccount, GatewayPayout},
};

#[derive(Debug, Clone, Error)]
pub enum GatewayError {
    #[error("The payment processor rejected the request. {0}")]
    Rejected(String),
    #[error("Could not communicate with the payment processor. {0}")]
    Communication(String),
    #[error("Unexpected response from the payment processor. {0}")]
    InvalidResponse(String),
}

/// The external balance gateway. Every call is made on behalf of a vendor's connected processor account.
#[allow(async_fn_in_trait)]
pub trait PaymentProcessor {
    /// The vendor's available balance on the processor. `None` if the processor reports no available balance at all.
    async fn retrieve_balance(&self, account: &str) -> Result<Option<ExternalBalance>, GatewayError>;

    async fn retrieve_bank_accounts(&self, account: &str) -> Result<Vec<GatewayBankAccount>, GatewayError>;

    async fn create_payout(&self, amount: Cents, currency: &str, account: &str) -> Result<GatewayPayout, GatewayError>;

    async fn cancel_payout(&self, payout_id: &str, account: &str) -> Result<(), GatewayError>;
}

#[allow(async_fn_in_trait)]
pub trait CheckoutProcessor {
    async fn create_checkout_session(&self, request: CheckoutRequest) -> Result<CheckoutSessionRef, GatewayError>;
}
