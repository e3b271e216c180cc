use std::collections::BTreeMap;

use log::*;
use markio_engine::{
    db_types::Cents,
    traits::{
        CheckoutProcessor,
        CheckoutRequest,
        CheckoutSessionRef,
        ExternalBalance,
        GatewayBankAccount,
        GatewayError,
        GatewayPayout,
        GatewayPayoutStatus,
        PaymentProcessor,
    },
};
use stripe_tools::{CheckoutLineItem, NewCheckoutSession, StripeApi, StripeApiError, StripePayout};

use crate::config::CheckoutConfig;

const PAYMENT_METHOD_TYPES: [&str; 2] = ["card", "ideal"];

/// Stripe Connect gateway. Payouts and balances are queried on the vendor's connected account. Checkout sessions are
/// destination charges on the platform account.
#[derive(Clone)]
pub struct StripeGateway {
    api: StripeApi,
    checkout: CheckoutConfig,
}

impl StripeGateway {
    pub fn new(api: StripeApi, checkout: CheckoutConfig) -> Self {
        Self { api, checkout }
    }
}

fn gateway_error(e: StripeApiError) -> GatewayError {
    match e {
        StripeApiError::QueryError { status, message } => GatewayError::Rejected(format!("[{status}] {message}")),
        StripeApiError::Initialization(s) | StripeApiError::RestResponseError(s) => GatewayError::Communication(s),
        StripeApiError::JsonError(s) => GatewayError::InvalidResponse(s),
        StripeApiError::EmptyResponse => GatewayError::InvalidResponse("The response was empty".into()),
    }
}

fn to_gateway_payout(payout: StripePayout) -> GatewayPayout {
    GatewayPayout {
        status: GatewayPayoutStatus::from(payout.status.as_str()),
        id: payout.id,
        amount: payout.amount,
        currency: payout.currency,
        failure_code: payout.failure_code,
        raw: payout.raw,
    }
}

impl PaymentProcessor for StripeGateway {
    async fn retrieve_balance(&self, account: &str) -> Result<Option<ExternalBalance>, GatewayError> {
        let balance = self.api.retrieve_balance(account).await.map_err(gateway_error)?;
        let available = balance
            .first_available()
            .map(|b| ExternalBalance { amount: b.amount, currency: b.currency.clone() });
        Ok(available)
    }

    async fn retrieve_bank_accounts(&self, account: &str) -> Result<Vec<GatewayBankAccount>, GatewayError> {
        let accounts = self.api.list_bank_accounts(account).await.map_err(gateway_error)?;
        Ok(accounts.into_iter().map(|a| GatewayBankAccount { id: a.id, currency: a.currency }).collect())
    }

    async fn create_payout(&self, amount: Cents, currency: &str, account: &str) -> Result<GatewayPayout, GatewayError> {
        let payout = self.api.create_payout(account, amount, currency).await.map_err(gateway_error)?;
        Ok(to_gateway_payout(payout))
    }

    async fn cancel_payout(&self, payout_id: &str, account: &str) -> Result<(), GatewayError> {
        let payout = self.api.cancel_payout(account, payout_id).await.map_err(gateway_error)?;
        if payout.status == "canceled" {
            Ok(())
        } else {
            warn!("Payout {payout_id} could not be cancelled. Its status is {}", payout.status);
            Err(GatewayError::Rejected(format!("Payout {payout_id} has status {}", payout.status)))
        }
    }
}

impl CheckoutProcessor for StripeGateway {
    async fn create_checkout_session(&self, request: CheckoutRequest) -> Result<CheckoutSessionRef, GatewayError> {
        let session = new_checkout_session(request, &self.checkout);
        let session = self.api.create_checkout_session(&session).await.map_err(gateway_error)?;
        Ok(CheckoutSessionRef { id: session.id, url: session.url })
    }
}

fn new_checkout_session(request: CheckoutRequest, urls: &CheckoutConfig) -> NewCheckoutSession {
    let line_item = CheckoutLineItem {
        name: request.product_title,
        currency: request.currency,
        unit_amount: request.unit_amount,
        quantity: request.quantity,
    };
    NewCheckoutSession {
        customer_email: request.customer_email,
        payment_method_types: PAYMENT_METHOD_TYPES.iter().map(|s| s.to_string()).collect(),
        line_items: vec![line_item],
        application_fee_amount: request.application_fee,
        destination: request.account,
        metadata: request.metadata.into_iter().collect::<BTreeMap<_, _>>(),
        success_url: urls.success_url.clone(),
        cancel_url: urls.cancel_url.clone(),
    }
}
