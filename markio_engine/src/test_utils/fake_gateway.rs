//! An in-memory payment processor for exercising the engine APIs without a network.
use std::sync::{Arc, Mutex, MutexGuard};

use serde_json::json;

use crate::{
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

#[derive(Debug, Default)]
pub struct FakeGatewayState {
    /// The available balance. `None` means the processor reports no balance at all.
    pub balance: Option<Cents>,
    pub bank_accounts: Vec<GatewayBankAccount>,
    /// If set, payouts come back with this amount instead of the requested one.
    pub payout_amount_override: Option<Cents>,
    /// If set, payouts come back as failed with this failure code.
    pub payout_failure: Option<String>,
    pub fail_balance: bool,
    pub fail_create: bool,
    pub fail_cancel: bool,
    pub payouts: Vec<GatewayPayout>,
    pub cancelled: Vec<String>,
    pub balance_requests: usize,
    pub sessions: Vec<CheckoutRequest>,
}

#[derive(Debug, Clone, Default)]
pub struct FakeGateway {
    state: Arc<Mutex<FakeGatewayState>>,
}

impl FakeGateway {
    /// A processor account holding `balance` cents with a single euro bank account.
    pub fn with_balance(balance: i64) -> Self {
        let gateway = Self::default();
        {
            let mut state = gateway.state();
            state.balance = Some(Cents::from(balance));
            state.bank_accounts.push(GatewayBankAccount { id: "ba_1".into(), currency: "eur".into() });
        }
        gateway
    }

    pub fn state(&self) -> MutexGuard<'_, FakeGatewayState> {
        self.state.lock().expect("Gateway state lock poisoned")
    }
}

impl PaymentProcessor for FakeGateway {
    async fn retrieve_balance(&self, _account: &str) -> Result<Option<ExternalBalance>, GatewayError> {
        let mut state = self.state();
        state.balance_requests += 1;
        if state.fail_balance {
            return Err(GatewayError::Communication("balance unavailable".into()));
        }
        Ok(state.balance.map(|amount| ExternalBalance { amount, currency: "eur".into() }))
    }

    async fn retrieve_bank_accounts(&self, _account: &str) -> Result<Vec<GatewayBankAccount>, GatewayError> {
        Ok(self.state().bank_accounts.clone())
    }

    async fn create_payout(&self, amount: Cents, currency: &str, _account: &str) -> Result<GatewayPayout, GatewayError> {
        // Give other tasks a chance to run, as a network call would
        tokio::task::yield_now().await;
        let mut state = self.state();
        if state.fail_create {
            return Err(GatewayError::Rejected("payouts are disabled".into()));
        }
        let amount = state.payout_amount_override.unwrap_or(amount);
        if let Some(balance) = state.balance.as_mut() {
            *balance -= amount;
        }
        let id = format!("po_{}", state.payouts.len() + 1);
        let failure_code = state.payout_failure.clone();
        let status = if failure_code.is_some() { GatewayPayoutStatus::Failed } else { GatewayPayoutStatus::InTransit };
        let raw = json!({
            "id": id,
            "object": "payout",
            "amount": amount.value(),
            "currency": currency,
            "status": if failure_code.is_some() { "failed" } else { "in_transit" },
            "failure_code": failure_code,
        });
        let payout = GatewayPayout { id, amount, currency: currency.to_string(), status, failure_code, raw };
        state.payouts.push(payout.clone());
        Ok(payout)
    }

    async fn cancel_payout(&self, payout_id: &str, _account: &str) -> Result<(), GatewayError> {
        let mut state = self.state();
        if state.fail_cancel {
            return Err(GatewayError::Rejected(format!("{payout_id} is already paid")));
        }
        state.cancelled.push(payout_id.to_string());
        Ok(())
    }
}

impl CheckoutProcessor for FakeGateway {
    async fn create_checkout_session(&self, request: CheckoutRequest) -> Result<CheckoutSessionRef, GatewayError> {
        let mut state = self.state();
        state.sessions.push(request);
        let id = format!("cs_test_{}", state.sessions.len());
        Ok(CheckoutSessionRef { url: Some(format!("https://checkout.example.com/{id}")), id })
    }
}
