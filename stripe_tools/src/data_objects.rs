use std::collections::BTreeMap;

use markio_common::Cents;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{helpers::FormParams, StripeApiError};

/// Stripe wraps collections in a list object.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct List<T> {
    pub data: Vec<T>,
    #[serde(default)]
    pub has_more: bool,
}

//--------------------------------------       Balance        ---------------------------------------------------------
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BalanceAmount {
    pub amount: Cents,
    pub currency: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StripeBalance {
    #[serde(default)]
    pub available: Vec<BalanceAmount>,
    #[serde(default)]
    pub pending: Vec<BalanceAmount>,
    #[serde(default)]
    pub livemode: bool,
}

impl StripeBalance {
    /// The first available balance entry. Connected accounts in the marketplace hold a single currency.
    pub fn first_available(&self) -> Option<&BalanceAmount> {
        self.available.first()
    }
}

//--------------------------------------     Bank account     ---------------------------------------------------------
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BankAccount {
    pub id: String,
    pub currency: String,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub last4: Option<String>,
    #[serde(default)]
    pub default_for_currency: Option<bool>,
}

//--------------------------------------        Payout        ---------------------------------------------------------
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StripePayout {
    pub id: String,
    pub amount: Cents,
    pub currency: String,
    pub status: String,
    #[serde(default)]
    pub failure_code: Option<String>,
    #[serde(default)]
    pub failure_message: Option<String>,
    #[serde(default)]
    pub arrival_date: Option<i64>,
    /// The complete response body, kept for auditing.
    #[serde(skip)]
    pub raw: Value,
}

impl StripePayout {
    pub fn from_json(value: Value) -> Result<Self, StripeApiError> {
        let mut payout: Self =
            serde_json::from_value(value.clone()).map_err(|e| StripeApiError::JsonError(e.to_string()))?;
        payout.raw = value;
        Ok(payout)
    }

    pub fn is_failed(&self) -> bool {
        self.status == "failed" || self.failure_code.is_some()
    }
}

//--------------------------------------   Checkout session   ---------------------------------------------------------
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CheckoutSession {
    pub id: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub payment_status: Option<String>,
}

#[derive(Debug, Clone)]
pub struct CheckoutLineItem {
    pub name: String,
    pub currency: String,
    pub unit_amount: Cents,
    pub quantity: i64,
}

/// Parameters for `POST /v1/checkout/sessions` using destination charges: the funds are transferred to the vendor's
/// connected account, less the marketplace's application fee.
#[derive(Debug, Clone)]
pub struct NewCheckoutSession {
    pub customer_email: Option<String>,
    pub payment_method_types: Vec<String>,
    pub line_items: Vec<CheckoutLineItem>,
    pub application_fee_amount: Cents,
    pub destination: String,
    pub metadata: BTreeMap<String, String>,
    pub success_url: String,
    pub cancel_url: String,
}

impl NewCheckoutSession {
    /// Flattens the session into Stripe's bracketed form encoding.
    pub fn to_form_params(&self) -> FormParams {
        let mut params = FormParams::new();
        params.push("mode", "payment");
        if let Some(email) = &self.customer_email {
            params.push("customer_email", email);
        }
        for (i, method) in self.payment_method_types.iter().enumerate() {
            params.push(format!("payment_method_types[{i}]"), method);
        }
        for (i, item) in self.line_items.iter().enumerate() {
            let prefix = format!("line_items[{i}]");
            params.push(format!("{prefix}[price_data][currency]"), &item.currency);
            params.push(format!("{prefix}[price_data][unit_amount]"), item.unit_amount.value().to_string());
            params.push(format!("{prefix}[price_data][product_data][name]"), &item.name);
            params.push(format!("{prefix}[quantity]"), item.quantity.to_string());
        }
        params.push("payment_intent_data[application_fee_amount]", self.application_fee_amount.value().to_string());
        params.push("payment_intent_data[transfer_data][destination]", &self.destination);
        for (key, value) in &self.metadata {
            params.push(format!("payment_intent_data[metadata][{key}]"), value);
        }
        params.push("success_url", &self.success_url);
        params.push("cancel_url", &self.cancel_url);
        params
    }
}
