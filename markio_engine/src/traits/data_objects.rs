use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::db_types::Cents;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalBalance {
    pub amount: Cents,
    pub currency: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayBankAccount {
    pub id: String,
    pub currency: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GatewayPayoutStatus {
    Pending,
    InTransit,
    Paid,
    Failed,
    Canceled,
}

impl From<&str> for GatewayPayoutStatus {
    fn from(value: &str) -> Self {
        match value {
            "in_transit" => Self::InTransit,
            "paid" => Self::Paid,
            "failed" => Self::Failed,
            "canceled" => Self::Canceled,
            _ => Self::Pending,
        }
    }
}

/// A payout as reported back by the processor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GatewayPayout {
    pub id: String,
    pub amount: Cents,
    pub currency: String,
    pub status: GatewayPayoutStatus,
    pub failure_code: Option<String>,
    /// The full processor response, stored with the payout for auditing.
    pub raw: Value,
}

impl GatewayPayout {
    pub fn is_failed(&self) -> bool {
        self.status == GatewayPayoutStatus::Failed || self.failure_code.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutRequest {
    pub account: String,
    pub customer_email: Option<String>,
    pub product_title: String,
    pub currency: String,
    pub unit_amount: Cents,
    pub quantity: i64,
    /// The marketplace commission retained from the charge.
    pub application_fee: Cents,
    pub metadata: Vec<(String, String)>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutSessionRef {
    pub id: String,
    pub url: Option<String>,
}
