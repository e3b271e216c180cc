use markio_engine::{db_types::Payout, WithdrawalError};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WithdrawRequest {
    /// The amount to withdraw, in major currency units, with at most two decimal places.
    pub amount: Decimal,
}

/// The outcome of a withdrawal request.
///
/// `status` is `success` for a completed withdrawal, and otherwise one of the statuses of [`WithdrawalError`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WithdrawResponse {
    pub status: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payout: Option<Payout>,
}

impl WithdrawResponse {
    pub fn success(payout: Payout) -> Self {
        let message = format!("A payout of {} {} is on its way", payout.amount, payout.currency);
        Self { status: "success".into(), message, payout: Some(payout) }
    }

    pub fn failure(err: &WithdrawalError) -> Self {
        let payout = match err {
            WithdrawalError::Mismatch { payout, .. } => Some(payout.as_ref().clone()),
            _ => None,
        };
        Self { status: err.status().into(), message: err.to_string(), payout }
    }
}
