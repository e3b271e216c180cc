use serde::{Deserialize, Serialize};

use crate::db_types::{Cents, Payout};

/// Published after a payout has been created on the processor, stored, and matched the requested amount.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayoutCreatedEvent {
    pub vendor_id: i64,
    pub payout: Payout,
}

impl PayoutCreatedEvent {
    pub fn new(vendor_id: i64, payout: Payout) -> Self {
        Self { vendor_id, payout }
    }
}

/// Published when the processor returned a payout that did not match the request (or reported it as failed).
/// `cancelled` is false if the cancellation on the processor did not go through, in which case the payout needs
/// manual attention.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayoutMismatchEvent {
    pub vendor_id: i64,
    pub payout: Payout,
    pub requested: Cents,
    pub returned: Cents,
    pub cancelled: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EventType {
    PayoutCreated(PayoutCreatedEvent),
    PayoutMismatch(PayoutMismatchEvent),
}
