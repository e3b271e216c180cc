use thiserror::Error;

use crate::db_types::{Cents, Payout, Vendor};

#[derive(Debug, Clone, Error)]
pub enum LedgerError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("Vendor {0} does not exist")]
    VendorNotFound(i64),
    #[error("Payout {0} does not exist")]
    PayoutNotFound(i64),
}

impl From<sqlx::Error> for LedgerError {
    fn from(e: sqlx::Error) -> Self {
        LedgerError::DatabaseError(e.to_string())
    }
}

/// Read-only queries against the internal ledger: the orders, payments and payouts that we have recorded for each
/// vendor.
#[allow(async_fn_in_trait)]
pub trait LedgerManagement {
    async fn fetch_vendor(&self, vendor_id: i64) -> Result<Option<Vendor>, LedgerError>;

    /// Fetches the vendor profile owned by the given user, if the user is a vendor at all.
    async fn fetch_vendor_for_user(&self, user_id: i64) -> Result<Option<Vendor>, LedgerError>;

    /// The sum of all successful payments on completed orders linked to the vendor through a transaction.
    ///
    /// Returns `None` when there are no such payments, which callers must treat the same as a zero total.
    async fn completed_earnings(&self, vendor_id: i64) -> Result<Option<Cents>, LedgerError>;

    /// The sum of pending payments on pending orders linked to the vendor.
    async fn pending_earnings(&self, vendor_id: i64) -> Result<Cents, LedgerError>;

    /// The most recent payouts for the vendor, newest first.
    async fn fetch_payouts_for_vendor(&self, vendor_id: i64, limit: i64) -> Result<Vec<Payout>, LedgerError>;

    /// The most recent payout that is on its way to the vendor.
    async fn fetch_last_payout(&self, vendor_id: i64) -> Result<Option<Payout>, LedgerError>;
}
