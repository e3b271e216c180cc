use crate::{
    db_types::{NewPayout, Payout, PayoutStatusType, Transaction},
    traits::{LedgerError, LedgerManagement},
};

#[allow(async_fn_in_trait)]
pub trait PayoutManagement: LedgerManagement {
    /// Stores the payout, and the payout transaction linking it to the vendor, in a single atomic database
    /// transaction. Either both records exist afterwards, or neither does.
    async fn insert_payout(&self, payout: NewPayout) -> Result<(Payout, Transaction), LedgerError>;

    async fn update_payout_status(&self, payout_id: i64, status: PayoutStatusType) -> Result<Payout, LedgerError>;
}
