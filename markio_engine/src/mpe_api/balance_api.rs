use std::fmt::Debug;

use serde::{Deserialize, Serialize};

use crate::{
    db_types::{Cents, Payout},
    traits::{LedgerError, LedgerManagement},
};

const RECENT_PAYOUTS: i64 = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalanceSummary {
    pub vendor_id: i64,
    /// Completed earnings according to the ledger.
    pub available_payout: Cents,
    pub pending: Cents,
    pub last_payout: Option<Cents>,
    pub payouts: Vec<Payout>,
}

pub struct BalanceApi<B> {
    db: B,
}

impl<B: Debug> Debug for BalanceApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "BalanceApi ({:?})", self.db)
    }
}

impl<B> BalanceApi<B>
where B: LedgerManagement
{
    pub fn new(db: B) -> Self {
        Self { db }
    }

    /// Summarises the ledger of the vendor owned by `user_id`. Returns `None` if the user is not a vendor.
    pub async fn balance_for_user(&self, user_id: i64) -> Result<Option<BalanceSummary>, LedgerError> {
        match self.db.fetch_vendor_for_user(user_id).await? {
            Some(vendor) => self.balance_summary(vendor.id).await.map(Some),
            None => Ok(None),
        }
    }

    pub async fn balance_summary(&self, vendor_id: i64) -> Result<BalanceSummary, LedgerError> {
        let available_payout = self.db.completed_earnings(vendor_id).await?.unwrap_or_default();
        let pending = self.db.pending_earnings(vendor_id).await?;
        let last_payout = self.db.fetch_last_payout(vendor_id).await?.map(|p| p.amount);
        let payouts = self.db.fetch_payouts_for_vendor(vendor_id, RECENT_PAYOUTS).await?;
        Ok(BalanceSummary { vendor_id, available_payout, pending, last_payout, payouts })
    }
}

#[cfg(test)]
mod test {
    use serde_json::json;

    use super::*;
    use crate::{
        db_types::{NewPayout, OrderStatusType, PaymentStatusType, PayoutStatusType},
        test_utils::{
            prepare_env::{prepare_test_env, random_db_path},
            seed,
        },
        traits::PayoutManagement,
        SqliteDatabase,
    };

    #[tokio::test]
    async fn summarises_the_ledger() {
        let url = random_db_path();
        prepare_test_env(&url).await;
        let db = SqliteDatabase::new_with_url(&url, 5).await.expect("Error creating database");
        let vendor = seed::vendor(&db, "Kiln", Some("acct_kiln")).await;
        let buyer = seed::user(&db, "buyer@example.com").await;
        let product = seed::product(&db, &vendor, "Plate", 2200).await;
        seed::completed_sale(&db, &buyer, &product, 2200).await;
        seed::paid_order(&db, &buyer, &product, 2200, OrderStatusType::Pending, PaymentStatusType::Pending).await;
        for (id, status) in [("po_1", PayoutStatusType::Omw), ("po_2", PayoutStatusType::Cancelled)] {
            let payout = NewPayout {
                vendor_id: vendor.id,
                amount: Cents::from(1000),
                currency: "eur".into(),
                fee: Cents::from(100),
                stripe_id: id.into(),
                status,
                data: json!({}),
            };
            db.insert_payout(payout).await.unwrap();
        }

        let api = BalanceApi::new(db);
        let summary = api.balance_for_user(vendor.user_id).await.unwrap().unwrap();
        assert_eq!(summary.available_payout, Cents::from(2200));
        assert_eq!(summary.pending, Cents::from(2200));
        assert_eq!(summary.last_payout, Some(Cents::from(1000)));
        assert_eq!(summary.payouts.len(), 2);
        assert_eq!(summary.payouts[0].stripe_id, "po_2");
        assert!(api.balance_for_user(buyer.id).await.unwrap().is_none());
    }
}
