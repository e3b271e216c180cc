//! `SqliteDatabase` is a concrete implementation of a Markio engine backend.
//!
//! Unsurprisingly, it uses SQLite as the backend and implements all the traits defined in the [`crate::traits`]
//! module.
use std::fmt::Debug;

use log::*;
use sqlx::SqlitePool;

use super::db::{baskets, db_url, ledger, marketplace, new_pool, payouts};
use crate::{
    db_types::{
        Basket,
        BasketStatusType,
        Cents,
        Line,
        NewPayout,
        Payout,
        PayoutStatusType,
        Product,
        Transaction,
        User,
        Vendor,
    },
    traits::{BasketError, BasketManagement, LedgerError, LedgerManagement, PayoutManagement},
};

#[derive(Clone)]
pub struct SqliteDatabase {
    url: String,
    pool: SqlitePool,
}

impl Debug for SqliteDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SqliteDatabase ({:?})", self.pool)
    }
}

impl SqliteDatabase {
    /// Creates a new database API object using the `MKO_DATABASE_URL` environment variable.
    pub async fn new(max_connections: u32) -> Result<Self, sqlx::Error> {
        let url = db_url();
        SqliteDatabase::new_with_url(&url, max_connections).await
    }

    pub async fn new_with_url(url: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        trace!("🗃️ Creating new database connection pool with url {url}");
        let pool = new_pool(url, max_connections).await?;
        Ok(Self { url: url.to_string(), pool })
    }

    pub fn url(&self) -> &str {
        self.url.as_str()
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Applies any outstanding schema migrations.
    pub async fn migrate(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./src/sqlite/migrations").run(&self.pool).await?;
        info!("🗃️ Database migrations complete");
        Ok(())
    }
}

impl LedgerManagement for SqliteDatabase {
    async fn fetch_vendor(&self, vendor_id: i64) -> Result<Option<Vendor>, LedgerError> {
        let mut conn = self.pool.acquire().await?;
        let vendor = marketplace::fetch_vendor(vendor_id, &mut conn).await?;
        Ok(vendor)
    }

    async fn fetch_vendor_for_user(&self, user_id: i64) -> Result<Option<Vendor>, LedgerError> {
        let mut conn = self.pool.acquire().await?;
        let vendor = marketplace::fetch_vendor_for_user(user_id, &mut conn).await?;
        Ok(vendor)
    }

    async fn completed_earnings(&self, vendor_id: i64) -> Result<Option<Cents>, LedgerError> {
        let mut conn = self.pool.acquire().await?;
        let total = ledger::completed_earnings(vendor_id, &mut conn).await?;
        trace!("🗃️ Completed earnings for vendor #{vendor_id}: {total:?}");
        Ok(total)
    }

    async fn pending_earnings(&self, vendor_id: i64) -> Result<Cents, LedgerError> {
        let mut conn = self.pool.acquire().await?;
        let total = ledger::pending_earnings(vendor_id, &mut conn).await?;
        Ok(total)
    }

    async fn fetch_payouts_for_vendor(&self, vendor_id: i64, limit: i64) -> Result<Vec<Payout>, LedgerError> {
        let mut conn = self.pool.acquire().await?;
        let payouts = payouts::fetch_payouts_for_vendor(vendor_id, limit, &mut conn).await?;
        Ok(payouts)
    }

    async fn fetch_last_payout(&self, vendor_id: i64) -> Result<Option<Payout>, LedgerError> {
        let mut conn = self.pool.acquire().await?;
        let payout = payouts::fetch_last_payout(vendor_id, PayoutStatusType::Omw, &mut conn).await?;
        Ok(payout)
    }
}

impl PayoutManagement for SqliteDatabase {
    async fn insert_payout(&self, payout: NewPayout) -> Result<(Payout, Transaction), LedgerError> {
        let vendor_id = payout.vendor_id;
        if self.fetch_vendor(vendor_id).await?.is_none() {
            return Err(LedgerError::VendorNotFound(vendor_id));
        }
        // Vendors are never deleted
        let mut tx = self.pool.begin().await?;
        let result = payouts::insert_payout(payout, &mut tx).await?;
        tx.commit().await?;
        debug!("🗃️ Payout #{} and transaction #{} committed", result.0.id, result.1.id);
        Ok(result)
    }

    async fn update_payout_status(&self, payout_id: i64, status: PayoutStatusType) -> Result<Payout, LedgerError> {
        let mut tx = self.pool.begin().await?;
        let payout = payouts::update_payout_status(payout_id, status, &mut tx)
            .await?
            .ok_or(LedgerError::PayoutNotFound(payout_id))?;
        tx.commit().await?;
        debug!("🗃️ Payout #{payout_id} is now {status}");
        Ok(payout)
    }
}

impl BasketManagement for SqliteDatabase {
    async fn fetch_user(&self, user_id: i64) -> Result<Option<User>, BasketError> {
        let mut conn = self.pool.acquire().await?;
        let user = marketplace::fetch_user(user_id, &mut conn).await?;
        Ok(user)
    }

    async fn fetch_product(&self, product_id: i64) -> Result<Option<Product>, BasketError> {
        let mut conn = self.pool.acquire().await?;
        let product = marketplace::fetch_product(product_id, &mut conn).await?;
        Ok(product)
    }

    async fn fetch_active_basket(&self, owner_id: i64) -> Result<Option<Basket>, BasketError> {
        let mut conn = self.pool.acquire().await?;
        let basket = baskets::fetch_active_basket(owner_id, &mut conn).await?;
        Ok(basket)
    }

    async fn fetch_lines(&self, basket_id: i64) -> Result<Vec<Line>, BasketError> {
        let mut conn = self.pool.acquire().await?;
        let lines = baskets::fetch_lines(basket_id, &mut conn).await?;
        Ok(lines)
    }

    async fn create_basket(&self, owner_id: i64, vendor_id: Option<i64>) -> Result<Basket, BasketError> {
        if self.fetch_user(owner_id).await?.is_none() {
            return Err(BasketError::UserNotFound(owner_id));
        }
        let mut tx = self.pool.begin().await?;
        let basket = baskets::insert_basket(owner_id, vendor_id, &mut tx).await?;
        tx.commit().await?;
        Ok(basket)
    }

    async fn assign_vendor(&self, basket_id: i64, vendor_id: i64) -> Result<Basket, BasketError> {
        let mut tx = self.pool.begin().await?;
        match baskets::set_vendor(basket_id, vendor_id, &mut tx).await? {
            Some(basket) => {
                tx.commit().await?;
                Ok(basket)
            },
            None => Err(closed_or_missing(basket_id, &mut tx).await),
        }
    }

    async fn switch_basket_vendor(&self, basket_id: i64, vendor_id: i64) -> Result<Basket, BasketError> {
        let mut tx = self.pool.begin().await?;
        let Some(old) = baskets::close_basket(basket_id, BasketStatusType::OtherVendor, &mut tx).await? else {
            return Err(closed_or_missing(basket_id, &mut tx).await);
        };
        let basket = baskets::insert_basket(old.owner_id, Some(vendor_id), &mut tx).await?;
        tx.commit().await?;
        debug!("🗃️ Basket #{basket_id} closed. Basket #{} opened for vendor #{vendor_id}", basket.id);
        Ok(basket)
    }

    async fn add_line(&self, basket_id: i64, product_id: i64, quantity: i64) -> Result<Line, BasketError> {
        let mut tx = self.pool.begin().await?;
        match baskets::insert_line(basket_id, product_id, quantity, &mut tx).await? {
            Some(line) => {
                tx.commit().await?;
                Ok(line)
            },
            None => Err(closed_or_missing(basket_id, &mut tx).await),
        }
    }

    async fn delete_line(&self, line_id: i64) -> Result<(), BasketError> {
        let mut tx = self.pool.begin().await?;
        let n = baskets::delete_line(line_id, &mut tx).await?;
        tx.commit().await?;
        if n == 0 {
            warn!("🗃️ Tried to delete line #{line_id}, but it does not exist");
        }
        Ok(())
    }
}

async fn closed_or_missing(basket_id: i64, conn: &mut sqlx::SqliteConnection) -> BasketError {
    match baskets::fetch_basket(basket_id, conn).await {
        Ok(Some(_)) => BasketError::BasketClosed(basket_id),
        Ok(None) => BasketError::BasketNotFound(basket_id),
        Err(e) => BasketError::from(e),
    }
}
