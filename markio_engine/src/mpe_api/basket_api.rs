//! Keeps a user's active basket consistent with a single vendor.
use std::fmt::Debug;

use log::*;

use crate::{
    db_types::{Basket, Product},
    traits::{BasketError, BasketManagement},
};

pub struct BasketApi<B> {
    db: B,
}

impl<B: Debug> Debug for BasketApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "BasketApi ({:?})", self.db)
    }
}

impl<B> BasketApi<B> {
    pub fn new(db: B) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &B {
        &self.db
    }
}

impl<B> BasketApi<B>
where B: BasketManagement
{
    pub async fn active_basket(&self, user_id: i64) -> Result<Option<Basket>, BasketError> {
        self.db.fetch_active_basket(user_id).await
    }

    /// Prepares the user's active basket for `product`, and returns it.
    ///
    /// * No active basket: a new one is created for the product's vendor.
    /// * Same vendor, and the first line holds a different product: that line is removed. Baskets hold a single line.
    /// * Different vendor, and the basket has lines: the basket is closed (`other_vendor`) and a new one is opened for
    ///   the product's vendor. The closed basket keeps its lines.
    /// * Empty basket without a vendor, or with another vendor: the product's vendor is assigned in place.
    /// * Otherwise the basket is returned unchanged.
    ///
    /// This never adds lines.
    pub async fn reconcile(&self, user_id: i64, product: &Product) -> Result<Basket, BasketError> {
        let vendor_id = product.vendor_id;
        let Some(basket) = self.db.fetch_active_basket(user_id).await? else {
            let basket = self.db.create_basket(user_id, Some(vendor_id)).await?;
            debug!("🧺️ Created basket #{} for user #{user_id} and vendor #{vendor_id}", basket.id);
            return Ok(basket);
        };
        let lines = self.db.fetch_lines(basket.id).await?;
        let first = lines.first();
        match (basket.vendor_id, first) {
            (Some(v), Some(line)) if v == vendor_id => {
                if line.product_id != product.id {
                    self.db.delete_line(line.id).await?;
                    debug!("🧺️ Replaced product #{} in basket #{}", line.product_id, basket.id);
                }
                Ok(basket)
            },
            (Some(v), None) if v == vendor_id => Ok(basket),
            (_, Some(_)) => {
                let new_basket = self.db.switch_basket_vendor(basket.id, vendor_id).await?;
                info!(
                    "🧺️ User #{user_id} switched to vendor #{vendor_id}. Basket #{} closed, basket #{} opened",
                    basket.id, new_basket.id
                );
                Ok(new_basket)
            },
            (_, None) => {
                let basket = self.db.assign_vendor(basket.id, vendor_id).await?;
                debug!("🧺️ Basket #{} assigned to vendor #{vendor_id}", basket.id);
                Ok(basket)
            },
        }
    }
}
