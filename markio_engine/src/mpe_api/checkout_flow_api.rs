use std::fmt::Debug;

use log::*;
use markio_common::DEFAULT_CURRENCY;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{
    helpers::amount_to_cents,
    mpe_api::{basket_api::BasketApi, errors::CheckoutError},
    traits::{BasketManagement, CheckoutProcessor, CheckoutRequest, LedgerManagement},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddToBasket {
    pub vendor_id: i64,
    pub product_id: i64,
    pub quantity: i64,
    /// The unit price the customer agreed to, in major units.
    pub amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutStarted {
    pub stripe_account_id: String,
    pub checkout_session_id: String,
    pub checkout_url: Option<String>,
    pub basket_id: i64,
}

/// Adds products to baskets and starts hosted checkout sessions for them.
pub struct CheckoutFlowApi<B, G> {
    baskets: BasketApi<B>,
    gateway: G,
    fee_percentage: u32,
}

impl<B: Debug, G> Debug for CheckoutFlowApi<B, G> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CheckoutFlowApi ({:?})", self.baskets)
    }
}

impl<B, G> CheckoutFlowApi<B, G> {
    pub fn new(db: B, gateway: G, fee_percentage: u32) -> Self {
        Self { baskets: BasketApi::new(db), gateway, fee_percentage }
    }
}

impl<B, G> CheckoutFlowApi<B, G>
where
    B: BasketManagement + LedgerManagement,
    G: CheckoutProcessor,
{
    /// Puts the product in the user's basket (reconciling the basket's vendor first) and opens a checkout session that
    /// pays the vendor directly, less the marketplace commission.
    pub async fn add_product_to_basket(&self, user_id: i64, req: AddToBasket) -> Result<CheckoutStarted, CheckoutError> {
        let db = self.baskets.db();
        if req.quantity < 1 {
            return Err(CheckoutError::InvalidQuantity(req.quantity));
        }
        let unit_amount = amount_to_cents(req.amount).map_err(CheckoutError::InvalidAmount)?;
        let application_fee = unit_amount
            .percentage(self.fee_percentage)
            .ok_or_else(|| CheckoutError::InvalidAmount(format!("The commission on {} is out of range", req.amount)))?;
        let vendor = db.fetch_vendor(req.vendor_id).await?.ok_or(CheckoutError::VendorNotFound(req.vendor_id))?;
        let product = db.fetch_product(req.product_id).await?.ok_or(CheckoutError::ProductNotFound(req.product_id))?;
        if product.vendor_id != vendor.id {
            return Err(CheckoutError::ProductVendorMismatch { product_id: product.id, vendor_id: vendor.id });
        }
        let account = vendor.stripe_id.clone().ok_or(CheckoutError::VendorNotOnboarded(vendor.id))?;
        let user = db.fetch_user(user_id).await?.ok_or(CheckoutError::UserNotFound(user_id))?;

        let basket = self.baskets.reconcile(user_id, &product).await?;
        if db.fetch_lines(basket.id).await?.is_empty() {
            db.add_line(basket.id, product.id, req.quantity).await?;
            trace!("🔄️🛒️ Added {} x product #{} to basket #{}", req.quantity, product.id, basket.id);
        }

        let request = CheckoutRequest {
            account: account.clone(),
            customer_email: Some(user.email),
            product_title: product.title.clone(),
            currency: DEFAULT_CURRENCY.to_string(),
            unit_amount,
            quantity: req.quantity,
            application_fee,
            metadata: product.metadata(),
        };
        let session = self.gateway.create_checkout_session(request).await?;
        info!("🔄️🛒️ Checkout session {} started for basket #{} (vendor #{})", session.id, basket.id, vendor.id);
        Ok(CheckoutStarted {
            stripe_account_id: account,
            checkout_session_id: session.id,
            checkout_url: session.url,
            basket_id: basket.id,
        })
    }
}
