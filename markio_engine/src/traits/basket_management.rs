use thiserror::Error;

use crate::{
    db_types::{Basket, Line, Product, User},
    traits::LedgerManagement,
};

#[derive(Debug, Clone, Error)]
pub enum BasketError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("User {0} does not exist")]
    UserNotFound(i64),
    #[error("Basket {0} does not exist")]
    BasketNotFound(i64),
    #[error("Basket {0} is closed and cannot be modified")]
    BasketClosed(i64),
}

impl From<sqlx::Error> for BasketError {
    fn from(e: sqlx::Error) -> Self {
        BasketError::DatabaseError(e.to_string())
    }
}

/// Storage for baskets and their lines.
///
/// Backends must guarantee that a user never has more than one active basket.
#[allow(async_fn_in_trait)]
pub trait BasketManagement {
    async fn fetch_user(&self, user_id: i64) -> Result<Option<User>, BasketError>;

    async fn fetch_product(&self, product_id: i64) -> Result<Option<Product>, BasketError>;

    async fn fetch_active_basket(&self, owner_id: i64) -> Result<Option<Basket>, BasketError>;

    /// Returns the lines of the basket in insertion order.
    async fn fetch_lines(&self, basket_id: i64) -> Result<Vec<Line>, BasketError>;

    async fn create_basket(&self, owner_id: i64, vendor_id: Option<i64>) -> Result<Basket, BasketError>;

    async fn assign_vendor(&self, basket_id: i64, vendor_id: i64) -> Result<Basket, BasketError>;

    /// Closes the basket with the `other_vendor` status and opens a fresh, empty basket for the same owner and the
    /// given vendor, atomically. The lines of the closed basket are left as they are.
    async fn switch_basket_vendor(&self, basket_id: i64, vendor_id: i64) -> Result<Basket, BasketError>;

    async fn add_line(&self, basket_id: i64, product_id: i64, quantity: i64) -> Result<Line, BasketError>;

    async fn delete_line(&self, line_id: i64) -> Result<(), BasketError>;
}

/// Everything the checkout flow needs from a backend: baskets, and the vendor records from the ledger.
pub trait CheckoutDatabase: BasketManagement + LedgerManagement {}

impl<T: BasketManagement + LedgerManagement> CheckoutDatabase for T {}
