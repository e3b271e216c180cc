//! # Markio engine public API
//!
//! The APIs in this module are what the server (or any other client) calls. Each one is created by supplying the
//! backends that implement the traits it needs:
//!
//! * [`withdrawal_api`] verifies withdrawal requests against the ledger and the payment processor, and orchestrates
//!   payouts.
//! * [`basket_api`] keeps each user's active basket consistent with a single vendor.
//! * [`checkout_flow_api`] adds a product to a basket and opens a checkout session for it.
//! * [`balance_api`] summarises a vendor's ledger.
//!
//! ```rust,ignore
//! use markio_engine::{SqliteDatabase, WithdrawalApi};
//! let db = SqliteDatabase::new_with_url(...).await?;
//! let api = WithdrawalApi::new(db, stripe_gateway, 10, producers);
//! let payout = api.withdraw(user_id, dec!(20.00)).await?;
//! ```
pub mod balance_api;
pub mod basket_api;
pub mod checkout_flow_api;
pub mod errors;
pub mod withdrawal_api;
