//! Markio Engine
//!
//! The Markio engine holds the payment logic of the Markio marketplace: vendor withdrawals, the single-vendor basket
//! policy and checkout, and ledger reporting. It is independent of any web framework or payment processor SDK.
//!
//! The library is divided into three main sections:
//! 1. Backend contracts ([`mod@traits`]). Database backends and payment processor gateways implement these traits.
//!    An SQLite backend ([`SqliteDatabase`]) is provided. The data types used by the backends live in
//!    [`mod@db_types`].
//! 2. The public API ([`mod@mpe_api`]): [`WithdrawalApi`], [`BasketApi`], [`CheckoutFlowApi`] and [`BalanceApi`].
//! 3. Events ([`mod@events`]). APIs publish events (e.g. when a payout is created, or did not match the request) that
//!    you can hook into.
pub mod db_types;
pub mod events;
pub mod helpers;
pub mod mpe_api;
pub mod traits;

#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(any(feature = "test_utils", test))]
pub mod test_utils;

pub use mpe_api::{
    balance_api::{BalanceApi, BalanceSummary},
    basket_api::BasketApi,
    checkout_flow_api::{AddToBasket, CheckoutFlowApi, CheckoutStarted},
    errors::{CheckoutError, WithdrawalError},
    withdrawal_api::{Verification, WithdrawalApi, DEFAULT_FEE_PERCENTAGE},
};
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteDatabase;
