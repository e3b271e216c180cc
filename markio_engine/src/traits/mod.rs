//! # Backend and gateway contracts
//!
//! The engine never talks to the database or to the payment processor directly. Instead, it is written against the
//! traits in this module, and the concrete backends (see [`crate::SqliteDatabase`]) and gateways implement them.
//!
//! * [`LedgerManagement`] answers questions about what a vendor has earned and been paid, according to our own records.
//! * [`PayoutManagement`] records payouts against the ledger.
//! * [`BasketManagement`] stores baskets and their lines.
//! * [`PaymentProcessor`] is the external balance gateway: balances, bank accounts and payouts held by the processor.
//! * [`CheckoutProcessor`] creates hosted checkout sessions on the processor.
mod basket_management;
mod data_objects;
mod ledger_management;
mod payment_processor;
mod payout_management;

pub use basket_management::{BasketError, BasketManagement, CheckoutDatabase};
pub use data_objects::{
    CheckoutRequest,
    CheckoutSessionRef,
    ExternalBalance,
    GatewayBankAccount,
    GatewayPayout,
    GatewayPayoutStatus,
};
pub use ledger_management::{LedgerError, LedgerManagement};
pub use payment_processor::{CheckoutProcessor, GatewayError, PaymentProcessor};
pub use payout_management::PayoutManagement;
