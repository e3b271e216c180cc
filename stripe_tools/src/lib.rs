//! A minimal client for the parts of the Stripe REST API that the Markio marketplace uses: connected-account
//! balances, bank accounts, payouts and checkout sessions.
mod api;
mod config;
mod data_objects;
mod error;

pub mod helpers;

pub use api::StripeApi;
pub use config::StripeConfig;
pub use data_objects::{
    BalanceAmount,
    BankAccount,
    CheckoutLineItem,
    CheckoutSession,
    List,
    NewCheckoutSession,
    StripeBalance,
    StripePayout,
};
pub use error::StripeApiError;
