use thiserror::Error;

use crate::{
    db_types::{Cents, Payout},
    traits::{BasketError, GatewayError, LedgerError},
};

#[derive(Debug, Clone, Error)]
pub enum WithdrawalError {
    #[error("Invalid amount. {0}")]
    InvalidAmount(String),
    #[error("User {0} is not a vendor")]
    VendorNotFound(i64),
    #[error("Account has insufficient funds")]
    Unapproved,
    #[error("Something went wrong. {0}")]
    VerificationError(String),
    #[error("No bank account is connected to the payment processor account")]
    NoBankAccount,
    #[error(
        "Payout {} does not match the request. Requested {requested}, but got {returned}. Cancelled: {cancelled}",
        payout.stripe_id
    )]
    Mismatch { payout: Box<Payout>, requested: Cents, returned: Cents, cancelled: bool },
    #[error("Payment processor error. {0}")]
    Gateway(#[from] GatewayError),
    #[error("Database error. {0}")]
    Database(#[from] LedgerError),
}

impl WithdrawalError {
    /// The outcome reported to the user, one of `invalid_amount`, `vendor_not_found`, `unapproved`, `error`,
    /// `no_bank_account` or `mismatch`.
    pub fn status(&self) -> &'static str {
        match self {
            Self::InvalidAmount(_) => "invalid_amount",
            Self::VendorNotFound(_) => "vendor_not_found",
            Self::Unapproved => "unapproved",
            Self::NoBankAccount => "no_bank_account",
            Self::Mismatch { .. } => "mismatch",
            Self::VerificationError(_) | Self::Gateway(_) | Self::Database(_) => "error",
        }
    }
}

#[derive(Debug, Clone, Error)]
pub enum CheckoutError {
    #[error("Vendor {0} does not exist")]
    VendorNotFound(i64),
    #[error("Product {0} does not exist")]
    ProductNotFound(i64),
    #[error("Product {product_id} is not sold by vendor {vendor_id}")]
    ProductVendorMismatch { product_id: i64, vendor_id: i64 },
    #[error("Vendor {0} cannot accept payments yet")]
    VendorNotOnboarded(i64),
    #[error("Quantity must be at least 1, but was {0}")]
    InvalidQuantity(i64),
    #[error("Invalid amount. {0}")]
    InvalidAmount(String),
    #[error("User {0} does not exist")]
    UserNotFound(i64),
    #[error("Basket error. {0}")]
    Basket(#[from] BasketError),
    #[error("Database error. {0}")]
    Database(#[from] LedgerError),
    #[error("Payment processor error. {0}")]
    Gateway(#[from] GatewayError),
}

impl CheckoutError {
    /// True if the request itself was at fault, as opposed to a backend failure.
    pub fn is_validation_error(&self) -> bool {
        !matches!(self, Self::Basket(_) | Self::Database(_) | Self::Gateway(_))
    }
}
