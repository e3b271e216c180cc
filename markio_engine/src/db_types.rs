use std::{fmt::Display, str::FromStr};

use chrono::{DateTime, Utc};
use log::error;
pub use markio_common::Cents;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::{types::Json, FromRow, Type};
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[error("Conversion error: {0}")]
pub struct ConversionError(String);

/// Implements `Display`, `FromStr` and an infallible `From<String>` for a status enum stored as lowercase text.
macro_rules! status_enum {
    ($name:ident, default = $default:ident, { $($variant:ident => $text:literal),+ $(,)? }) => {
        impl Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $(Self::$variant => write!(f, $text),)+
                }
            }
        }

        impl FromStr for $name {
            type Err = ConversionError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok(Self::$variant),)+
                    s => Err(ConversionError(format!("Invalid {}: {s}", stringify!($name)))),
                }
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                value.parse().unwrap_or_else(|_| {
                    error!("Invalid {}: {value}. Defaulting to {}", stringify!($name), Self::$default);
                    Self::$default
                })
            }
        }
    };
}

//--------------------------------------         Role          ---------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Sells products and may withdraw earnings.
    Vendor,
    /// Buys products.
    Customer,
}

impl Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Vendor => write!(f, "vendor"),
            Role::Customer => write!(f, "customer"),
        }
    }
}

impl FromStr for Role {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "vendor" => Ok(Self::Vendor),
            "customer" => Ok(Self::Customer),
            s => Err(ConversionError(format!("Invalid role: {s}"))),
        }
    }
}

//--------------------------------------         User          ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

//--------------------------------------        Vendor         ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Vendor {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    /// The connected account id on the payment processor. Empty until the vendor has completed onboarding.
    pub stripe_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

//--------------------------------------        Product        ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub vendor_id: i64,
    pub title: String,
    pub price: Cents,
}

impl Product {
    /// Metadata attached to checkout sessions so that the payment can be traced back to the product.
    pub fn metadata(&self) -> Vec<(String, String)> {
        vec![
            ("product_id".to_string(), self.id.to_string()),
            ("title".to_string(), self.title.clone()),
            ("vendor_id".to_string(), self.vendor_id.to_string()),
        ]
    }
}

//--------------------------------------   OrderStatusType     ---------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize)]
#[sqlx(rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum OrderStatusType {
    /// The order has been placed, but not paid for.
    Pending,
    /// Payment has cleared and the order has been fulfilled.
    Completed,
    Cancelled,
}

status_enum!(OrderStatusType, default = Pending, { Pending => "pending", Completed => "completed", Cancelled => "cancelled" });

#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Order {
    pub id: i64,
    pub user_id: i64,
    pub product_id: i64,
    pub status: OrderStatusType,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

//--------------------------------------  PaymentStatusType    ---------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize)]
#[sqlx(rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatusType {
    Pending,
    Success,
    Failed,
}

status_enum!(PaymentStatusType, default = Pending, { Pending => "pending", Success => "success", Failed => "failed" });

#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Payment {
    pub id: i64,
    pub order_id: i64,
    pub amount: Cents,
    pub status: PaymentStatusType,
    pub created_at: DateTime<Utc>,
}

//--------------------------------------     Transaction       ---------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize)]
#[sqlx(rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    Payment,
    Payout,
}

status_enum!(TransactionType, default = Payment, { Payment => "payment", Payout => "payout" });

/// Links a vendor to exactly one payment or one payout.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub vendor_id: i64,
    pub payment_id: Option<i64>,
    pub payout_id: Option<i64>,
    pub tx_type: TransactionType,
    pub created_at: DateTime<Utc>,
}

//--------------------------------------   PayoutStatusType    ---------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize)]
#[sqlx(rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PayoutStatusType {
    /// On its way to the vendor's bank account.
    Omw,
    Failed,
    /// Cancelled on the processor after the returned payout did not match the request.
    Cancelled,
}

status_enum!(PayoutStatusType, default = Failed, { Omw => "omw", Failed => "failed", Cancelled => "cancelled" });

pub const STRIPE_PAYOUT_METHOD: &str = "stripe_payout";

#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Payout {
    pub id: i64,
    pub vendor_id: i64,
    pub amount: Cents,
    pub currency: String,
    pub fee: Cents,
    /// The payout id assigned by the payment processor.
    pub stripe_id: String,
    pub method: String,
    pub status: PayoutStatusType,
    /// The raw processor response.
    pub data: Json<Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewPayout {
    pub vendor_id: i64,
    pub amount: Cents,
    pub currency: String,
    pub fee: Cents,
    pub stripe_id: String,
    pub status: PayoutStatusType,
    pub data: Value,
}

//--------------------------------------       Basket          ---------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize)]
#[sqlx(rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum BasketStatusType {
    Active,
    /// Closed because the owner switched to a product from another vendor. Terminal.
    OtherVendor,
}

status_enum!(BasketStatusType, default = Active, { Active => "active", OtherVendor => "other_vendor" });

#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Basket {
    pub id: i64,
    pub owner_id: i64,
    pub vendor_id: Option<i64>,
    pub status: BasketStatusType,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Basket {
    pub fn is_active(&self) -> bool {
        self.status == BasketStatusType::Active
    }
}

#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Line {
    pub id: i64,
    pub basket_id: i64,
    pub product_id: i64,
    pub quantity: i64,
}
