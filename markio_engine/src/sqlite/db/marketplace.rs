//! Users, vendors, products, orders and payments.
//!
//! The marketplace catalogue and order pipeline are owned by other services; these functions exist so that the
//! ledger can be populated (e.g. when importing completed orders, and in tests).
use log::debug;
use sqlx::SqliteConnection;

use crate::db_types::{
    Cents,
    Order,
    OrderStatusType,
    Payment,
    PaymentStatusType,
    Product,
    Transaction,
    TransactionType,
    User,
    Vendor,
};

pub async fn insert_user(email: &str, conn: &mut SqliteConnection) -> Result<User, sqlx::Error> {
    let user = sqlx::query_as("INSERT INTO users (email) VALUES ($1) RETURNING *").bind(email).fetch_one(conn).await?;
    Ok(user)
}

pub async fn fetch_user(user_id: i64, conn: &mut SqliteConnection) -> Result<Option<User>, sqlx::Error> {
    let user = sqlx::query_as("SELECT * FROM users WHERE id = $1").bind(user_id).fetch_optional(conn).await?;
    Ok(user)
}

pub async fn insert_vendor(
    user_id: i64,
    name: &str,
    stripe_id: Option<&str>,
    conn: &mut SqliteConnection,
) -> Result<Vendor, sqlx::Error> {
    let vendor: Vendor =
        sqlx::query_as("INSERT INTO vendors (user_id, name, stripe_id) VALUES ($1, $2, $3) RETURNING *")
            .bind(user_id)
            .bind(name)
            .bind(stripe_id)
            .fetch_one(conn)
            .await?;
    debug!("🗃️ Vendor #{} created for user #{user_id}", vendor.id);
    Ok(vendor)
}

pub async fn fetch_vendor(vendor_id: i64, conn: &mut SqliteConnection) -> Result<Option<Vendor>, sqlx::Error> {
    let vendor = sqlx::query_as("SELECT * FROM vendors WHERE id = $1").bind(vendor_id).fetch_optional(conn).await?;
    Ok(vendor)
}

pub async fn fetch_vendor_for_user(user_id: i64, conn: &mut SqliteConnection) -> Result<Option<Vendor>, sqlx::Error> {
    let vendor =
        sqlx::query_as("SELECT * FROM vendors WHERE user_id = $1").bind(user_id).fetch_optional(conn).await?;
    Ok(vendor)
}

pub async fn insert_product(
    vendor_id: i64,
    title: &str,
    price: Cents,
    conn: &mut SqliteConnection,
) -> Result<Product, sqlx::Error> {
    let product = sqlx::query_as("INSERT INTO products (vendor_id, title, price) VALUES ($1, $2, $3) RETURNING *")
        .bind(vendor_id)
        .bind(title)
        .bind(price)
        .fetch_one(conn)
        .await?;
    Ok(product)
}

pub async fn fetch_product(product_id: i64, conn: &mut SqliteConnection) -> Result<Option<Product>, sqlx::Error> {
    let product =
        sqlx::query_as("SELECT * FROM products WHERE id = $1").bind(product_id).fetch_optional(conn).await?;
    Ok(product)
}

pub async fn insert_order(
    user_id: i64,
    product_id: i64,
    status: OrderStatusType,
    conn: &mut SqliteConnection,
) -> Result<Order, sqlx::Error> {
    let order = sqlx::query_as("INSERT INTO orders (user_id, product_id, status) VALUES ($1, $2, $3) RETURNING *")
        .bind(user_id)
        .bind(product_id)
        .bind(status)
        .fetch_one(conn)
        .await?;
    Ok(order)
}

/// Stores a payment for the order, and links it to the vendor with a `payment` transaction. This is not atomic. Wrap
/// it in a database transaction and pass `&mut *tx` if you need atomicity.
pub async fn insert_payment(
    vendor_id: i64,
    order_id: i64,
    amount: Cents,
    status: PaymentStatusType,
    conn: &mut SqliteConnection,
) -> Result<(Payment, Transaction), sqlx::Error> {
    let payment: Payment =
        sqlx::query_as("INSERT INTO payments (order_id, amount, status) VALUES ($1, $2, $3) RETURNING *")
            .bind(order_id)
            .bind(amount)
            .bind(status)
            .fetch_one(&mut *conn)
            .await?;
    let tx = sqlx::query_as(
        "INSERT INTO transactions (vendor_id, payment_id, tx_type) VALUES ($1, $2, $3) RETURNING *",
    )
    .bind(vendor_id)
    .bind(payment.id)
    .bind(TransactionType::Payment)
    .fetch_one(conn)
    .await?;
    debug!("🗃️ Payment #{} of {amount} recorded for vendor #{vendor_id}", payment.id);
    Ok((payment, tx))
}
