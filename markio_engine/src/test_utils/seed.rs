//! Shortcuts for populating a test database with users, vendors, products and paid orders.
use crate::{
    db_types::{Cents, OrderStatusType, PaymentStatusType, Product, User, Vendor},
    sqlite::db::marketplace,
    SqliteDatabase,
};

pub async fn user(db: &SqliteDatabase, email: &str) -> User {
    let mut tx = db.pool().begin().await.expect("No transaction");
    let user = marketplace::insert_user(email, &mut tx).await.expect("Error creating user");
    tx.commit().await.expect("Error committing user");
    user
}

/// Creates a user and a vendor profile for them.
pub async fn vendor(db: &SqliteDatabase, name: &str, stripe_id: Option<&str>) -> Vendor {
    let email = format!("{}@example.com", name.to_lowercase().replace(' ', "."));
    let owner = user(db, &email).await;
    let mut tx = db.pool().begin().await.expect("No transaction");
    let vendor = marketplace::insert_vendor(owner.id, name, stripe_id, &mut tx).await.expect("Error creating vendor");
    tx.commit().await.expect("Error committing vendor");
    vendor
}

pub async fn product(db: &SqliteDatabase, vendor: &Vendor, title: &str, price: i64) -> Product {
    let mut tx = db.pool().begin().await.expect("No transaction");
    let product =
        marketplace::insert_product(vendor.id, title, Cents::from(price), &mut tx).await.expect("Error creating product");
    tx.commit().await.expect("Error committing product");
    product
}

/// Records an order for `product` by `buyer`, with a payment of `amount` cents credited to the product's vendor.
pub async fn paid_order(
    db: &SqliteDatabase,
    buyer: &User,
    product: &Product,
    amount: i64,
    order_status: OrderStatusType,
    payment_status: PaymentStatusType,
) {
    let mut tx = db.pool().begin().await.expect("No transaction");
    let order =
        marketplace::insert_order(buyer.id, product.id, order_status, &mut tx).await.expect("Error creating order");
    marketplace::insert_payment(product.vendor_id, order.id, Cents::from(amount), payment_status, &mut tx)
        .await
        .expect("Error creating payment");
    tx.commit().await.expect("Error committing order");
}

/// A completed order with a successful payment, i.e. money that counts towards the vendor's ledger.
pub async fn completed_sale(db: &SqliteDatabase, buyer: &User, product: &Product, amount: i64) {
    paid_order(db, buyer, product, amount, OrderStatusType::Completed, PaymentStatusType::Success).await;
}
