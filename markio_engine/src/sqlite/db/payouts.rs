use log::debug;
use sqlx::{types::Json, SqliteConnection};

use crate::db_types::{NewPayout, Payout, PayoutStatusType, Transaction, TransactionType, STRIPE_PAYOUT_METHOD};

/// Inserts the payout and its `payout` transaction. This is not atomic. Callers should run it inside a database
/// transaction.
pub async fn insert_payout(payout: NewPayout, conn: &mut SqliteConnection) -> Result<(Payout, Transaction), sqlx::Error> {
    let vendor_id = payout.vendor_id;
    let payout: Payout = sqlx::query_as(
        r#"
        INSERT INTO payouts (vendor_id, amount, currency, fee, stripe_id, method, status, data)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING *
        "#,
    )
    .bind(payout.vendor_id)
    .bind(payout.amount)
    .bind(payout.currency)
    .bind(payout.fee)
    .bind(payout.stripe_id)
    .bind(STRIPE_PAYOUT_METHOD)
    .bind(payout.status)
    .bind(Json(payout.data))
    .fetch_one(&mut *conn)
    .await?;
    let tx = sqlx::query_as(
        "INSERT INTO transactions (vendor_id, payout_id, tx_type) VALUES ($1, $2, $3) RETURNING *",
    )
    .bind(vendor_id)
    .bind(payout.id)
    .bind(TransactionType::Payout)
    .fetch_one(conn)
    .await?;
    debug!("🗃️ Payout #{} ({}) stored for vendor #{vendor_id}", payout.id, payout.stripe_id);
    Ok((payout, tx))
}

pub async fn update_payout_status(
    payout_id: i64,
    status: PayoutStatusType,
    conn: &mut SqliteConnection,
) -> Result<Option<Payout>, sqlx::Error> {
    let payout = sqlx::query_as("UPDATE payouts SET status = $1 WHERE id = $2 RETURNING *")
        .bind(status)
        .bind(payout_id)
        .fetch_optional(conn)
        .await?;
    Ok(payout)
}

pub async fn fetch_payouts_for_vendor(
    vendor_id: i64,
    limit: i64,
    conn: &mut SqliteConnection,
) -> Result<Vec<Payout>, sqlx::Error> {
    let payouts = sqlx::query_as("SELECT * FROM payouts WHERE vendor_id = $1 ORDER BY created_at DESC, id DESC LIMIT $2")
        .bind(vendor_id)
        .bind(limit)
        .fetch_all(conn)
        .await?;
    Ok(payouts)
}

pub async fn fetch_last_payout(
    vendor_id: i64,
    status: PayoutStatusType,
    conn: &mut SqliteConnection,
) -> Result<Option<Payout>, sqlx::Error> {
    let payout = sqlx::query_as(
        "SELECT * FROM payouts WHERE vendor_id = $1 AND status = $2 ORDER BY created_at DESC, id DESC LIMIT 1",
    )
    .bind(vendor_id)
    .bind(status)
    .fetch_optional(conn)
    .await?;
    Ok(payout)
}

pub async fn count_payouts(vendor_id: i64, conn: &mut SqliteConnection) -> Result<i64, sqlx::Error> {
    let count = sqlx::query_scalar("SELECT COUNT(*) FROM payouts WHERE vendor_id = $1")
        .bind(vendor_id)
        .fetch_one(conn)
        .await?;
    Ok(count)
}
