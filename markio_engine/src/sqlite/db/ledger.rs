use sqlx::SqliteConnection;

use crate::db_types::Cents;

/// Sums successful payments on completed orders for the vendor. `SUM` over no rows is `NULL`, hence the `Option`.
pub async fn completed_earnings(vendor_id: i64, conn: &mut SqliteConnection) -> Result<Option<Cents>, sqlx::Error> {
    let total: Option<i64> = sqlx::query_scalar(
        r#"
        SELECT SUM(payments.amount)
        FROM transactions
            JOIN payments ON transactions.payment_id = payments.id
            JOIN orders ON payments.order_id = orders.id
        WHERE transactions.vendor_id = $1
            AND transactions.tx_type = 'payment'
            AND payments.status = 'success'
            AND orders.status = 'completed'
        "#,
    )
    .bind(vendor_id)
    .fetch_one(conn)
    .await?;
    Ok(total.map(Cents::from))
}

pub async fn pending_earnings(vendor_id: i64, conn: &mut SqliteConnection) -> Result<Cents, sqlx::Error> {
    let total: i64 = sqlx::query_scalar(
        r#"
        SELECT COALESCE(SUM(payments.amount), 0)
        FROM transactions
            JOIN payments ON transactions.payment_id = payments.id
            JOIN orders ON payments.order_id = orders.id
        WHERE transactions.vendor_id = $1
            AND transactions.tx_type = 'payment'
            AND payments.status = 'pending'
            AND orders.status = 'pending'
        "#,
    )
    .bind(vendor_id)
    .fetch_one(conn)
    .await?;
    Ok(Cents::from(total))
}
