use log::debug;
use sqlx::SqliteConnection;

use crate::db_types::{Basket, BasketStatusType, Line};

pub async fn fetch_active_basket(owner_id: i64, conn: &mut SqliteConnection) -> Result<Option<Basket>, sqlx::Error> {
    let basket = sqlx::query_as("SELECT * FROM baskets WHERE owner_id = $1 AND status = 'active'")
        .bind(owner_id)
        .fetch_optional(conn)
        .await?;
    Ok(basket)
}

pub async fn fetch_basket(basket_id: i64, conn: &mut SqliteConnection) -> Result<Option<Basket>, sqlx::Error> {
    let basket = sqlx::query_as("SELECT * FROM baskets WHERE id = $1").bind(basket_id).fetch_optional(conn).await?;
    Ok(basket)
}

/// Opens a new active basket. Fails with a unique constraint violation if the owner already has one.
pub async fn insert_basket(
    owner_id: i64,
    vendor_id: Option<i64>,
    conn: &mut SqliteConnection,
) -> Result<Basket, sqlx::Error> {
    let basket: Basket = sqlx::query_as("INSERT INTO baskets (owner_id, vendor_id) VALUES ($1, $2) RETURNING *")
        .bind(owner_id)
        .bind(vendor_id)
        .fetch_one(conn)
        .await?;
    debug!("🗃️ Basket #{} opened for user #{owner_id}", basket.id);
    Ok(basket)
}

pub async fn set_vendor(basket_id: i64, vendor_id: i64, conn: &mut SqliteConnection) -> Result<Option<Basket>, sqlx::Error> {
    let basket = sqlx::query_as("UPDATE baskets SET vendor_id = $1 WHERE id = $2 AND status = 'active' RETURNING *")
        .bind(vendor_id)
        .bind(basket_id)
        .fetch_optional(conn)
        .await?;
    Ok(basket)
}

/// Moves an active basket to a closed `status`. Returns `None` if the basket is missing or already closed.
pub async fn close_basket(
    basket_id: i64,
    status: BasketStatusType,
    conn: &mut SqliteConnection,
) -> Result<Option<Basket>, sqlx::Error> {
    let basket = sqlx::query_as("UPDATE baskets SET status = $1 WHERE id = $2 AND status = 'active' RETURNING *")
        .bind(status)
        .bind(basket_id)
        .fetch_optional(conn)
        .await?;
    Ok(basket)
}

pub async fn fetch_lines(basket_id: i64, conn: &mut SqliteConnection) -> Result<Vec<Line>, sqlx::Error> {
    let lines =
        sqlx::query_as("SELECT * FROM lines WHERE basket_id = $1 ORDER BY id").bind(basket_id).fetch_all(conn).await?;
    Ok(lines)
}

/// Adds a line to the basket, as long as the basket is still active. Returns `None` otherwise.
pub async fn insert_line(
    basket_id: i64,
    product_id: i64,
    quantity: i64,
    conn: &mut SqliteConnection,
) -> Result<Option<Line>, sqlx::Error> {
    let line = sqlx::query_as(
        r#"
        INSERT INTO lines (basket_id, product_id, quantity)
        SELECT $1, $2, $3 WHERE EXISTS (SELECT 1 FROM baskets WHERE id = $1 AND status = 'active')
        RETURNING *
        "#,
    )
    .bind(basket_id)
    .bind(product_id)
    .bind(quantity)
    .fetch_optional(conn)
    .await?;
    Ok(line)
}

pub async fn delete_line(line_id: i64, conn: &mut SqliteConnection) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM lines WHERE id = $1").bind(line_id).execute(conn).await?;
    Ok(result.rows_affected())
}
