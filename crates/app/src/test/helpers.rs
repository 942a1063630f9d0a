//! Test Helpers
//!
//! Seed rows through the superuser pool, outside row-level security.

use sqlx::query;
use uuid::Uuid;

use crate::{
    domain::{orders::records::OrderUuid, users::UserUuid},
    test::TestContext,
};

/// A pending order for `user` with no lines.
pub(crate) async fn create_order(
    ctx: &TestContext,
    user: UserUuid,
    total: u64,
) -> Result<OrderUuid, sqlx::Error> {
    let order = OrderUuid::new();
    let total = i64::try_from(total).unwrap_or(i64::MAX);

    query("INSERT INTO orders (id, user_id, subtotal, total) VALUES ($1, $2, $3, $3)")
        .bind(order.into_uuid())
        .bind(user.into_uuid())
        .bind(total)
        .execute(ctx.db.pool())
        .await?;

    Ok(order)
}

/// Move an existing order to `status`.
pub(crate) async fn set_order_status(
    ctx: &TestContext,
    order: OrderUuid,
    status: &str,
) -> Result<(), sqlx::Error> {
    query("UPDATE orders SET status = $2, updated_at = now() WHERE id = $1")
        .bind(order.into_uuid())
        .bind(status)
        .execute(ctx.db.pool())
        .await?;

    Ok(())
}

pub(crate) async fn seed_points(
    ctx: &TestContext,
    user: UserUuid,
    total_points: i64,
    lifetime_earned: i64,
) -> Result<(), sqlx::Error> {
    query(
        "INSERT INTO loyalty_points (user_id, total_points, lifetime_earned) VALUES ($1, $2, $3)",
    )
    .bind(user.into_uuid())
    .bind(total_points)
    .bind(lifetime_earned)
    .execute(ctx.db.pool())
    .await?;

    Ok(())
}

/// Points still inside a three day return window.
pub(crate) async fn seed_pending_points(
    ctx: &TestContext,
    user: UserUuid,
    points: i64,
) -> Result<(), sqlx::Error> {
    query(
        "INSERT INTO pending_points (user_id, points, unlocks_at) \
         VALUES ($1, $2, now() + interval '3 days')",
    )
    .bind(user.into_uuid())
    .bind(points)
    .execute(ctx.db.pool())
    .await?;

    Ok(())
}

/// `count` in-stock products, the first one the most ordered.
pub(crate) async fn seed_products(ctx: &TestContext, count: i64) -> Result<Vec<Uuid>, sqlx::Error> {
    let mut products = Vec::new();

    for n in 0..count {
        let product = Uuid::now_v7();

        query(
            "INSERT INTO products (id, name, price, stock_quantity, order_count) \
             VALUES ($1, $2, $3, 10, $4)",
        )
        .bind(product)
        .bind(format!("Product {n}"))
        .bind(1_000_i64 + n)
        .bind(count - n)
        .execute(ctx.db.pool())
        .await?;

        products.push(product);
    }

    Ok(products)
}
