//! Meal planning queries: dishes and per-dish recipes

use anyhow::Result;
use sqlx::PgPool;
use uuid::Uuid;

/// Find the first dish matching a name
pub async fn find_dish_by_name(pool: &PgPool, name: &str) -> Result<Option<Uuid>> {
    let result = sqlx::query_scalar(
        "SELECT id FROM dishes WHERE name = $1 ORDER BY created_at LIMIT 1",
    )
    .bind(name)
    .fetch_optional(pool)
    .await?;
    Ok(result)
}

/// Create a dish with minimal fields
pub async fn create_dish(pool: &PgPool, name: &str) -> Result<Uuid> {
    let id = Uuid::new_v4();

    sqlx::query("INSERT INTO dishes (id, name) VALUES ($1, $2)")
        .bind(id)
        .bind(name)
        .execute(pool)
        .await?;

    Ok(id)
}

/// Upsert a recipe line keyed by the (dish, item) pair.
///
/// Returns `true` if a new recipe row was inserted, `false` if an existing
/// one had its quantity updated.
pub async fn upsert_recipe(
    pool: &PgPool,
    dish_id: Uuid,
    item_id: Uuid,
    qty_per_student: f64,
) -> Result<bool> {
    let inserted: bool = sqlx::query_scalar(
        r#"
        INSERT INTO recipes (id, dish_id, item_id, qty_per_student, created_at, updated_at)
        VALUES ($1, $2, $3, $4, NOW(), NOW())
        ON CONFLICT (dish_id, item_id)
        DO UPDATE SET qty_per_student = EXCLUDED.qty_per_student, updated_at = NOW()
        RETURNING (xmax = 0)
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(dish_id)
    .bind(item_id)
    .bind(qty_per_student)
    .fetch_one(pool)
    .await?;

    Ok(inserted)
}
