//! Inventory catalog queries: categories, vendors and items

use anyhow::Result;
use sqlx::PgPool;
use uuid::Uuid;

// =============================================================================
// CATEGORY OPERATIONS
// =============================================================================

/// Find a category by its unique name
pub async fn find_category_by_name(pool: &PgPool, name: &str) -> Result<Option<Uuid>> {
    let result = sqlx::query_scalar("SELECT id FROM categories WHERE name = $1")
        .bind(name)
        .fetch_optional(pool)
        .await?;
    Ok(result)
}

/// Create a category with minimal fields
pub async fn create_category(pool: &PgPool, name: &str) -> Result<Uuid> {
    let id = Uuid::new_v4();

    sqlx::query("INSERT INTO categories (id, name) VALUES ($1, $2)")
        .bind(id)
        .bind(name)
        .execute(pool)
        .await?;

    Ok(id)
}

/// Idempotent category upsert by name.
///
/// Returns `true` if a new category was inserted, `false` when the name
/// already existed (a successful no-op).
pub async fn upsert_category(pool: &PgPool, name: &str) -> Result<bool> {
    let inserted: Option<Uuid> = sqlx::query_scalar(
        r#"
        INSERT INTO categories (id, name) VALUES ($1, $2)
        ON CONFLICT (name) DO NOTHING
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(name)
    .fetch_optional(pool)
    .await?;

    Ok(inserted.is_some())
}

// =============================================================================
// VENDOR OPERATIONS
// =============================================================================

/// Find the first vendor matching a name
pub async fn find_vendor_by_name(pool: &PgPool, name: &str) -> Result<Option<Uuid>> {
    let result = sqlx::query_scalar(
        "SELECT id FROM vendors WHERE name = $1 ORDER BY created_at LIMIT 1",
    )
    .bind(name)
    .fetch_optional(pool)
    .await?;
    Ok(result)
}

// =============================================================================
// ITEM OPERATIONS
// =============================================================================

/// Find an item by its unique SKU
pub async fn find_item_by_sku(pool: &PgPool, sku: &str) -> Result<Option<Uuid>> {
    let result = sqlx::query_scalar("SELECT id FROM items WHERE sku = $1")
        .bind(sku)
        .fetch_optional(pool)
        .await?;
    Ok(result)
}

/// Find an item by name (recipe rows reference items by name, not SKU)
pub async fn find_item_by_name(pool: &PgPool, name: &str) -> Result<Option<Uuid>> {
    let result = sqlx::query_scalar(
        "SELECT id FROM items WHERE name = $1 ORDER BY created_at LIMIT 1",
    )
    .bind(name)
    .fetch_optional(pool)
    .await?;
    Ok(result)
}

/// Create a new item from an import row
#[allow(clippy::too_many_arguments)]
pub async fn create_item_import(
    pool: &PgPool,
    name: &str,
    sku: &str,
    unit: &str,
    category_id: Uuid,
    preferred_vendor_id: Option<Uuid>,
    moq: i32,
    reorder_point: i32,
    storage_type: &str,
    perishable: bool,
) -> Result<Uuid> {
    let id = Uuid::new_v4();

    sqlx::query(
        r#"
        INSERT INTO items (id, name, sku, unit, category_id, preferred_vendor_id,
            moq, reorder_point, storage_type, perishable, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, NOW(), NOW())
        "#,
    )
    .bind(id)
    .bind(name)
    .bind(sku)
    .bind(unit)
    .bind(category_id)
    .bind(preferred_vendor_id)
    .bind(moq)
    .bind(reorder_point)
    .bind(storage_type)
    .bind(perishable)
    .execute(pool)
    .await?;

    Ok(id)
}

/// Update an existing item from an import row (keyed by SKU upstream)
#[allow(clippy::too_many_arguments)]
pub async fn update_item_import(
    pool: &PgPool,
    item_id: Uuid,
    name: &str,
    unit: &str,
    category_id: Uuid,
    preferred_vendor_id: Option<Uuid>,
    moq: i32,
    reorder_point: i32,
    storage_type: &str,
    perishable: bool,
) -> Result<()> {
    sqlx::query(
        r#"
        UPDATE items
        SET name = $2,
            unit = $3,
            category_id = $4,
            preferred_vendor_id = $5,
            moq = $6,
            reorder_point = $7,
            storage_type = $8,
            perishable = $9,
            updated_at = NOW()
        WHERE id = $1
        "#,
    )
    .bind(item_id)
    .bind(name)
    .bind(unit)
    .bind(category_id)
    .bind(preferred_vendor_id)
    .bind(moq)
    .bind(reorder_point)
    .bind(storage_type)
    .bind(perishable)
    .execute(pool)
    .await?;

    Ok(())
}
