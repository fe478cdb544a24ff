//! Upload registry queries
//!
//! Records are created once in PROCESSING and finalized exactly once with a
//! terminal status; nothing deletes them.

use anyhow::Result;
use sqlx::PgPool;
use uuid::Uuid;

use crate::types::{ImportKind, RowError, UploadRecord, UploadStatus};

/// Create an upload record in the PROCESSING state
pub async fn create_upload(
    pool: &PgPool,
    kind: ImportKind,
    filename: &str,
    submitted_by_name: &str,
) -> Result<Uuid> {
    let id = Uuid::new_v4();

    sqlx::query(
        r#"
        INSERT INTO csv_uploads (id, kind, filename, submitted_by_name, status, created_at)
        VALUES ($1, $2, $3, $4, $5, NOW())
        "#,
    )
    .bind(id)
    .bind(kind.as_str())
    .bind(filename)
    .bind(submitted_by_name)
    .bind(UploadStatus::Processing.as_str())
    .execute(pool)
    .await?;

    Ok(id)
}

/// Finalize an upload record with its terminal status, counts and error log
pub async fn finalize_upload(
    pool: &PgPool,
    upload_id: Uuid,
    status: UploadStatus,
    total_rows: u32,
    successful_rows: u32,
    failed_rows: u32,
    error_log: &[RowError],
) -> Result<()> {
    let error_log = serde_json::to_value(error_log)?;

    sqlx::query(
        r#"
        UPDATE csv_uploads
        SET status = $2,
            total_rows = $3,
            successful_rows = $4,
            failed_rows = $5,
            error_log = $6
        WHERE id = $1
        "#,
    )
    .bind(upload_id)
    .bind(status.as_str())
    .bind(total_rows as i32)
    .bind(successful_rows as i32)
    .bind(failed_rows as i32)
    .bind(error_log)
    .execute(pool)
    .await?;

    Ok(())
}

/// List every upload attempt, newest first
pub async fn list_uploads(pool: &PgPool) -> Result<Vec<UploadRecord>> {
    let uploads = sqlx::query_as::<_, UploadRecord>(
        r#"
        SELECT id, kind, filename, submitted_by_name, status,
               total_rows, successful_rows, failed_rows, error_log, created_at
        FROM csv_uploads
        ORDER BY created_at DESC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(uploads)
}
