//! Categories importer
//!
//! Expected columns: name

use async_trait::async_trait;
use sqlx::PgPool;

use crate::db::queries;
use crate::types::CsvRow;

use super::error::RowImportError;
use super::{required, RowImporter, RowOutcome};

pub struct CategoriesImporter;

#[async_trait]
impl RowImporter for CategoriesImporter {
    async fn import_row(&self, pool: &PgPool, row: &CsvRow) -> Result<RowOutcome, RowImportError> {
        let name = required(row, "name")?;

        // Idempotent by name: re-importing an existing category is a
        // successful no-op, not an error.
        if queries::catalog::upsert_category(pool, name).await? {
            Ok(RowOutcome::Created)
        } else {
            Ok(RowOutcome::Updated)
        }
    }
}
