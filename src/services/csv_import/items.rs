//! Items importer
//!
//! Expected columns: name, sku, unit, category_name, preferred_vendor_name,
//! moq, reorder_point, storage_type, perishable

use async_trait::async_trait;
use sqlx::PgPool;

use crate::db::queries;
use crate::types::CsvRow;

use super::error::RowImportError;
use super::{optional, required, RowImporter, RowOutcome};

/// Parse an integer count, defaulting to 0 on any parse failure
fn count_or_zero(row: &CsvRow, field: &str) -> i32 {
    row.get(field).and_then(|v| v.parse().ok()).unwrap_or(0)
}

/// The `perishable` flag is true only for the exact lowercase literal
/// `"true"` — `"True"`, `"TRUE"` and `"1"` all read as false. Inherited
/// from the system this importer replaces; callers rely on the pinned
/// behavior, so do not loosen the comparison.
fn parse_perishable(row: &CsvRow) -> bool {
    row.get("perishable").map(String::as_str) == Some("true")
}

pub struct ItemsImporter;

impl ItemsImporter {
    async fn find_or_create_category(
        &self,
        pool: &PgPool,
        name: &str,
    ) -> Result<uuid::Uuid, RowImportError> {
        if let Some(id) = queries::catalog::find_category_by_name(pool, name).await? {
            return Ok(id);
        }
        Ok(queries::catalog::create_category(pool, name).await?)
    }
}

#[async_trait]
impl RowImporter for ItemsImporter {
    async fn import_row(&self, pool: &PgPool, row: &CsvRow) -> Result<RowOutcome, RowImportError> {
        let name = required(row, "name")?;
        let sku = required(row, "sku")?;
        let category_name = required(row, "category_name")?;

        let category_id = self.find_or_create_category(pool, category_name).await?;

        // Absent vendor is tolerated: the item is simply created without a
        // preferred vendor link.
        let vendor_name = optional(row, "preferred_vendor_name");
        let preferred_vendor_id = if vendor_name.is_empty() {
            None
        } else {
            queries::catalog::find_vendor_by_name(pool, vendor_name).await?
        };

        let unit = optional(row, "unit");
        let storage_type = optional(row, "storage_type");
        let moq = count_or_zero(row, "moq");
        let reorder_point = count_or_zero(row, "reorder_point");
        let perishable = parse_perishable(row);

        match queries::catalog::find_item_by_sku(pool, sku).await? {
            Some(item_id) => {
                queries::catalog::update_item_import(
                    pool,
                    item_id,
                    name,
                    unit,
                    category_id,
                    preferred_vendor_id,
                    moq,
                    reorder_point,
                    storage_type,
                    perishable,
                )
                .await?;
                Ok(RowOutcome::Updated)
            }
            None => {
                queries::catalog::create_item_import(
                    pool,
                    name,
                    sku,
                    unit,
                    category_id,
                    preferred_vendor_id,
                    moq,
                    reorder_point,
                    storage_type,
                    perishable,
                )
                .await?;
                Ok(RowOutcome::Created)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(pairs: &[(&str, &str)]) -> CsvRow {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_perishable_requires_exact_lowercase_true() {
        assert!(parse_perishable(&row(&[("perishable", "true")])));
        assert!(!parse_perishable(&row(&[("perishable", "True")])));
        assert!(!parse_perishable(&row(&[("perishable", "TRUE")])));
        assert!(!parse_perishable(&row(&[("perishable", "1")])));
        assert!(!parse_perishable(&row(&[("perishable", "")])));
        assert!(!parse_perishable(&row(&[])));
    }

    #[test]
    fn test_counts_default_to_zero_on_parse_failure() {
        assert_eq!(count_or_zero(&row(&[("moq", "25")]), "moq"), 25);
        assert_eq!(count_or_zero(&row(&[("moq", "lots")]), "moq"), 0);
        assert_eq!(count_or_zero(&row(&[("moq", "")]), "moq"), 0);
        assert_eq!(count_or_zero(&row(&[]), "moq"), 0);
    }

    #[test]
    fn test_required_fields_reject_empty_values() {
        let row = row(&[("sku", "")]);
        let result = required(&row, "sku");
        assert!(matches!(result, Err(RowImportError::MissingField("sku"))));
    }
}
