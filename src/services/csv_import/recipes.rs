//! Recipes importer
//!
//! Expected columns: dish_name, item_name, qty_per_student

use async_trait::async_trait;
use sqlx::PgPool;

use crate::db::queries;
use crate::types::CsvRow;

use super::error::RowImportError;
use super::{required, RowImporter, RowOutcome};

fn parse_qty(row: &CsvRow) -> Result<f64, RowImportError> {
    let raw = required(row, "qty_per_student")?;
    raw.parse().map_err(|_| RowImportError::InvalidField {
        field: "qty_per_student",
        value: raw.to_string(),
    })
}

pub struct RecipesImporter;

#[async_trait]
impl RowImporter for RecipesImporter {
    async fn import_row(&self, pool: &PgPool, row: &CsvRow) -> Result<RowOutcome, RowImportError> {
        let dish_name = required(row, "dish_name")?;
        let item_name = required(row, "item_name")?;
        let qty_per_student = parse_qty(row)?;

        // The dish is resolved (and possibly created) before the item lookup;
        // if the item then turns out to be missing, the freshly created dish
        // is left in place. The two writes are not atomic.
        let dish_id = match queries::recipe::find_dish_by_name(pool, dish_name).await? {
            Some(id) => id,
            None => queries::recipe::create_dish(pool, dish_name).await?,
        };

        // Items must already exist; a recipe never creates its ingredient.
        let item_id = queries::catalog::find_item_by_name(pool, item_name)
            .await?
            .ok_or_else(|| RowImportError::NotFound {
                entity: "Item",
                name: item_name.to_string(),
            })?;

        if queries::recipe::upsert_recipe(pool, dish_id, item_id, qty_per_student).await? {
            Ok(RowOutcome::Created)
        } else {
            Ok(RowOutcome::Updated)
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
    fn test_qty_parses_decimal_values() {
        let qty = parse_qty(&row(&[("qty_per_student", "0.25")])).unwrap();
        assert!((qty - 0.25).abs() < f64::EPSILON);
    }

    #[test]
    fn test_unparseable_qty_fails_the_row() {
        let result = parse_qty(&row(&[("qty_per_student", "a pinch")]));
        assert!(matches!(
            result,
            Err(RowImportError::InvalidField {
                field: "qty_per_student",
                ..
            })
        ));
    }

    #[test]
    fn test_missing_qty_fails_the_row() {
        let result = parse_qty(&row(&[]));
        assert!(matches!(
            result,
            Err(RowImportError::MissingField("qty_per_student"))
        ));
    }
}
