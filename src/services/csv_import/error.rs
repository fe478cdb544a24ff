//! Import error taxonomy
//!
//! Two tiers: [`RowImportError`] is caught at the row boundary and recorded
//! in the upload's error log without stopping the batch; [`ImportError`] is
//! fatal to the whole upload and drives the FAILED terminal status.

use thiserror::Error;

/// A single row could not be turned into a persisted entity.
///
/// Never escapes the coordinator: it is converted into a logged `RowError`
/// and the batch moves on to the next row.
#[derive(Debug, Error)]
pub enum RowImportError {
    #[error("missing required field '{0}'")]
    MissingField(&'static str),

    #[error("{entity} '{name}' not found")]
    NotFound { entity: &'static str, name: String },

    #[error("invalid value '{value}' for field '{field}'")]
    InvalidField { field: &'static str, value: String },

    #[error("database error: {0}")]
    Database(#[from] anyhow::Error),
}

/// Setup-level failure that terminates the whole upload
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("failed to read upload stream: {0}")]
    Stream(#[from] csv::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message_matches_log_format() {
        let error = RowImportError::NotFound {
            entity: "Item",
            name: "Ghee".to_string(),
        };
        assert_eq!(error.to_string(), "Item 'Ghee' not found");
    }

    #[test]
    fn test_missing_field_names_the_column() {
        let error = RowImportError::MissingField("register_number");
        assert_eq!(
            error.to_string(),
            "missing required field 'register_number'"
        );
    }
}
