//! CSV upload types: import kinds, upload records and the row error log

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single parsed CSV data row: column name -> raw field value
pub type CsvRow = HashMap<String, String>;

/// The closed set of recognized import kinds.
///
/// The raw kind string from the client is parsed into this enum once at the
/// message boundary; everything past that point dispatches on the enum, so
/// an unrecognized kind can only be rejected before an upload record exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportKind {
    Items,
    Categories,
    Recipes,
    Students,
}

impl ImportKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImportKind::Items => "items",
            ImportKind::Categories => "categories",
            ImportKind::Recipes => "recipes",
            ImportKind::Students => "students",
        }
    }
}

impl fmt::Display for ImportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown import kind '{0}'")]
pub struct UnknownKind(pub String);

impl FromStr for ImportKind {
    type Err = UnknownKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "items" => Ok(ImportKind::Items),
            "categories" => Ok(ImportKind::Categories),
            "recipes" => Ok(ImportKind::Recipes),
            "students" => Ok(ImportKind::Students),
            other => Err(UnknownKind(other.to_string())),
        }
    }
}

/// Lifecycle of an upload record: Processing is entered exactly once at
/// creation, and exactly one terminal state is written at finalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UploadStatus {
    Processing,
    Completed,
    Failed,
}

impl UploadStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            UploadStatus::Processing => "PROCESSING",
            UploadStatus::Completed => "COMPLETED",
            UploadStatus::Failed => "FAILED",
        }
    }
}

/// One failed row in an upload's error log.
///
/// `row` is the 1-based index of the data row within the source file;
/// entries are appended in file order so the log stays sorted by row index.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RowError {
    pub row: u32,
    pub error: String,
    pub data: CsvRow,
}

/// Persisted record of one upload attempt
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct UploadRecord {
    pub id: Uuid,
    pub kind: String,
    pub filename: String,
    pub submitted_by_name: String,
    pub status: String,
    pub total_rows: i32,
    pub successful_rows: i32,
    pub failed_rows: i32,
    pub error_log: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

/// Payload for `messhall.csv.upload.submit`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CsvUploadRequest {
    /// Raw kind string; validated against [`ImportKind`] at the boundary
    pub kind: String,
    /// Original filename as uploaded by the client
    pub filename: String,
    /// Path to the file in transient local storage (written by the gateway)
    pub file_path: String,
    /// Display name of the submitting admin
    #[serde(default)]
    pub submitted_by_name: String,
}

/// Reply to `messhall.csv.upload.submit`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CsvUploadResponse {
    pub upload_id: Uuid,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_import_kind_round_trips_through_str() {
        for kind in [
            ImportKind::Items,
            ImportKind::Categories,
            ImportKind::Recipes,
            ImportKind::Students,
        ] {
            assert_eq!(kind.as_str().parse::<ImportKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_import_kind_rejects_unknown_and_wrong_case() {
        assert!("meal_plans".parse::<ImportKind>().is_err());
        assert!("Items".parse::<ImportKind>().is_err());
        assert_eq!(
            "bogus".parse::<ImportKind>().unwrap_err(),
            UnknownKind("bogus".to_string())
        );
    }

    #[test]
    fn test_upload_status_strings_match_registry_values() {
        assert_eq!(UploadStatus::Processing.as_str(), "PROCESSING");
        assert_eq!(UploadStatus::Completed.as_str(), "COMPLETED");
        assert_eq!(UploadStatus::Failed.as_str(), "FAILED");
    }

    #[test]
    fn test_row_error_serializes_with_raw_data() {
        let mut data = CsvRow::new();
        data.insert("name".to_string(), "Basmati Rice".to_string());
        let error = RowError {
            row: 3,
            error: "Item 'Ghee' not found".to_string(),
            data,
        };
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"row\":3"));
        assert!(json.contains("Basmati Rice"));
    }
}
