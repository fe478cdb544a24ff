//! Students importer
//!
//! Expected columns: register_number, name, mobile_number, email,
//! room_number, user_type, employee_id, department

use async_trait::async_trait;
use rand::Rng;
use sqlx::PgPool;

use crate::db::queries;
use crate::types::CsvRow;

use super::error::RowImportError;
use super::{optional, required, RowImporter, RowOutcome};

const QR_SUFFIX_LEN: usize = 8;
const QR_SUFFIX_CHARS: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Generate the QR attendance token issued to a student on first import:
/// `QR_<register_number>_<8 random base-36 chars>`. Issued once; later
/// imports of the same register number keep the original token.
fn generate_qr_code(register_number: &str) -> String {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..QR_SUFFIX_LEN)
        .map(|_| QR_SUFFIX_CHARS[rng.gen_range(0..QR_SUFFIX_CHARS.len())] as char)
        .collect();
    format!("QR_{}_{}", register_number, suffix)
}

pub struct StudentsImporter;

#[async_trait]
impl RowImporter for StudentsImporter {
    async fn import_row(&self, pool: &PgPool, row: &CsvRow) -> Result<RowOutcome, RowImportError> {
        let register_number = required(row, "register_number")?;
        let name = required(row, "name")?;

        let mobile_number = optional(row, "mobile_number");
        let email = optional(row, "email");
        let room_number = optional(row, "room_number");
        let employee_id = row.get("employee_id").map(String::as_str);
        let department = row.get("department").map(String::as_str);

        let user_type = match optional(row, "user_type") {
            "" => "STUDENT",
            other => other,
        };

        match queries::student::find_student_by_register_number(pool, register_number).await? {
            Some(student_id) => {
                queries::student::update_student_import(
                    pool,
                    student_id,
                    name,
                    mobile_number,
                    email,
                    room_number,
                    user_type,
                    employee_id,
                    department,
                )
                .await?;
                Ok(RowOutcome::Updated)
            }
            None => {
                let qr_code = generate_qr_code(register_number);
                queries::student::create_student_import(
                    pool,
                    register_number,
                    name,
                    mobile_number,
                    email,
                    room_number,
                    &qr_code,
                    user_type,
                    employee_id,
                    department,
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

    #[test]
    fn test_qr_code_format() {
        let qr = generate_qr_code("S001");
        let suffix = qr.strip_prefix("QR_S001_").expect("prefix and register number");
        assert_eq!(suffix.len(), QR_SUFFIX_LEN);
        assert!(suffix
            .bytes()
            .all(|b| b.is_ascii_digit() || b.is_ascii_lowercase()));
    }

    #[test]
    fn test_qr_codes_are_unique_per_call() {
        // 36^8 suffixes; a collision here means the RNG is not being used
        let a = generate_qr_code("S001");
        let b = generate_qr_code("S001");
        assert_ne!(a, b);
    }
}
