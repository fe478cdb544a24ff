//! Student/employee queries for the imports pipeline

use anyhow::Result;
use sqlx::PgPool;
use uuid::Uuid;

/// Find a student by register number
pub async fn find_student_by_register_number(
    pool: &PgPool,
    register_number: &str,
) -> Result<Option<Uuid>> {
    let result = sqlx::query_scalar("SELECT id FROM students WHERE register_number = $1")
        .bind(register_number)
        .fetch_optional(pool)
        .await?;
    Ok(result)
}

/// Create a new student from an import row.
///
/// The QR code is issued here, on creation only; updates must never touch it.
#[allow(clippy::too_many_arguments)]
pub async fn create_student_import(
    pool: &PgPool,
    register_number: &str,
    name: &str,
    mobile_number: &str,
    email: &str,
    room_number: &str,
    qr_code: &str,
    user_type: &str,
    employee_id: Option<&str>,
    department: Option<&str>,
) -> Result<Uuid> {
    let id = Uuid::new_v4();

    sqlx::query(
        r#"
        INSERT INTO students (id, register_number, name, mobile_number, email,
            room_number, qr_code, user_type, employee_id, department,
            created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, NOW(), NOW())
        "#,
    )
    .bind(id)
    .bind(register_number)
    .bind(name)
    .bind(mobile_number)
    .bind(email)
    .bind(room_number)
    .bind(qr_code)
    .bind(user_type)
    .bind(employee_id)
    .bind(department)
    .execute(pool)
    .await?;

    Ok(id)
}

/// Update an existing student from an import row, preserving the QR code
#[allow(clippy::too_many_arguments)]
pub async fn update_student_import(
    pool: &PgPool,
    student_id: Uuid,
    name: &str,
    mobile_number: &str,
    email: &str,
    room_number: &str,
    user_type: &str,
    employee_id: Option<&str>,
    department: Option<&str>,
) -> Result<()> {
    sqlx::query(
        r#"
        UPDATE students
        SET name = $2,
            mobile_number = $3,
            email = $4,
            room_number = $5,
            user_type = $6,
            employee_id = $7,
            department = $8,
            updated_at = NOW()
        WHERE id = $1
        "#,
    )
    .bind(student_id)
    .bind(name)
    .bind(mobile_number)
    .bind(email)
    .bind(room_number)
    .bind(user_type)
    .bind(employee_id)
    .bind(department)
    .execute(pool)
    .await?;

    Ok(())
}
