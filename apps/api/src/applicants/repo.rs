//! Persistence layer for applicants.

use std::collections::BTreeMap;

use sqlx::PgPool;
use uuid::Uuid;

use crate::models::applicant::Applicant;

fn field(data: &BTreeMap<String, String>, key: &str) -> Option<String> {
    data.get(key).cloned()
}

/// Inserts a submission. `data` must already be filtered to the job's
/// visible fields; anything absent stays NULL.
pub async fn insert_applicant(
    db: &PgPool,
    job_id: Uuid,
    data: &BTreeMap<String, String>,
) -> Result<Applicant, sqlx::Error> {
    sqlx::query_as::<_, Applicant>(
        r#"
        INSERT INTO applicants (
            id, job_id, full_name, email, phone_number, gender, domicile,
            linkedin_link, date_of_birth, photo_profile, created_at, updated_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, NOW(), NOW())
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(job_id)
    .bind(field(data, "full_name"))
    .bind(field(data, "email"))
    .bind(field(data, "phone_number"))
    .bind(field(data, "gender"))
    .bind(field(data, "domicile"))
    .bind(field(data, "linkedin_link"))
    .bind(field(data, "date_of_birth"))
    .bind(field(data, "photo_profile"))
    .fetch_one(db)
    .await
}

pub async fn list_by_job(db: &PgPool, job_id: Uuid) -> Result<Vec<Applicant>, sqlx::Error> {
    sqlx::query_as::<_, Applicant>(
        "SELECT * FROM applicants WHERE job_id = $1 ORDER BY created_at DESC",
    )
    .bind(job_id)
    .fetch_all(db)
    .await
}

pub async fn count_by_job(db: &PgPool, job_id: Uuid) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM applicants WHERE job_id = $1")
        .bind(job_id)
        .fetch_one(db)
        .await
}

pub async fn get_applicant(db: &PgPool, id: Uuid) -> Result<Option<Applicant>, sqlx::Error> {
    sqlx::query_as::<_, Applicant>("SELECT * FROM applicants WHERE id = $1")
        .bind(id)
        .fetch_optional(db)
        .await
}

/// Applies a partial update: keys absent from `data` keep their stored
/// value. `data` must already be filtered and validated.
pub async fn update_applicant(
    db: &PgPool,
    id: Uuid,
    data: &BTreeMap<String, String>,
) -> Result<Option<Applicant>, sqlx::Error> {
    sqlx::query_as::<_, Applicant>(
        r#"
        UPDATE applicants
        SET full_name = COALESCE($2, full_name),
            email = COALESCE($3, email),
            phone_number = COALESCE($4, phone_number),
            gender = COALESCE($5, gender),
            domicile = COALESCE($6, domicile),
            linkedin_link = COALESCE($7, linkedin_link),
            date_of_birth = COALESCE($8, date_of_birth),
            photo_profile = COALESCE($9, photo_profile),
            updated_at = NOW()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(field(data, "full_name"))
    .bind(field(data, "email"))
    .bind(field(data, "phone_number"))
    .bind(field(data, "gender"))
    .bind(field(data, "domicile"))
    .bind(field(data, "linkedin_link"))
    .bind(field(data, "date_of_birth"))
    .bind(field(data, "photo_profile"))
    .fetch_optional(db)
    .await
}

pub async fn delete_applicant(db: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM applicants WHERE id = $1")
        .bind(id)
        .execute(db)
        .await?;
    Ok(result.rows_affected() > 0)
}
