//! Persistence layer for job postings.

use chrono::Utc;
use serde_json::Value;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::job::JobRow;

/// Fields persisted when a posting is created. `application_form_config`
/// is the serialized form snapshot; it is written once and never updated.
#[derive(Debug, Clone)]
pub struct NewJob {
    pub slug: String,
    pub title: String,
    pub job_type: String,
    pub description: String,
    pub number_of_candidates: i32,
    pub salary_min: i64,
    pub salary_max: i64,
    pub status: String,
    pub application_form_config: Value,
}

/// Mutable posting fields. The form snapshot is deliberately absent.
#[derive(Debug, Clone)]
pub struct JobChanges {
    pub slug: String,
    pub title: String,
    pub job_type: String,
    pub description: String,
    pub number_of_candidates: i32,
    pub salary_min: i64,
    pub salary_max: i64,
}

pub async fn list_jobs(db: &PgPool, status: Option<&str>) -> Result<Vec<JobRow>, sqlx::Error> {
    match status {
        Some(status) => {
            sqlx::query_as::<_, JobRow>(
                "SELECT * FROM jobs WHERE status = $1 ORDER BY created_at DESC",
            )
            .bind(status)
            .fetch_all(db)
            .await
        }
        None => {
            sqlx::query_as::<_, JobRow>("SELECT * FROM jobs ORDER BY created_at DESC")
                .fetch_all(db)
                .await
        }
    }
}

pub async fn get_job(db: &PgPool, id: Uuid) -> Result<Option<JobRow>, sqlx::Error> {
    sqlx::query_as::<_, JobRow>("SELECT * FROM jobs WHERE id = $1")
        .bind(id)
        .fetch_optional(db)
        .await
}

pub async fn get_job_by_slug(db: &PgPool, slug: &str) -> Result<Option<JobRow>, sqlx::Error> {
    sqlx::query_as::<_, JobRow>("SELECT * FROM jobs WHERE slug = $1")
        .bind(slug)
        .fetch_optional(db)
        .await
}

/// Appends `-2`, `-3`, … until the slug is free.
pub async fn ensure_unique_slug(db: &PgPool, base: &str) -> Result<String, sqlx::Error> {
    if get_job_by_slug(db, base).await?.is_none() {
        return Ok(base.to_string());
    }
    let mut n = 2;
    loop {
        let candidate = format!("{base}-{n}");
        if get_job_by_slug(db, &candidate).await?.is_none() {
            return Ok(candidate);
        }
        n += 1;
    }
}

pub async fn insert_job(db: &PgPool, new: NewJob) -> Result<JobRow, sqlx::Error> {
    let started_on = Utc::now().date_naive();
    sqlx::query_as::<_, JobRow>(
        r#"
        INSERT INTO jobs (
            id, slug, title, job_type, description, number_of_candidates,
            salary_min, salary_max, status, application_form_config,
            started_on, created_at, updated_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, NOW(), NOW())
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(&new.slug)
    .bind(&new.title)
    .bind(&new.job_type)
    .bind(&new.description)
    .bind(new.number_of_candidates)
    .bind(new.salary_min)
    .bind(new.salary_max)
    .bind(&new.status)
    .bind(&new.application_form_config)
    .bind(started_on)
    .fetch_one(db)
    .await
}

pub async fn update_job(
    db: &PgPool,
    id: Uuid,
    changes: JobChanges,
) -> Result<Option<JobRow>, sqlx::Error> {
    sqlx::query_as::<_, JobRow>(
        r#"
        UPDATE jobs
        SET slug = $2, title = $3, job_type = $4, description = $5,
            number_of_candidates = $6, salary_min = $7, salary_max = $8,
            updated_at = NOW()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(&changes.slug)
    .bind(&changes.title)
    .bind(&changes.job_type)
    .bind(&changes.description)
    .bind(changes.number_of_candidates)
    .bind(changes.salary_min)
    .bind(changes.salary_max)
    .fetch_optional(db)
    .await
}

/// Sets the posting status. Going active for the first time stamps
/// `started_on` with today.
pub async fn update_job_status(
    db: &PgPool,
    id: Uuid,
    status: &str,
) -> Result<Option<JobRow>, sqlx::Error> {
    sqlx::query_as::<_, JobRow>(
        r#"
        UPDATE jobs
        SET status = $2,
            started_on = CASE
                WHEN $2 = 'active' AND started_on IS NULL THEN $3
                ELSE started_on
            END,
            updated_at = NOW()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(status)
    .bind(Utc::now().date_naive())
    .fetch_optional(db)
    .await
}

pub async fn delete_job(db: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM jobs WHERE id = $1")
        .bind(id)
        .execute(db)
        .await?;
    Ok(result.rows_affected() > 0)
}
