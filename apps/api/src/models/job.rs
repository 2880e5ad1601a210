use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

use crate::jobs::display::format_salary;

/// The five job types a posting may carry.
pub const JOB_TYPES: &[&str] = &[
    "Full-Time",
    "Part-Time",
    "Contract",
    "Internship",
    "Freelance",
];

/// Lifecycle status of a posting. Only `active` jobs are applicant-facing.
pub const JOB_STATUS: &[&str] = &["active", "inactive", "draft"];

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JobRow {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    pub job_type: String,
    pub description: String,
    pub number_of_candidates: i32,
    pub salary_min: i64,
    pub salary_max: i64,
    pub status: String,
    /// Form-config snapshot captured at creation time. This is the
    /// applicant-facing contract for the job; later config edits never
    /// reach an already-stored snapshot.
    pub application_form_config: Value,
    pub started_on: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Display-oriented salary range attached to outgoing job payloads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalaryRange {
    pub min: i64,
    pub max: i64,
    pub currency: String,
    pub display_text: String,
}

/// A job row enriched with computed fields for API consumers.
#[derive(Debug, Clone, Serialize)]
pub struct Job {
    #[serde(flatten)]
    pub row: JobRow,
    pub salary_range: SalaryRange,
}

impl Job {
    pub fn from_row(row: JobRow) -> Self {
        let display_text = format!(
            "{} - {}",
            format_salary(row.salary_min, "IDR"),
            format_salary(row.salary_max, "IDR")
        );
        let salary_range = SalaryRange {
            min: row.salary_min,
            max: row.salary_max,
            currency: "IDR".to_string(),
            display_text,
        };
        Job { row, salary_range }
    }
}
