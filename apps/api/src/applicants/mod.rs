//! Application intake and admin-side applicant management. Submissions
//! are validated against the job's stored form snapshot and only visible
//! fields are ever persisted.

pub mod handlers;
pub mod repo;
