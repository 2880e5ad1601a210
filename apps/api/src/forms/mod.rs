//! Dynamic Application Form Engine.
//!
//! A job posting declares, per profile field, whether the field is
//! mandatory, optional, or off. The applicant-facing form and its
//! validation are derived from a snapshot of that configuration taken at
//! job-creation time: `fields` owns the configuration model and the
//! snapshot builder, `rules` the per-field pure validators, and `engine`
//! the registry lookup plus full-object validation and payload filtering.

pub mod engine;
pub mod fields;
pub mod rules;
