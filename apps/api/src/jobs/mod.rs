//! Job posting management: slugs and salary display, persistence, and the
//! admin-facing HTTP handlers. The application-form snapshot a job carries
//! is fixed at creation time; see [`crate::forms`] for how it is built.

pub mod display;
pub mod handlers;
pub mod repo;
