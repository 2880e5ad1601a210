//! Token-based authentication: Redis-backed sessions, salted password
//! digests, and the request extractors that gate routes by role.

pub mod handlers;
pub mod session;
