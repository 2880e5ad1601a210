use aws_sdk_s3::Client as S3Client;
use redis::Client as RedisClient;
use sqlx::PgPool;

use crate::config::Config;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    /// Redis backs the auth session store (token → user id + role).
    pub redis: RedisClient,
    /// Object storage for captured/uploaded profile photos.
    pub s3: S3Client,
    pub config: Config,
}
