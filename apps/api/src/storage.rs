//! Object storage for profile photos (S3 / MinIO).

use aws_sdk_s3::primitives::ByteStream;
use axum::{
    extract::{Multipart, State},
    Json,
};
use bytes::Bytes;
use serde_json::json;
use uuid::Uuid;

use crate::auth::session::AuthUser;
use crate::errors::AppError;
use crate::state::AppState;

const PNG_MAGIC: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
const MAX_PHOTO_BYTES: usize = 5 * 1024 * 1024;

/// Uploads a captured photo and returns its storage key, which is what
/// the application form carries as `photo_profile`.
pub async fn store_profile_photo(
    s3: &aws_sdk_s3::Client,
    bucket: &str,
    png: Bytes,
) -> Result<String, AppError> {
    let key = format!("profile-photos/{}.png", Uuid::new_v4());
    s3.put_object()
        .bucket(bucket)
        .key(&key)
        .content_type("image/png")
        .body(ByteStream::from(png.to_vec()))
        .send()
        .await
        .map_err(|e| AppError::Storage(e.to_string()))?;
    tracing::info!("stored profile photo at {key}");
    Ok(key)
}

fn looks_like_png(bytes: &[u8]) -> bool {
    bytes.len() >= PNG_MAGIC.len() && bytes[..PNG_MAGIC.len()] == PNG_MAGIC
}

/// POST /api/v1/uploads/profile-photo
///
/// Accepts a multipart form with a single `photo` part containing the
/// mirrored PNG still from the capture flow.
pub async fn handle_upload_profile_photo(
    State(state): State<AppState>,
    _user: AuthUser,
    mut multipart: Multipart,
) -> Result<Json<serde_json::Value>, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("malformed multipart body: {e}")))?
    {
        if field.name() != Some("photo") {
            continue;
        }
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("failed to read photo: {e}")))?;
        if bytes.len() > MAX_PHOTO_BYTES {
            return Err(AppError::Validation(
                "photo exceeds the 5 MB limit".to_string(),
            ));
        }
        if !looks_like_png(&bytes) {
            return Err(AppError::Validation("photo must be a PNG".to_string()));
        }
        let key = store_profile_photo(&state.s3, &state.config.s3_bucket, bytes).await?;
        return Ok(Json(json!({ "photo_profile": key })));
    }
    Err(AppError::Validation("missing 'photo' part".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_png_magic_accepted() {
        let mut bytes = PNG_MAGIC.to_vec();
        bytes.extend_from_slice(&[0u8; 16]);
        assert!(looks_like_png(&bytes));
    }

    #[test]
    fn test_jpeg_rejected() {
        assert!(!looks_like_png(&[0xFF, 0xD8, 0xFF, 0xE0, 0, 0, 0, 0]));
    }

    #[test]
    fn test_short_buffer_rejected() {
        assert!(!looks_like_png(&PNG_MAGIC[..4]));
    }
}
