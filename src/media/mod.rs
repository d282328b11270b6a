//! Hosted media storage for posters, portraits, trailers and snack images.

pub mod cloudinary;

use async_trait::async_trait;

use crate::error::AppResult;
use crate::models::media_model::{MediaKind, MediaRef, UploadedFile};

pub use cloudinary::CloudinaryStore;

/// Failures surface as [`crate::error::AppError::Upstream`].
#[async_trait]
pub trait MediaStore: Send + Sync {
    async fn upload(&self, file: &UploadedFile, folder: &str, kind: MediaKind) -> AppResult<MediaRef>;

    async fn destroy(&self, public_id: &str, kind: MediaKind) -> AppResult<()>;
}

/// Deletes `public_id`, logging instead of failing when the store refuses.
pub async fn destroy_quietly(media: &dyn MediaStore, public_id: &str, kind: MediaKind) {
    if let Err(e) = media.destroy(public_id, kind).await {
        tracing::warn!(public_id, error = %e, "Could not delete media object");
    }
}
