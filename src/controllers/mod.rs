pub mod home_controller;
pub mod movie_controller;
pub mod reservation_controller;
pub mod show_controller;
pub mod snack_controller;
pub mod upcoming_controller;

use crate::form::FormData;
use crate::media::MediaStore;
use crate::models::media_model::MediaKind;
use crate::models::movie_model::{CastInput, CastMember};

/// Uploads the `castsImage_{i}` portrait for each cast member. A failed upload
/// keeps the member without a portrait.
pub(crate) async fn upload_cast_portraits(
    media: &dyn MediaStore,
    form: &FormData,
    casts: Vec<CastInput>,
    folder: &str,
) -> Vec<CastMember> {
    let mut members = Vec::with_capacity(casts.len());

    for (i, cast) in casts.into_iter().enumerate() {
        let casts_image = match form.file(&format!("castsImage_{}", i)) {
            Some(file) => match media.upload(file, folder, MediaKind::Image).await {
                Ok(image) => Some(image),
                Err(e) => {
                    tracing::warn!(cast = %cast.name, error = %e, "Cast image upload failed, skipping image");
                    None
                }
            },
            None => None,
        };

        members.push(CastMember {
            name: cast.name,
            casts_image,
        });
    }

    members
}
