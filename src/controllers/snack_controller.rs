use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::Json,
};
use serde_json::{json, Value};

use crate::error::{AppError, AppMultipart, AppResult};
use crate::form::FormData;
use crate::media::destroy_quietly;
use crate::models::media_model::{MediaKind, UploadedFile};
use crate::models::snack_model::{Snack, SnackUpdate};
use crate::utils::parse_object_id;
use crate::AppState;

const SNACK_FOLDER: &str = "Snacks";

fn parse_price(raw: &str) -> AppResult<f64> {
    raw.parse::<f64>()
        .ok()
        .filter(|p| p.is_finite() && *p >= 0.0)
        .ok_or_else(|| AppError::Validation("price must be a valid number".to_string()))
}

fn require_image(file: &UploadedFile) -> AppResult<()> {
    if file.is_image() {
        Ok(())
    } else {
        Err(AppError::Validation("Uploaded file must be an image".to_string()))
    }
}

/// Reads the optional edits of an update form. The image is handled separately.
fn snack_update_from(form: &FormData) -> AppResult<SnackUpdate> {
    Ok(SnackUpdate {
        name: form.text("name").map(str::to_string),
        desc: form.text("desc").map(str::to_string),
        price: form.text("price").map(parse_price).transpose()?,
        snack_type: form.text("type").map(str::to_string),
        image: None,
    })
}

pub async fn create_snack(
    Extension(state): Extension<AppState>,
    AppMultipart(multipart): AppMultipart,
) -> AppResult<(StatusCode, Json<Value>)> {
    let form = FormData::from_multipart(multipart).await?;

    let (Some(name), Some(desc), Some(price)) = (form.text("name"), form.text("desc"), form.text("price"))
    else {
        return Err(AppError::Validation("name, desc and price are required".to_string()));
    };
    let price = parse_price(price)?;

    let file = form
        .file("image")
        .ok_or_else(|| AppError::Validation("Image is required".to_string()))?;
    require_image(file)?;

    let image = state
        .media
        .upload(file, SNACK_FOLDER, MediaKind::Image)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Snack image upload failed");
            AppError::Upstream("Image upload failed".to_string())
        })?;

    let snack = state
        .store
        .insert_snack(Snack {
            id: None,
            name: name.to_string(),
            desc: desc.to_string(),
            price,
            snack_type: form.text("type").map(str::to_string),
            image,
        })
        .await?;
    tracing::info!(name = %snack.name, "Added snack");

    Ok((StatusCode::CREATED, Json(json!({ "success": true, "snack": snack }))))
}

pub async fn load_snacks(Extension(state): Extension<AppState>) -> AppResult<Json<Value>> {
    let snacks = state.store.list_snacks().await?;
    Ok(Json(json!({ "success": true, "snacks": snacks })))
}

pub async fn load_snack(
    Extension(state): Extension<AppState>,
    Path(id_str): Path<String>,
) -> AppResult<Json<Value>> {
    let id = parse_object_id(&id_str, "Snack")?;
    let snack = state
        .store
        .find_snack(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Snack not found".to_string()))?;

    Ok(Json(json!({ "success": true, "snack": snack })))
}

pub async fn update_snack(
    Extension(state): Extension<AppState>,
    Path(id_str): Path<String>,
    AppMultipart(multipart): AppMultipart,
) -> AppResult<Json<Value>> {
    let id = parse_object_id(&id_str, "Snack")?;
    let existing = state
        .store
        .find_snack(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Snack not found".to_string()))?;

    let form = FormData::from_multipart(multipart).await?;
    let mut update = snack_update_from(&form)?;

    if let Some(file) = form.file("image") {
        require_image(file)?;
        destroy_quietly(state.media.as_ref(), &existing.image.public_id, MediaKind::Image).await;

        let image = state
            .media
            .upload(file, SNACK_FOLDER, MediaKind::Image)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Snack image upload failed");
                AppError::Upstream("Image upload failed".to_string())
            })?;
        update.image = Some(image);
    }

    let snack = state
        .store
        .update_snack(id, &update)
        .await?
        .ok_or_else(|| AppError::NotFound("Snack not found".to_string()))?;

    Ok(Json(json!({ "success": true, "snack": snack })))
}

pub async fn delete_snack(
    Extension(state): Extension<AppState>,
    Path(id_str): Path<String>,
) -> AppResult<Json<Value>> {
    let id = parse_object_id(&id_str, "Snack")?;
    let snack = state
        .store
        .find_snack(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Snack not found".to_string()))?;

    destroy_quietly(state.media.as_ref(), &snack.image.public_id, MediaKind::Image).await;
    state.store.delete_snack(id).await?;
    tracing::info!(name = %snack.name, "Deleted snack");

    Ok(Json(json!({ "success": true, "message": "Snack deleted" })))
}
