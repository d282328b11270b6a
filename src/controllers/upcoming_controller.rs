use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::Json,
};
use serde_json::{json, Value};

use crate::error::{AppError, AppMultipart, AppResult};
use crate::form::{json_or_comma_list, FormData};
use crate::media::{destroy_quietly, MediaStore};
use crate::models::media_model::{MediaKind, UploadedFile};
use crate::models::movie_model::CastInput;
use crate::models::upcoming_model::{Trailer, Upcoming};
use crate::trailer::{embed_url, is_video_host_link};
use crate::utils::parse_object_id;
use crate::AppState;

use super::upload_cast_portraits;

enum TrailerSource<'a> {
    Link(String),
    File(&'a UploadedFile),
}

struct UpcomingDraft<'a> {
    title: String,
    description: String,
    release_date: String,
    come_date: String,
    language: String,
    runtime: u32,
    genres: Vec<String>,
    poster: &'a UploadedFile,
    trailer: Option<TrailerSource<'a>>,
    casts: Vec<CastInput>,
}

/// Genres arrive as repeated `genres[]` parts, a JSON array, or comma text.
fn genres_from(form: &FormData) -> Vec<String> {
    for key in ["genres", "genres_json", "genres[]"] {
        match form.texts(key) {
            [] => continue,
            [single] => return json_or_comma_list(single),
            many => {
                return many
                    .iter()
                    .map(|g| g.trim().to_string())
                    .filter(|g| !g.is_empty())
                    .collect()
            }
        }
    }
    Vec::new()
}

fn validate_upcoming(form: &FormData) -> AppResult<UpcomingDraft<'_>> {
    let genres = genres_from(form);

    let required = || {
        AppError::Validation("All fields are required (including at least one genre).".to_string())
    };
    let title = form.text("title").ok_or_else(required)?;
    let description = form.text("description").ok_or_else(required)?;
    let release_date = form.text("release_date").ok_or_else(required)?;
    let come_date = form.text("come_date").ok_or_else(required)?;
    let language = form.text("language").ok_or_else(required)?;
    let runtime = form.text("runtime").ok_or_else(required)?;
    if genres.is_empty() {
        return Err(required());
    }

    let runtime: u32 = runtime
        .parse()
        .map_err(|_| AppError::Validation("runtime must be a whole number of minutes.".to_string()))?;

    let trailer = match (form.text("trailer"), form.file("trailer")) {
        (Some(link), _) => {
            if !is_video_host_link(link) {
                return Err(AppError::Validation("Invalid YouTube trailer link.".to_string()));
            }
            Some(TrailerSource::Link(link.to_string()))
        }
        (None, Some(file)) => {
            if !file.is_video() {
                return Err(AppError::Validation("Uploaded trailer must be a video.".to_string()));
            }
            Some(TrailerSource::File(file))
        }
        (None, None) => None,
    };

    let poster = form
        .file("backdrop_path")
        .ok_or_else(|| AppError::Validation("Poster (backdrop_path) is required.".to_string()))?;
    if !poster.is_image() {
        return Err(AppError::Validation("Uploaded poster must be an image.".to_string()));
    }

    // Unreadable cast lists are dropped rather than rejected.
    let casts = form
        .text("casts")
        .and_then(|raw| serde_json::from_str::<Vec<CastInput>>(raw).ok())
        .unwrap_or_default();

    Ok(UpcomingDraft {
        title: title.to_string(),
        description: description.to_string(),
        release_date: release_date.to_string(),
        come_date: come_date.to_string(),
        language: language.to_string(),
        runtime,
        genres,
        poster,
        trailer,
        casts,
    })
}

pub async fn add_upcoming(
    Extension(state): Extension<AppState>,
    AppMultipart(multipart): AppMultipart,
) -> AppResult<(StatusCode, Json<Value>)> {
    let form = FormData::from_multipart(multipart).await?;
    let draft = validate_upcoming(&form)?;

    let backdrop_path = state
        .media
        .upload(draft.poster, "POSTER", MediaKind::Image)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Poster upload failed");
            AppError::Upstream("Poster upload failed.".to_string())
        })?;

    let trailer = match draft.trailer {
        Some(TrailerSource::Link(link)) => Some(Trailer::Link(link)),
        Some(TrailerSource::File(file)) => {
            let uploaded = state
                .media
                .upload(file, "TRAILERS", MediaKind::Video)
                .await
                .map_err(|e| {
                    tracing::error!(error = %e, "Trailer upload failed");
                    AppError::Upstream("Trailer upload failed.".to_string())
                })?;
            Some(Trailer::Upload(uploaded))
        }
        None => None,
    };

    let casts = upload_cast_portraits(state.media.as_ref(), &form, draft.casts, "CASTS").await;

    let upcoming = state
        .store
        .insert_upcoming(Upcoming {
            id: None,
            title: draft.title,
            description: draft.description,
            release_date: draft.release_date,
            come_date: draft.come_date,
            language: draft.language,
            runtime: draft.runtime,
            genres: draft.genres,
            backdrop_path,
            trailer,
            casts,
        })
        .await?;
    tracing::info!(title = %upcoming.title, "Added upcoming movie");

    let genres_text = upcoming.genres.join(", ");

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Upcoming movie added successfully",
            "upcoming": upcoming,
            "genres_text": genres_text,
        })),
    ))
}

pub async fn load_upcomings(Extension(state): Extension<AppState>) -> AppResult<Json<Value>> {
    let upcoming = state.store.list_upcoming().await?;
    Ok(Json(json!({ "success": true, "upcoming": upcoming })))
}

pub async fn load_upcoming(
    Extension(state): Extension<AppState>,
    Path(id_str): Path<String>,
) -> AppResult<Json<Value>> {
    let id = parse_object_id(&id_str, "Upcoming movie")?;
    let upcoming = state
        .store
        .find_upcoming(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Upcoming movie not found".to_string()))?;

    let trailer_embed_url = upcoming.trailer_link().and_then(embed_url);

    Ok(Json(json!({
        "success": true,
        "upcoming": upcoming,
        "trailer_embed_url": trailer_embed_url,
    })))
}

/// Deletes every media object the record owns: poster, uploaded trailer, then
/// cast portraits. Failures are logged and the remaining deletions still run.
pub async fn delete_upcoming_media(media: &dyn MediaStore, upcoming: &Upcoming) {
    destroy_quietly(media, &upcoming.backdrop_path.public_id, MediaKind::Image).await;

    if let Some(Trailer::Upload(trailer)) = &upcoming.trailer {
        destroy_quietly(media, &trailer.public_id, MediaKind::Video).await;
    }

    for image in upcoming.casts.iter().filter_map(|c| c.casts_image.as_ref()) {
        if !image.public_id.is_empty() {
            destroy_quietly(media, &image.public_id, MediaKind::Image).await;
        }
    }
}

pub async fn delete_upcoming(
    Extension(state): Extension<AppState>,
    Path(id_str): Path<String>,
) -> AppResult<Json<Value>> {
    let id = parse_object_id(&id_str, "Upcoming movie")?;
    let upcoming = state
        .store
        .find_upcoming(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Upcoming movie not found".to_string()))?;

    delete_upcoming_media(state.media.as_ref(), &upcoming).await;
    state.store.delete_upcoming(id).await?;
    tracing::info!(title = %upcoming.title, "Deleted upcoming movie");

    Ok(Json(json!({
        "success": true,
        "message": "Upcoming movie deleted successfully",
    })))
}
