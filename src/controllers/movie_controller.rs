use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::Json,
};
use serde_json::{json, Value};

use crate::error::{AppError, AppMultipart, AppResult};
use crate::form::{comma_list, FormData};
use crate::models::media_model::{MediaKind, UploadedFile};
use crate::models::movie_model::{default_language, CastInput, ManualMovie};
use crate::trailer::canonical_watch_url;
use crate::utils::parse_object_id;
use crate::AppState;

use super::upload_cast_portraits;

/// A validated manual movie submission, ready for uploads.
struct ManualMovieDraft<'a> {
    title: String,
    overview: String,
    release_date: String,
    original_language: String,
    tagline: String,
    genres: Vec<String>,
    runtime: u32,
    vote_average: f64,
    trailer: String,
    poster: &'a UploadedFile,
    casts: Vec<CastInput>,
}

fn validate_manual_movie(form: &FormData) -> AppResult<ManualMovieDraft<'_>> {
    let genres = form
        .text("genres_text")
        .or_else(|| form.text("genres"))
        .map(comma_list)
        .unwrap_or_default();

    let (Some(title), Some(overview), Some(release_date), Some(runtime)) = (
        form.text("title"),
        form.text("overview"),
        form.text("release_date"),
        form.text("runtime"),
    ) else {
        return Err(AppError::Validation("Missing required fields.".to_string()));
    };
    if genres.is_empty() {
        return Err(AppError::Validation("Missing required fields.".to_string()));
    }

    let runtime: u32 = runtime
        .parse()
        .map_err(|_| AppError::Validation("runtime must be a whole number of minutes.".to_string()))?;
    let vote_average: f64 = form
        .text("vote_average")
        .and_then(|v| v.parse().ok())
        .unwrap_or(0.0);

    let poster = form
        .file("backdrop_path")
        .ok_or_else(|| AppError::Validation("Poster image required.".to_string()))?;
    if !poster.is_image() {
        return Err(AppError::Validation("Poster must be an image.".to_string()));
    }

    let raw_trailer = form
        .text("trailer")
        .or_else(|| form.text("trailer_url"))
        .ok_or_else(|| AppError::Validation("Trailer is required.".to_string()))?;
    let trailer = canonical_watch_url(raw_trailer)
        .ok_or_else(|| AppError::Validation("Invalid YouTube trailer URL.".to_string()))?;

    let casts: Vec<CastInput> = match form.text("casts") {
        Some(raw) => serde_json::from_str(raw)
            .map_err(|_| AppError::Validation("Invalid casts JSON.".to_string()))?,
        None => Vec::new(),
    };

    Ok(ManualMovieDraft {
        title: title.to_string(),
        overview: overview.to_string(),
        release_date: release_date.to_string(),
        original_language: form
            .text("original_language")
            .map(str::to_string)
            .unwrap_or_else(default_language),
        tagline: form.text("tagline").unwrap_or_default().to_string(),
        genres,
        runtime,
        vote_average,
        trailer,
        poster,
        casts,
    })
}

pub async fn add_manual_movie(
    Extension(state): Extension<AppState>,
    AppMultipart(multipart): AppMultipart,
) -> AppResult<(StatusCode, Json<Value>)> {
    let form = FormData::from_multipart(multipart).await?;
    let draft = validate_manual_movie(&form)?;

    let backdrop_path = state
        .media
        .upload(draft.poster, "MOVIE_POSTER", MediaKind::Image)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Poster upload failed");
            AppError::Upstream("Poster upload failed.".to_string())
        })?;

    let casts = upload_cast_portraits(state.media.as_ref(), &form, draft.casts, "MOVIE_CASTS").await;

    let manual_movie = state
        .store
        .insert_manual_movie(ManualMovie {
            id: None,
            title: draft.title,
            overview: draft.overview,
            backdrop_path,
            trailer: draft.trailer,
            release_date: draft.release_date,
            original_language: draft.original_language,
            tagline: draft.tagline,
            genres: draft.genres,
            casts,
            vote_average: draft.vote_average,
            runtime: draft.runtime,
        })
        .await?;
    tracing::info!(title = %manual_movie.title, "Added manual movie");

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Manual movie added successfully.",
            "manualMovie": manual_movie,
        })),
    ))
}

pub async fn load_manual_movies(Extension(state): Extension<AppState>) -> AppResult<Json<Value>> {
    let movies = state.store.list_manual_movies().await?;
    Ok(Json(json!({ "success": true, "movies": movies })))
}

pub async fn load_manual_movie(
    Extension(state): Extension<AppState>,
    Path(id_str): Path<String>,
) -> AppResult<Json<Value>> {
    let id = parse_object_id(&id_str, "Manual movie")?;
    let movie = state
        .store
        .find_manual_movie(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Manual movie not found".to_string()))?;

    Ok(Json(json!({ "success": true, "movie": movie })))
}
