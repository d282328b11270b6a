use std::collections::HashMap;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::Json,
};
use mongodb::bson::DateTime;
use serde_json::{json, Value};

use crate::catalog::find_movie;
use crate::error::{AppError, AppJson, AppResult};
use crate::models::movie_model::CatalogMovie;
use crate::models::show_model::{
    AddShowsRequest, AddShowsResponse, PresentationType, Show, ShowDetail, ShowPrice, ShowResponse,
};
use crate::scheduling::{flatten_selection, plan_new_shows};
use crate::utils::non_empty;
use crate::AppState;

pub async fn add_shows(
    Extension(state): Extension<AppState>,
    AppJson(request): AppJson<AddShowsRequest>,
) -> AppResult<(StatusCode, Json<AddShowsResponse>)> {
    let (Some(movie_id), Some(shows_input), Some(price)) =
        (non_empty(&request.movie_id), request.shows_input.as_ref(), request.price.as_ref())
    else {
        return Err(AppError::Validation(
            "Missing required fields (movieId, showsInput, price).".to_string(),
        ));
    };

    let price = match (price.regular, price.vip) {
        (Some(regular), Some(vip)) if regular >= 0.0 && vip >= 0.0 => ShowPrice { regular, vip },
        _ => {
            return Err(AppError::Validation(
                "Show price needs non-negative regular and vip amounts.".to_string(),
            ))
        }
    };

    let show_type = match non_empty(&request.show_type) {
        Some(raw) => raw.parse::<PresentationType>().map_err(AppError::Validation)?,
        None => PresentationType::default(),
    };

    let movie = find_movie(state.store.as_ref(), movie_id).await?.ok_or_else(|| {
        AppError::NotFound("Movie not found in either Movie or ManualMovie collection.".to_string())
    })?;

    let slots = flatten_selection(shows_input)?;
    let shows = plan_new_shows(
        state.store.as_ref(),
        &movie.id(),
        show_type,
        price,
        &slots,
        state.show_offset,
    )
    .await?;

    if shows.is_empty() {
        return Err(AppError::Validation(
            "No new shows to add (duplicates skipped).".to_string(),
        ));
    }

    let total_shows_added = state.store.insert_shows(shows).await?;
    tracing::info!(
        movie_id = %movie.id(),
        requested = slots.len(),
        added = total_shows_added,
        "Scheduled shows"
    );

    Ok((
        StatusCode::CREATED,
        Json(AddShowsResponse {
            success: true,
            message: "Shows added successfully.".to_string(),
            total_shows_added,
            movie_title: movie.title().to_string(),
            source: movie.source().to_string(),
        }),
    ))
}

pub async fn now_playing(Extension(state): Extension<AppState>) -> AppResult<Json<Value>> {
    let movies = state.store.list_syndicated_movies().await?;
    Ok(Json(json!({ "success": true, "movies": movies })))
}

/// Resolves each show's movie, looking every distinct reference up once.
async fn with_movies(state: &AppState, shows: Vec<Show>) -> AppResult<Vec<ShowDetail>> {
    let mut movies: HashMap<String, Option<CatalogMovie>> = HashMap::new();
    let mut details = Vec::with_capacity(shows.len());

    for show in shows {
        if !movies.contains_key(&show.movie) {
            let movie = find_movie(state.store.as_ref(), &show.movie).await?;
            movies.insert(show.movie.clone(), movie);
        }
        let movie = movies.get(&show.movie).cloned().flatten();
        details.push(ShowDetail::new(show, movie));
    }

    Ok(details)
}

pub async fn load_upcoming_shows(Extension(state): Extension<AppState>) -> AppResult<Json<Value>> {
    let shows = state.store.list_shows_from(DateTime::now(), None).await?;
    let shows = with_movies(&state, shows).await?;
    Ok(Json(json!({ "success": true, "shows": shows })))
}

pub async fn load_movie_shows(
    Extension(state): Extension<AppState>,
    Path(movie_id): Path<String>,
) -> AppResult<Json<Value>> {
    let shows = state
        .store
        .list_shows_from(DateTime::now(), Some(movie_id.trim()))
        .await?;
    let shows: Vec<_> = shows.into_iter().map(ShowResponse::from).collect();
    Ok(Json(json!({ "success": true, "shows": shows })))
}
