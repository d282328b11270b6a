use std::sync::Arc;

use axum::{
    extract::{DefaultBodyLimit, Extension},
    routing::{delete, get, post, put},
    Router,
};
use chrono::FixedOffset;
use tower_http::trace::TraceLayer;

pub mod catalog;
pub mod config;
pub mod controllers;
pub mod error;
pub mod form;
pub mod mailer;
pub mod media;
pub mod models;
pub mod scheduling;
pub mod store;
pub mod trailer;
pub mod utils;

use controllers::{
    home_controller, movie_controller, reservation_controller, show_controller, snack_controller,
    upcoming_controller,
};
use mailer::Notifier;
use media::MediaStore;
use store::CinemaStore;

/// Uploads (posters, trailers) may be large.
const MAX_BODY_BYTES: usize = 50 * 1024 * 1024;

/// Collaborators shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn CinemaStore>,
    pub media: Arc<dyn MediaStore>,
    pub notifier: Arc<dyn Notifier>,
    /// Offset that schedule dates and times are interpreted in.
    pub show_offset: FixedOffset,
}

pub fn app(state: AppState) -> Router {
    let shows = Router::new()
        .route("/add", post(show_controller::add_shows))
        .route("/now-playing", get(show_controller::now_playing))
        .route("/all", get(show_controller::load_upcoming_shows))
        .route("/movie/:movieId", get(show_controller::load_movie_shows))
        .route("/manual/movies/add", post(movie_controller::add_manual_movie))
        .route("/manual/movies/all", get(movie_controller::load_manual_movies))
        .route("/manual/movies/:id", get(movie_controller::load_manual_movie));

    let reservations = Router::new()
        .route("/Add", post(reservation_controller::create_reservation))
        .route("/all", get(reservation_controller::load_reservations))
        .route("/approve/:id", put(reservation_controller::approve_reservation))
        .route("/:id", delete(reservation_controller::delete_reservation));

    let upcoming = Router::new()
        .route("/add", post(upcoming_controller::add_upcoming))
        .route("/all", get(upcoming_controller::load_upcomings))
        .route("/get-upcoming/:id", get(upcoming_controller::load_upcoming))
        .route("/:id", delete(upcoming_controller::delete_upcoming));

    let snacks = Router::new()
        .route("/add", post(snack_controller::create_snack))
        .route("/all", get(snack_controller::load_snacks))
        .route(
            "/:id",
            get(snack_controller::load_snack)
                .put(snack_controller::update_snack)
                .delete(snack_controller::delete_snack),
        );

    Router::new()
        .route("/", get(home_controller::index))
        .nest("/api/show", shows)
        .nest("/api/reserve", reservations)
        .nest("/api/upcoming", upcoming)
        .nest("/api/snack", snacks)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(Extension(state))
}
