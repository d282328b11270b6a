//! Persistence for every collection the API touches.
//!
//! Uniqueness of shows is enforced by callers through [`CinemaStore::show_exists`]
//! immediately before [`CinemaStore::insert_shows`]; the two calls are not atomic.

pub mod memory;
pub mod mongo;

use async_trait::async_trait;
use mongodb::bson::{oid::ObjectId, DateTime};

use crate::error::AppResult;
use crate::models::{
    movie_model::{ManualMovie, SyndicatedMovie},
    reservation_model::Reservation,
    show_model::{Hall, Show},
    snack_model::{Snack, SnackUpdate},
    upcoming_model::Upcoming,
};

pub use memory::MemoryStore;
pub use mongo::MongoStore;

/// Listing methods return newest records first unless stated otherwise.
#[async_trait]
pub trait CinemaStore: Send + Sync {
    async fn find_syndicated_movie(&self, id: &str) -> AppResult<Option<SyndicatedMovie>>;

    async fn list_syndicated_movies(&self) -> AppResult<Vec<SyndicatedMovie>>;

    async fn insert_manual_movie(&self, movie: ManualMovie) -> AppResult<ManualMovie>;

    async fn find_manual_movie(&self, id: ObjectId) -> AppResult<Option<ManualMovie>>;

    async fn list_manual_movies(&self) -> AppResult<Vec<ManualMovie>>;

    /// Exact match on (movie, hall, instant).
    async fn show_exists(&self, movie_id: &str, hall: Hall, at: DateTime) -> AppResult<bool>;

    /// Inserts all shows in one operation and returns how many were written.
    async fn insert_shows(&self, shows: Vec<Show>) -> AppResult<usize>;

    /// Shows at or after `from`, earliest first, optionally for one movie.
    async fn list_shows_from(&self, from: DateTime, movie_id: Option<&str>) -> AppResult<Vec<Show>>;

    async fn insert_reservation(&self, reservation: Reservation) -> AppResult<Reservation>;

    async fn list_reservations(&self) -> AppResult<Vec<Reservation>>;

    async fn approve_reservation(&self, id: ObjectId) -> AppResult<Option<Reservation>>;

    async fn delete_reservation(&self, id: ObjectId) -> AppResult<bool>;

    async fn insert_upcoming(&self, upcoming: Upcoming) -> AppResult<Upcoming>;

    async fn list_upcoming(&self) -> AppResult<Vec<Upcoming>>;

    async fn find_upcoming(&self, id: ObjectId) -> AppResult<Option<Upcoming>>;

    async fn delete_upcoming(&self, id: ObjectId) -> AppResult<bool>;

    async fn insert_snack(&self, snack: Snack) -> AppResult<Snack>;

    async fn list_snacks(&self) -> AppResult<Vec<Snack>>;

    async fn find_snack(&self, id: ObjectId) -> AppResult<Option<Snack>>;

    async fn update_snack(&self, id: ObjectId, update: &SnackUpdate) -> AppResult<Option<Snack>>;

    async fn delete_snack(&self, id: ObjectId) -> AppResult<bool>;
}
