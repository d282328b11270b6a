use async_trait::async_trait;
use mongodb::bson::{oid::ObjectId, DateTime};
use tokio::sync::Mutex;

use crate::error::AppResult;
use crate::models::{
    movie_model::{ManualMovie, SyndicatedMovie},
    reservation_model::Reservation,
    show_model::{Hall, Show},
    snack_model::{Snack, SnackUpdate},
    upcoming_model::Upcoming,
};

use super::CinemaStore;

#[derive(Default)]
struct Collections {
    movies: Vec<SyndicatedMovie>,
    manual_movies: Vec<ManualMovie>,
    shows: Vec<Show>,
    reservations: Vec<Reservation>,
    upcomings: Vec<Upcoming>,
    snacks: Vec<Snack>,
}

/// Process-local store with the same observable behaviour as [`super::MongoStore`].
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Collections>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Syndicated movies arrive from the catalog feed, never through the API.
    pub async fn seed_syndicated_movie(&self, movie: SyndicatedMovie) {
        self.inner.lock().await.movies.push(movie);
    }

    pub async fn shows(&self) -> Vec<Show> {
        self.inner.lock().await.shows.clone()
    }
}

fn newest_first<T: Clone>(items: &[T]) -> Vec<T> {
    items.iter().rev().cloned().collect()
}

#[async_trait]
impl CinemaStore for MemoryStore {
    async fn find_syndicated_movie(&self, id: &str) -> AppResult<Option<SyndicatedMovie>> {
        let state = self.inner.lock().await;
        Ok(state.movies.iter().find(|m| m.id == id).cloned())
    }

    async fn list_syndicated_movies(&self) -> AppResult<Vec<SyndicatedMovie>> {
        let state = self.inner.lock().await;
        let mut movies = state.movies.clone();
        movies.sort_by(|a, b| b.release_date.cmp(&a.release_date));
        Ok(movies)
    }

    async fn insert_manual_movie(&self, mut movie: ManualMovie) -> AppResult<ManualMovie> {
        movie.id = Some(ObjectId::new());
        self.inner.lock().await.manual_movies.push(movie.clone());
        Ok(movie)
    }

    async fn find_manual_movie(&self, id: ObjectId) -> AppResult<Option<ManualMovie>> {
        let state = self.inner.lock().await;
        Ok(state.manual_movies.iter().find(|m| m.id == Some(id)).cloned())
    }

    async fn list_manual_movies(&self) -> AppResult<Vec<ManualMovie>> {
        Ok(newest_first(&self.inner.lock().await.manual_movies))
    }

    async fn show_exists(&self, movie_id: &str, hall: Hall, at: DateTime) -> AppResult<bool> {
        let state = self.inner.lock().await;
        Ok(state
            .shows
            .iter()
            .any(|s| s.movie == movie_id && s.hall == hall && s.show_date_time == at))
    }

    async fn insert_shows(&self, shows: Vec<Show>) -> AppResult<usize> {
        let mut state = self.inner.lock().await;
        let count = shows.len();
        state.shows.extend(shows.into_iter().map(|mut show| {
            show.id = Some(ObjectId::new());
            show
        }));
        Ok(count)
    }

    async fn list_shows_from(&self, from: DateTime, movie_id: Option<&str>) -> AppResult<Vec<Show>> {
        let state = self.inner.lock().await;
        let mut shows: Vec<Show> = state
            .shows
            .iter()
            .filter(|s| s.show_date_time >= from)
            .filter(|s| movie_id.map_or(true, |id| s.movie == id))
            .cloned()
            .collect();
        shows.sort_by_key(|s| s.show_date_time);
        Ok(shows)
    }

    async fn insert_reservation(&self, mut reservation: Reservation) -> AppResult<Reservation> {
        reservation.id = Some(ObjectId::new());
        self.inner.lock().await.reservations.push(reservation.clone());
        Ok(reservation)
    }

    async fn list_reservations(&self) -> AppResult<Vec<Reservation>> {
        Ok(newest_first(&self.inner.lock().await.reservations))
    }

    async fn approve_reservation(&self, id: ObjectId) -> AppResult<Option<Reservation>> {
        let mut state = self.inner.lock().await;
        Ok(state
            .reservations
            .iter_mut()
            .find(|r| r.id == Some(id))
            .map(|r| {
                r.approved = true;
                r.clone()
            }))
    }

    async fn delete_reservation(&self, id: ObjectId) -> AppResult<bool> {
        let mut state = self.inner.lock().await;
        let before = state.reservations.len();
        state.reservations.retain(|r| r.id != Some(id));
        Ok(state.reservations.len() < before)
    }

    async fn insert_upcoming(&self, mut upcoming: Upcoming) -> AppResult<Upcoming> {
        upcoming.id = Some(ObjectId::new());
        self.inner.lock().await.upcomings.push(upcoming.clone());
        Ok(upcoming)
    }

    async fn list_upcoming(&self) -> AppResult<Vec<Upcoming>> {
        Ok(newest_first(&self.inner.lock().await.upcomings))
    }

    async fn find_upcoming(&self, id: ObjectId) -> AppResult<Option<Upcoming>> {
        let state = self.inner.lock().await;
        Ok(state.upcomings.iter().find(|u| u.id == Some(id)).cloned())
    }

    async fn delete_upcoming(&self, id: ObjectId) -> AppResult<bool> {
        let mut state = self.inner.lock().await;
        let before = state.upcomings.len();
        state.upcomings.retain(|u| u.id != Some(id));
        Ok(state.upcomings.len() < before)
    }

    async fn insert_snack(&self, mut snack: Snack) -> AppResult<Snack> {
        snack.id = Some(ObjectId::new());
        self.inner.lock().await.snacks.push(snack.clone());
        Ok(snack)
    }

    async fn list_snacks(&self) -> AppResult<Vec<Snack>> {
        Ok(newest_first(&self.inner.lock().await.snacks))
    }

    async fn find_snack(&self, id: ObjectId) -> AppResult<Option<Snack>> {
        let state = self.inner.lock().await;
        Ok(state.snacks.iter().find(|s| s.id == Some(id)).cloned())
    }

    async fn update_snack(&self, id: ObjectId, update: &SnackUpdate) -> AppResult<Option<Snack>> {
        let mut state = self.inner.lock().await;
        Ok(state.snacks.iter_mut().find(|s| s.id == Some(id)).map(|snack| {
            update.apply_to(snack);
            snack.clone()
        }))
    }

    async fn delete_snack(&self, id: ObjectId) -> AppResult<bool> {
        let mut state = self.inner.lock().await;
        let before = state.snacks.len();
        state.snacks.retain(|s| s.id != Some(id));
        Ok(state.snacks.len() < before)
    }
}
