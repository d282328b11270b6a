use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, oid::ObjectId, Bson, DateTime, Document},
    options::{CountOptions, FindOneAndUpdateOptions, FindOptions, ReturnDocument},
    Client, Collection, Database,
};
use serde_json::Value;

use crate::error::AppResult;
use crate::models::{
    movie_model::{ManualMovie, SyndicatedMovie},
    reservation_model::Reservation,
    show_model::{Hall, Show},
    snack_model::{Snack, SnackUpdate},
    upcoming_model::Upcoming,
};

use super::CinemaStore;

const MOVIES: &str = "movies";
const MANUAL_MOVIES: &str = "manualmovies";
const SHOWS: &str = "shows";
const RESERVATIONS: &str = "reserves";
const UPCOMINGS: &str = "upcomings";
const SNACKS: &str = "snacks";

#[derive(Clone)]
pub struct MongoStore {
    db: Database,
}

impl MongoStore {
    pub fn new(client: &Client, database_name: &str) -> Self {
        MongoStore {
            db: client.database(database_name),
        }
    }

    fn collection<T>(&self, name: &str) -> Collection<T> {
        self.db.collection::<T>(name)
    }

    fn newest_first() -> FindOptions {
        FindOptions::builder().sort(doc! { "_id": -1 }).build()
    }

    fn return_updated() -> FindOneAndUpdateOptions {
        FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build()
    }
}

/// Builds a `$set` body from the non-null fields of an update struct.
fn set_document<T: serde::Serialize>(update: &T) -> Document {
    let json = serde_json::to_value(update).unwrap_or_else(|_| Value::Object(Default::default()));

    let mut update_doc = Document::new();
    if let Value::Object(obj) = json {
        for (key, value) in obj {
            if !value.is_null() {
                let bson_value = match Bson::try_from(value) {
                    Ok(bv) => bv,
                    Err(_) => continue,
                };
                update_doc.insert(key, bson_value);
            }
        }
    }
    update_doc
}

#[async_trait]
impl CinemaStore for MongoStore {
    async fn find_syndicated_movie(&self, id: &str) -> AppResult<Option<SyndicatedMovie>> {
        let movies = self.collection::<SyndicatedMovie>(MOVIES);
        Ok(movies.find_one(doc! { "_id": id }, None).await?)
    }

    async fn list_syndicated_movies(&self) -> AppResult<Vec<SyndicatedMovie>> {
        let movies = self.collection::<SyndicatedMovie>(MOVIES);
        let options = FindOptions::builder().sort(doc! { "release_date": -1 }).build();
        let cursor = movies.find(None, options).await?;
        Ok(cursor.try_collect().await?)
    }

    async fn insert_manual_movie(&self, mut movie: ManualMovie) -> AppResult<ManualMovie> {
        let movies = self.collection::<ManualMovie>(MANUAL_MOVIES);
        let insert_result = movies.insert_one(&movie, None).await?;
        movie.id = insert_result.inserted_id.as_object_id();
        Ok(movie)
    }

    async fn find_manual_movie(&self, id: ObjectId) -> AppResult<Option<ManualMovie>> {
        let movies = self.collection::<ManualMovie>(MANUAL_MOVIES);
        Ok(movies.find_one(doc! { "_id": id }, None).await?)
    }

    async fn list_manual_movies(&self) -> AppResult<Vec<ManualMovie>> {
        let movies = self.collection::<ManualMovie>(MANUAL_MOVIES);
        let cursor = movies.find(None, Self::newest_first()).await?;
        Ok(cursor.try_collect().await?)
    }

    async fn show_exists(&self, movie_id: &str, hall: Hall, at: DateTime) -> AppResult<bool> {
        let shows = self.collection::<Show>(SHOWS);
        let query = doc! {
            "movie": movie_id,
            "hall": hall.as_str(),
            "showDateTime": at,
        };
        let options = CountOptions::builder().limit(1).build();
        let count = shows.count_documents(query, options).await?;
        Ok(count > 0)
    }

    async fn insert_shows(&self, shows: Vec<Show>) -> AppResult<usize> {
        if shows.is_empty() {
            return Ok(0);
        }
        let collection = self.collection::<Show>(SHOWS);
        let insert_result = collection.insert_many(&shows, None).await?;
        Ok(insert_result.inserted_ids.len())
    }

    async fn list_shows_from(&self, from: DateTime, movie_id: Option<&str>) -> AppResult<Vec<Show>> {
        let shows = self.collection::<Show>(SHOWS);
        let mut query = doc! { "showDateTime": { "$gte": from } };
        if let Some(movie_id) = movie_id {
            query.insert("movie", movie_id);
        }
        let options = FindOptions::builder().sort(doc! { "showDateTime": 1 }).build();
        let cursor = shows.find(query, options).await?;
        Ok(cursor.try_collect().await?)
    }

    async fn insert_reservation(&self, mut reservation: Reservation) -> AppResult<Reservation> {
        let reservations = self.collection::<Reservation>(RESERVATIONS);
        let insert_result = reservations.insert_one(&reservation, None).await?;
        reservation.id = insert_result.inserted_id.as_object_id();
        Ok(reservation)
    }

    async fn list_reservations(&self) -> AppResult<Vec<Reservation>> {
        let reservations = self.collection::<Reservation>(RESERVATIONS);
        let cursor = reservations.find(None, Self::newest_first()).await?;
        Ok(cursor.try_collect().await?)
    }

    async fn approve_reservation(&self, id: ObjectId) -> AppResult<Option<Reservation>> {
        let reservations = self.collection::<Reservation>(RESERVATIONS);
        let updated = reservations
            .find_one_and_update(
                doc! { "_id": id },
                doc! { "$set": { "approved": true } },
                Self::return_updated(),
            )
            .await?;
        Ok(updated)
    }

    async fn delete_reservation(&self, id: ObjectId) -> AppResult<bool> {
        let reservations = self.collection::<Reservation>(RESERVATIONS);
        let delete_result = reservations.delete_one(doc! { "_id": id }, None).await?;
        Ok(delete_result.deleted_count == 1)
    }

    async fn insert_upcoming(&self, mut upcoming: Upcoming) -> AppResult<Upcoming> {
        let upcomings = self.collection::<Upcoming>(UPCOMINGS);
        let insert_result = upcomings.insert_one(&upcoming, None).await?;
        upcoming.id = insert_result.inserted_id.as_object_id();
        Ok(upcoming)
    }

    async fn list_upcoming(&self) -> AppResult<Vec<Upcoming>> {
        let upcomings = self.collection::<Upcoming>(UPCOMINGS);
        let cursor = upcomings.find(None, Self::newest_first()).await?;
        Ok(cursor.try_collect().await?)
    }

    async fn find_upcoming(&self, id: ObjectId) -> AppResult<Option<Upcoming>> {
        let upcomings = self.collection::<Upcoming>(UPCOMINGS);
        Ok(upcomings.find_one(doc! { "_id": id }, None).await?)
    }

    async fn delete_upcoming(&self, id: ObjectId) -> AppResult<bool> {
        let upcomings = self.collection::<Upcoming>(UPCOMINGS);
        let delete_result = upcomings.delete_one(doc! { "_id": id }, None).await?;
        Ok(delete_result.deleted_count == 1)
    }

    async fn insert_snack(&self, mut snack: Snack) -> AppResult<Snack> {
        let snacks = self.collection::<Snack>(SNACKS);
        let insert_result = snacks.insert_one(&snack, None).await?;
        snack.id = insert_result.inserted_id.as_object_id();
        Ok(snack)
    }

    async fn list_snacks(&self) -> AppResult<Vec<Snack>> {
        let snacks = self.collection::<Snack>(SNACKS);
        let cursor = snacks.find(None, Self::newest_first()).await?;
        Ok(cursor.try_collect().await?)
    }

    async fn find_snack(&self, id: ObjectId) -> AppResult<Option<Snack>> {
        let snacks = self.collection::<Snack>(SNACKS);
        Ok(snacks.find_one(doc! { "_id": id }, None).await?)
    }

    async fn update_snack(&self, id: ObjectId, update: &SnackUpdate) -> AppResult<Option<Snack>> {
        let snacks = self.collection::<Snack>(SNACKS);
        let update_doc = set_document(update);
        if update_doc.is_empty() {
            return Ok(snacks.find_one(doc! { "_id": id }, None).await?);
        }

        let updated = snacks
            .find_one_and_update(
                doc! { "_id": id },
                doc! { "$set": update_doc },
                Self::return_updated(),
            )
            .await?;
        Ok(updated)
    }

    async fn delete_snack(&self, id: ObjectId) -> AppResult<bool> {
        let snacks = self.collection::<Snack>(SNACKS);
        let delete_result = snacks.delete_one(doc! { "_id": id }, None).await?;
        Ok(delete_result.deleted_count == 1)
    }
}
