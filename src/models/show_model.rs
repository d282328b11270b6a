use std::fmt;
use std::str::FromStr;

use mongodb::bson::serde_helpers::serialize_bson_datetime_as_rfc3339_string;
use mongodb::bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::utils::{json_or_string, number_from_any, serialize_object_id};

use super::movie_model::CatalogMovie;

/// The cinema's screening rooms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Hall {
    C1,
    C2,
    C3,
}

impl Hall {
    pub const ALL: [Hall; 3] = [Hall::C1, Hall::C2, Hall::C3];

    pub fn as_str(&self) -> &'static str {
        match self {
            Hall::C1 => "C1",
            Hall::C2 => "C2",
            Hall::C3 => "C3",
        }
    }
}

impl fmt::Display for Hall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Hall {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Hall::ALL
            .into_iter()
            .find(|hall| hall.as_str() == s.trim())
            .ok_or_else(|| format!("Unknown hall '{}'", s))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PresentationType {
    #[default]
    #[serde(rename = "2D")]
    TwoD,
    #[serde(rename = "3D")]
    ThreeD,
}

impl FromStr for PresentationType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "2D" => Ok(PresentationType::TwoD),
            "3D" => Ok(PresentationType::ThreeD),
            other => Err(format!("Unknown presentation type '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShowPrice {
    pub regular: f64,
    pub vip: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OccupiedSeats {
    #[serde(default)]
    pub regular: Vec<String>,
    #[serde(default)]
    pub vip: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Show {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none", serialize_with = "serialize_object_id")]
    pub id: Option<ObjectId>,
    pub movie: String,
    pub hall: Hall,
    #[serde(rename = "type")]
    pub show_type: PresentationType,
    pub show_date_time: DateTime,
    pub show_price: ShowPrice,
    #[serde(default)]
    pub occupied_seats: OccupiedSeats,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShowResponse {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none", serialize_with = "serialize_object_id")]
    pub id: Option<ObjectId>,
    pub movie: String,
    pub hall: Hall,
    #[serde(rename = "type")]
    pub show_type: PresentationType,
    #[serde(serialize_with = "serialize_bson_datetime_as_rfc3339_string")]
    pub show_date_time: DateTime,
    pub show_price: ShowPrice,
    pub occupied_seats: OccupiedSeats,
}

impl From<Show> for ShowResponse {
    fn from(show: Show) -> Self {
        ShowResponse {
            id: show.id,
            movie: show.movie,
            hall: show.hall,
            show_type: show.show_type,
            show_date_time: show.show_date_time,
            show_price: show.show_price,
            occupied_seats: show.occupied_seats,
        }
    }
}

/// A show with its movie reference replaced by the movie itself, `null` when it dangles.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShowDetail {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none", serialize_with = "serialize_object_id")]
    pub id: Option<ObjectId>,
    pub movie: Option<CatalogMovie>,
    pub hall: Hall,
    #[serde(rename = "type")]
    pub show_type: PresentationType,
    #[serde(serialize_with = "serialize_bson_datetime_as_rfc3339_string")]
    pub show_date_time: DateTime,
    pub show_price: ShowPrice,
    pub occupied_seats: OccupiedSeats,
}

impl ShowDetail {
    pub fn new(show: Show, movie: Option<CatalogMovie>) -> Self {
        ShowDetail {
            id: show.id,
            movie,
            hall: show.hall,
            show_type: show.show_type,
            show_date_time: show.show_date_time,
            show_price: show.show_price,
            occupied_seats: show.occupied_seats,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ShowSlotInput {
    pub hall: Option<String>,
    pub date: Option<String>,
    pub times: Option<Value>,
}

#[derive(Debug, Deserialize)]
pub struct PriceInput {
    #[serde(default, deserialize_with = "number_from_any")]
    pub regular: Option<f64>,
    #[serde(default, deserialize_with = "number_from_any")]
    pub vip: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddShowsRequest {
    pub movie_id: Option<String>,
    #[serde(default, deserialize_with = "json_or_string")]
    pub shows_input: Option<Vec<ShowSlotInput>>,
    #[serde(default, deserialize_with = "json_or_string")]
    pub price: Option<PriceInput>,
    #[serde(rename = "type")]
    pub show_type: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddShowsResponse {
    pub success: bool,
    pub message: String,
    pub total_shows_added: usize,
    pub movie_title: String,
    pub source: String,
}
