use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::utils::{number_from_any, serialize_object_id};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Reservation {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none", serialize_with = "serialize_object_id")]
    pub id: Option<ObjectId>,
    #[serde(rename = "SenderName")]
    pub sender_name: String,
    pub email: String,
    pub phone: String,
    pub events: String,
    /// Preferred contact channel.
    #[serde(rename = "Talk")]
    pub talk: String,
    #[serde(rename = "peopleAttend")]
    pub people_attend: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(rename = "ReservedDate")]
    pub reserved_date: String,
    #[serde(rename = "eventStartTime")]
    pub event_start_time: String,
    #[serde(rename = "eventEndTime")]
    pub event_end_time: String,
    #[serde(default)]
    pub approved: bool,
}

#[derive(Debug, Deserialize, Default)]
pub struct ReservationRequest {
    #[serde(rename = "SenderName")]
    pub sender_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub events: Option<String>,
    #[serde(rename = "Talk")]
    pub talk: Option<String>,
    #[serde(rename = "peopleAttend", default, deserialize_with = "number_from_any")]
    pub people_attend: Option<f64>,
    pub message: Option<String>,
    #[serde(rename = "ReservedDate")]
    pub reserved_date: Option<String>,
    #[serde(rename = "eventStartTime")]
    pub event_start_time: Option<String>,
    #[serde(rename = "eventEndTime")]
    pub event_end_time: Option<String>,
}
