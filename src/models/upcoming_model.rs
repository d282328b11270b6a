use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::utils::serialize_object_id;

use super::media_model::MediaRef;
use super::movie_model::CastMember;

/// A trailer is either a link to a video host or a video we uploaded ourselves.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum Trailer {
    Upload(MediaRef),
    Link(String),
}

/// Promotion for a movie that has no shows yet.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Upcoming {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none", serialize_with = "serialize_object_id")]
    pub id: Option<ObjectId>,
    pub title: String,
    pub description: String,
    /// Public release date.
    pub release_date: String,
    /// When this cinema intends to screen it.
    pub come_date: String,
    pub language: String,
    pub runtime: u32,
    pub genres: Vec<String>,
    pub backdrop_path: MediaRef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trailer: Option<Trailer>,
    #[serde(default)]
    pub casts: Vec<CastMember>,
}

impl Upcoming {
    pub fn trailer_link(&self) -> Option<&str> {
        match &self.trailer {
            Some(Trailer::Link(link)) => Some(link),
            _ => None,
        }
    }
}
