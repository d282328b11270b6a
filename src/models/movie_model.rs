use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::utils::{null_as_default, serialize_object_id};

use super::media_model::MediaRef;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Genre {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SyndicatedCast {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_path: Option<String>,
}

/// A movie from the pre-populated catalog feed, keyed by the feed's own id.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SyndicatedMovie {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub overview: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poster_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backdrop_path: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub release_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tagline: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub genres: Vec<Genre>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub casts: Vec<SyndicatedCast>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub vote_average: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub runtime: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trailer: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct CastMember {
    pub name: String,
    #[serde(rename = "castsImage", default, skip_serializing_if = "Option::is_none")]
    pub casts_image: Option<MediaRef>,
}

/// A movie entered by an administrator.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ManualMovie {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none", serialize_with = "serialize_object_id")]
    pub id: Option<ObjectId>,
    pub title: String,
    pub overview: String,
    pub backdrop_path: MediaRef,
    pub trailer: String,
    pub release_date: String,
    #[serde(default = "default_language")]
    pub original_language: String,
    #[serde(default)]
    pub tagline: String,
    pub genres: Vec<String>,
    #[serde(default)]
    pub casts: Vec<CastMember>,
    #[serde(default)]
    pub vote_average: f64,
    pub runtime: u32,
}

pub fn default_language() -> String {
    "en".to_string()
}

/// Either kind of movie a show may point at.
#[derive(Debug, Serialize, Clone)]
#[serde(tag = "source")]
pub enum CatalogMovie {
    #[serde(rename = "tmdb")]
    Syndicated(SyndicatedMovie),
    #[serde(rename = "manual")]
    Manual(ManualMovie),
}

impl CatalogMovie {
    pub fn id(&self) -> String {
        match self {
            CatalogMovie::Syndicated(movie) => movie.id.clone(),
            CatalogMovie::Manual(movie) => movie.id.map(|id| id.to_hex()).unwrap_or_default(),
        }
    }

    pub fn title(&self) -> &str {
        match self {
            CatalogMovie::Syndicated(movie) => &movie.title,
            CatalogMovie::Manual(movie) => &movie.title,
        }
    }

    pub fn source(&self) -> &'static str {
        match self {
            CatalogMovie::Syndicated(_) => "tmdb",
            CatalogMovie::Manual(_) => "manual",
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CastInput {
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::{self, doc, Bson};

    #[test]
    fn catalog_documents_tolerate_nulls() {
        let document = doc! {
            "_id": "550",
            "title": "Fight Club",
            "overview": Bson::Null,
            "release_date": Bson::Null,
            "genres": [{ "id": Bson::Null, "name": "Drama" }],
            "casts": Bson::Null,
            "vote_average": 8,
            "runtime": Bson::Null,
        };

        let movie: SyndicatedMovie = bson::from_document(document).unwrap();
        assert_eq!(movie.title, "Fight Club");
        assert_eq!(movie.runtime, 0);
        assert_eq!(movie.release_date, "");
        assert_eq!(movie.genres[0].id, 0);
        assert_eq!(movie.genres[0].name, "Drama");
        assert!(movie.casts.is_empty());
        assert_eq!(movie.vote_average, 8.0);
    }
}
