use mongodb::bson::oid::ObjectId;

use crate::error::AppResult;
use crate::models::movie_model::CatalogMovie;
use crate::store::CinemaStore;

/// Resolves a movie reference against the syndicated catalog first, then the
/// manually entered movies.
pub async fn find_movie(store: &dyn CinemaStore, movie_id: &str) -> AppResult<Option<CatalogMovie>> {
    let movie_id = movie_id.trim();
    if movie_id.is_empty() {
        return Ok(None);
    }

    if let Some(movie) = store.find_syndicated_movie(movie_id).await? {
        return Ok(Some(CatalogMovie::Syndicated(movie)));
    }

    match ObjectId::parse_str(movie_id) {
        Ok(id) => Ok(store.find_manual_movie(id).await?.map(CatalogMovie::Manual)),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::media_model::MediaRef;
    use crate::models::movie_model::{ManualMovie, SyndicatedMovie};
    use crate::store::MemoryStore;

    fn syndicated(id: &str, title: &str) -> SyndicatedMovie {
        serde_json::from_value(serde_json::json!({ "_id": id, "title": title })).unwrap()
    }

    fn manual(title: &str) -> ManualMovie {
        ManualMovie {
            id: None,
            title: title.into(),
            overview: "An overview".into(),
            backdrop_path: MediaRef {
                public_id: "MOVIE_POSTER/p".into(),
                url: "https://cdn.example/p.jpg".into(),
            },
            trailer: "https://www.youtube.com/watch?v=dQw4w9WgXcQ".into(),
            release_date: "2025-10-01".into(),
            original_language: "en".into(),
            tagline: String::new(),
            genres: vec!["Drama".into()],
            casts: vec![],
            vote_average: 0.0,
            runtime: 110,
        }
    }

    #[tokio::test]
    async fn syndicated_movies_are_found_by_feed_id() {
        let store = MemoryStore::new();
        store.seed_syndicated_movie(syndicated("550", "Fight Club")).await;

        let movie = find_movie(&store, "550").await.unwrap().unwrap();
        assert_eq!(movie.title(), "Fight Club");
        assert_eq!(movie.source(), "tmdb");
        assert_eq!(movie.id(), "550");
    }

    #[tokio::test]
    async fn manual_movies_are_the_fallback() {
        let store = MemoryStore::new();
        let saved = store.insert_manual_movie(manual("Local Cut")).await.unwrap();
        let id = saved.id.unwrap().to_hex();

        let movie = find_movie(&store, &id).await.unwrap().unwrap();
        assert_eq!(movie.source(), "manual");
        assert_eq!(movie.id(), id);
    }

    #[tokio::test]
    async fn unknown_references_resolve_to_none() {
        let store = MemoryStore::new();
        assert!(find_movie(&store, "550").await.unwrap().is_none());
        assert!(find_movie(&store, &ObjectId::new().to_hex()).await.unwrap().is_none());
        assert!(find_movie(&store, "  ").await.unwrap().is_none());
    }
}
