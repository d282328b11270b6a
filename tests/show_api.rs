mod common;

use axum::http::{Method, StatusCode};
use serde_json::{json, Value};

use cinema_booking_api::models::movie_model::SyndicatedMovie;
use common::{build_app, TestApp};

async fn seed_movie(app: &TestApp, id: &str, title: &str) {
    let movie: SyndicatedMovie = serde_json::from_value(json!({ "_id": id, "title": title })).unwrap();
    app.store.seed_syndicated_movie(movie).await;
}

fn schedule(movie_id: &str, date: &str, times: &[&str]) -> Value {
    json!({
        "movieId": movie_id,
        "showsInput": [{ "hall": "C1", "date": date, "times": times }],
        "price": { "regular": 8, "vip": "15" },
    })
}

#[tokio::test]
async fn adds_each_selected_time_once() {
    let app = build_app();
    seed_movie(&app, "550", "Fight Club").await;

    let (status, body) = app
        .json(Method::POST, "/api/show/add", schedule("550", "2025-12-20", &["18:00", "21:00"]))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["totalShowsAdded"], 2);
    assert_eq!(body["movieTitle"], "Fight Club");
    assert_eq!(body["source"], "tmdb");

    let (status, body) = app
        .json(Method::POST, "/api/show/add", schedule("550", "2025-12-20", &["18:00", "21:00"]))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "No new shows to add (duplicates skipped).");

    let shows = app.store.shows().await;
    assert_eq!(shows.len(), 2);
    assert!(shows.iter().all(|s| s.occupied_seats.regular.is_empty() && s.occupied_seats.vip.is_empty()));
}

#[tokio::test]
async fn partially_duplicated_selection_adds_only_new_slots() {
    let app = build_app();
    seed_movie(&app, "550", "Fight Club").await;

    app.json(Method::POST, "/api/show/add", schedule("550", "2025-12-20", &["18:00"]))
        .await;
    let (status, body) = app
        .json(
            Method::POST,
            "/api/show/add",
            schedule("550", "2025-12-20", &["18:00", "21:00", "21:00"]),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["totalShowsAdded"], 1);
    assert_eq!(app.store.shows().await.len(), 2);
}

#[tokio::test]
async fn unknown_movie_is_not_found() {
    let app = build_app();
    let (status, body) = app
        .json(Method::POST, "/api/show/add", schedule("999", "2025-12-20", &["18:00"]))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        body["message"],
        "Movie not found in either Movie or ManualMovie collection."
    );
}

#[tokio::test]
async fn missing_fields_are_rejected() {
    let app = build_app();
    seed_movie(&app, "550", "Fight Club").await;

    let (status, body) = app
        .json(Method::POST, "/api/show/add", json!({ "movieId": "550", "price": { "regular": 8, "vip": 15 } }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Missing required fields (movieId, showsInput, price).");
}

#[tokio::test]
async fn show_selection_may_arrive_as_json_text() {
    let app = build_app();
    seed_movie(&app, "550", "Fight Club").await;

    let request = json!({
        "movieId": "550",
        "showsInput": r#"[{"hall":"C2","date":"2030-01-05","times":["10:00"]}]"#,
        "price": r#"{"regular":"9.5","vip":"20"}"#,
        "type": "3D",
    });
    let (status, body) = app.json(Method::POST, "/api/show/add", request).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["totalShowsAdded"], 1);
}

#[tokio::test]
async fn unknown_halls_are_rejected() {
    let app = build_app();
    seed_movie(&app, "550", "Fight Club").await;

    let request = json!({
        "movieId": "550",
        "showsInput": [{ "hall": "Z9", "date": "2030-01-05", "times": ["10:00"] }],
        "price": { "regular": 8, "vip": 15 },
    });
    let (status, _) = app.json(Method::POST, "/api/show/add", request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(app.store.shows().await.is_empty());
}

#[tokio::test]
async fn future_shows_are_listed_with_their_movie() {
    let app = build_app();
    seed_movie(&app, "550", "Fight Club").await;
    app.json(Method::POST, "/api/show/add", schedule("550", "2020-01-01", &["18:00"]))
        .await;
    app.json(Method::POST, "/api/show/add", schedule("550", "2030-01-01", &["21:00", "18:00"]))
        .await;

    let (status, body) = app.empty(Method::GET, "/api/show/all").await;
    assert_eq!(status, StatusCode::OK);
    let shows = body["shows"].as_array().unwrap();
    assert_eq!(shows.len(), 2);
    assert!(shows[0]["showDateTime"]
        .as_str()
        .unwrap()
        .starts_with("2030-01-01T18:00:00"));
    assert_eq!(shows[0]["movie"]["title"], "Fight Club");

    let (status, body) = app.empty(Method::GET, "/api/show/movie/550").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["shows"].as_array().unwrap().len(), 2);

    let (_, body) = app.empty(Method::GET, "/api/show/now-playing").await;
    assert_eq!(body["movies"][0]["title"], "Fight Club");
}
