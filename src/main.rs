use std::sync::Arc;

use anyhow::Context;
use axum::http::{header, HeaderValue, Method};
use mongodb::{bson::doc, options::ClientOptions, Client};
use shuttle_secrets::{SecretStore, Secrets};
use tower_http::cors::CorsLayer;

use cinema_booking_api::{
    app, config::AppConfig, mailer::SmtpNotifier, media::CloudinaryStore, store::MongoStore,
    AppState,
};

#[shuttle_runtime::main]
async fn main(#[Secrets] secret_store: SecretStore) -> shuttle_axum::ShuttleAxum {
    // secrets come from `Secrets.toml`
    let config = AppConfig::from_lookup(|key| secret_store.get(key))?;

    let client_options = ClientOptions::parse(&config.mongodb_uri)
        .await
        .context("Failed to parse MONGODB_URI")?;
    let client = Client::with_options(client_options).context("Failed to initialize MongoDB client")?;

    // Ping the server to see if you can connect to the cluster
    client
        .database(&config.database_name)
        .run_command(doc! {"ping": 1}, None)
        .await
        .context("Failed to connect to MongoDB")?;
    tracing::info!(database = %config.database_name, "Connected to MongoDB");

    let allowed_origin = config
        .app_url
        .parse::<HeaderValue>()
        .context("APP_URL is not a valid origin")?;

    let state = AppState {
        store: Arc::new(MongoStore::new(&client, &config.database_name)),
        media: Arc::new(CloudinaryStore::new(config.cloudinary.clone()).context("Failed to build media client")?),
        notifier: Arc::new(SmtpNotifier::new(config.email.clone()).context("Failed to build mailer")?),
        show_offset: config.show_offset,
    };

    let app = app(state).layer(
        CorsLayer::new()
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::PATCH,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_origin(allowed_origin)
            .allow_headers([header::CONTENT_TYPE]),
    );

    Ok(app.into())
}
