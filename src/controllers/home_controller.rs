use axum::response::Json;
use serde_json::{json, Value};

pub async fn index() -> Json<Value> {
    Json(json!({
        "success": true,
        "message": "Cinema booking API is running",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
