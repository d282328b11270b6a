use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::Json,
};
use serde_json::{json, Value};

use crate::error::{AppError, AppJson, AppResult};
use crate::models::reservation_model::{Reservation, ReservationRequest};
use crate::utils::{non_empty, parse_object_id};
use crate::AppState;

/// Earliest start, in minutes since midnight.
pub const OPENING_MINUTES: u32 = 8 * 60;
/// Latest end, in minutes since midnight.
pub const CLOSING_MINUTES: u32 = 22 * 60;

fn minutes_since_midnight(raw: &str) -> Option<u32> {
    let (hours, minutes) = raw.trim().split_once(':')?;
    if hours.is_empty() || hours.len() > 2 || minutes.len() != 2 {
        return None;
    }
    let hours: u32 = hours.parse().ok()?;
    let minutes: u32 = minutes.parse().ok()?;
    (hours < 24 && minutes < 60).then_some(hours * 60 + minutes)
}

/// Checks a start/end pair against the hall's opening hours.
pub fn validate_time_window(start: &str, end: &str) -> AppResult<()> {
    let (Some(start), Some(end)) = (minutes_since_midnight(start), minutes_since_midnight(end)) else {
        return Err(AppError::Validation("Times must use the HH:MM format".to_string()));
    };

    let in_hours = |m: u32| (OPENING_MINUTES..=CLOSING_MINUTES).contains(&m);
    if !in_hours(start) || !in_hours(end) {
        return Err(AppError::Validation(
            "Reservation time must be between 08:00 and 22:00".to_string(),
        ));
    }

    if end <= start {
        return Err(AppError::Validation("End time must be after start time".to_string()));
    }

    Ok(())
}

/// Turns a submission into an unapproved reservation, or says which rule it broke.
pub fn validate_reservation(request: ReservationRequest) -> AppResult<Reservation> {
    let missing = || AppError::Validation("All required fields must be filled".to_string());

    let sender_name = non_empty(&request.sender_name).ok_or_else(missing)?;
    let email = non_empty(&request.email).ok_or_else(missing)?;
    let phone = non_empty(&request.phone).ok_or_else(missing)?;
    let events = non_empty(&request.events).ok_or_else(missing)?;
    let talk = non_empty(&request.talk).ok_or_else(missing)?;
    let reserved_date = non_empty(&request.reserved_date).ok_or_else(missing)?;
    let start = non_empty(&request.event_start_time).ok_or_else(missing)?;
    let end = non_empty(&request.event_end_time).ok_or_else(missing)?;
    let people_attend = request.people_attend.ok_or_else(missing)?;

    if people_attend < 1.0 || people_attend.fract() != 0.0 || people_attend > u32::MAX as f64 {
        return Err(AppError::Validation(
            "peopleAttend must be a positive whole number".to_string(),
        ));
    }

    validate_time_window(start, end)?;

    Ok(Reservation {
        id: None,
        sender_name: sender_name.to_string(),
        email: email.to_string(),
        phone: phone.to_string(),
        events: events.to_string(),
        talk: talk.to_string(),
        people_attend: people_attend as u32,
        message: non_empty(&request.message).map(str::to_string),
        reserved_date: reserved_date.to_string(),
        event_start_time: start.to_string(),
        event_end_time: end.to_string(),
        approved: false,
    })
}

pub async fn create_reservation(
    Extension(state): Extension<AppState>,
    AppJson(request): AppJson<ReservationRequest>,
) -> AppResult<(StatusCode, Json<Value>)> {
    let reservation = validate_reservation(request)?;
    let reservation = state.store.insert_reservation(reservation).await?;

    // The record stays saved when the notice fails.
    state.notifier.reservation_created(&reservation).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Reservation created and email sent successfully.",
            "data": reservation,
        })),
    ))
}

pub async fn load_reservations(Extension(state): Extension<AppState>) -> AppResult<Json<Value>> {
    let reservations = state.store.list_reservations().await?;
    Ok(Json(json!({
        "success": true,
        "count": reservations.len(),
        "data": reservations,
    })))
}

pub async fn approve_reservation(
    Extension(state): Extension<AppState>,
    Path(id_str): Path<String>,
) -> AppResult<Json<Value>> {
    let id = parse_object_id(&id_str, "Reservation")?;
    let reservation = state
        .store
        .approve_reservation(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Reservation not found".to_string()))?;

    Ok(Json(json!({
        "success": true,
        "message": "Reservation approved successfully",
        "data": reservation,
    })))
}

pub async fn delete_reservation(
    Extension(state): Extension<AppState>,
    Path(id_str): Path<String>,
) -> AppResult<Json<Value>> {
    let id = parse_object_id(&id_str, "Reservation")?;
    if !state.store.delete_reservation(id).await? {
        return Err(AppError::NotFound("Reservation not found".to_string()));
    }

    Ok(Json(json!({
        "success": true,
        "message": "Reservation deleted successfully",
    })))
}
