//! Expansion of a hall → date → times selection into individual shows.
//!
//! Duplicate detection is a read before the bulk insert. Two overlapping
//! requests can both pass it and insert the same slot twice.

use std::collections::HashSet;

use chrono::{FixedOffset, NaiveDate, NaiveTime, TimeZone, Utc};
use mongodb::bson::DateTime;

use crate::error::{AppError, AppResult};
use crate::models::show_model::{
    Hall, OccupiedSeats, PresentationType, Show, ShowPrice, ShowSlotInput,
};
use crate::store::CinemaStore;
use crate::utils::non_empty;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShowSlot {
    pub hall: Hall,
    pub date: NaiveDate,
    pub time: NaiveTime,
}

pub fn parse_time_of_day(raw: &str) -> Option<NaiveTime> {
    let raw = raw.trim();
    NaiveTime::parse_from_str(raw, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
        .ok()
}

/// Flattens the selection hall-major, then by date, keeping the submitted
/// time order. Entries without a hall, a date or a list of times are skipped.
pub fn flatten_selection(input: &[ShowSlotInput]) -> AppResult<Vec<ShowSlot>> {
    let mut slots = Vec::new();

    for entry in input {
        let (Some(hall), Some(date), Some(times)) = (
            non_empty(&entry.hall),
            non_empty(&entry.date),
            entry.times.as_ref().and_then(|t| t.as_array()),
        ) else {
            continue;
        };

        let hall: Hall = hall.parse().map_err(AppError::Validation)?;
        let date = NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .map_err(|_| AppError::Validation(format!("Invalid show date '{}'", date)))?;

        for time in times {
            let raw = time
                .as_str()
                .ok_or_else(|| AppError::Validation(format!("Invalid show time {}", time)))?;
            let time = parse_time_of_day(raw)
                .ok_or_else(|| AppError::Validation(format!("Invalid show time '{}'", raw)))?;
            slots.push(ShowSlot { hall, date, time });
        }
    }

    Ok(slots)
}

/// The instant a slot starts, reading its wall-clock time in `offset`.
pub fn show_instant(slot: &ShowSlot, offset: FixedOffset) -> AppResult<DateTime> {
    let local = slot.date.and_time(slot.time);
    let at = offset
        .from_local_datetime(&local)
        .single()
        .ok_or_else(|| AppError::Validation(format!("Invalid show time {}", local)))?;
    Ok(DateTime::from_chrono(at.with_timezone(&Utc)))
}

/// Builds the shows that do not exist yet for `movie_id`. Slots that repeat
/// within the same selection are only kept once.
pub async fn plan_new_shows(
    store: &dyn CinemaStore,
    movie_id: &str,
    show_type: PresentationType,
    price: ShowPrice,
    slots: &[ShowSlot],
    offset: FixedOffset,
) -> AppResult<Vec<Show>> {
    let mut seen = HashSet::new();
    let mut shows = Vec::new();

    for slot in slots {
        let at = show_instant(slot, offset)?;
        if !seen.insert((slot.hall, at)) {
            continue;
        }
        if store.show_exists(movie_id, slot.hall, at).await? {
            tracing::debug!(movie_id, hall = %slot.hall, at = %at, "Skipping existing show");
            continue;
        }

        shows.push(Show {
            id: None,
            movie: movie_id.to_string(),
            hall: slot.hall,
            show_type,
            show_date_time: at,
            show_price: price,
            occupied_seats: OccupiedSeats::default(),
        });
    }

    Ok(shows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use serde_json::json;

    fn slot_input(hall: &str, date: &str, times: serde_json::Value) -> ShowSlotInput {
        serde_json::from_value(json!({ "hall": hall, "date": date, "times": times })).unwrap()
    }

    const PRICE: ShowPrice = ShowPrice {
        regular: 150.0,
        vip: 250.0,
    };

    #[test]
    fn flattening_keeps_hall_date_and_time_order() {
        let input = vec![
            slot_input("C2", "2025-12-21", json!(["21:00", "18:00"])),
            slot_input("C1", "2025-12-20", json!(["10:30"])),
        ];

        let slots = flatten_selection(&input).unwrap();

        let rendered: Vec<String> = slots
            .iter()
            .map(|s| format!("{} {} {}", s.hall, s.date, s.time.format("%H:%M")))
            .collect();
        assert_eq!(
            rendered,
            vec![
                "C2 2025-12-21 21:00",
                "C2 2025-12-21 18:00",
                "C1 2025-12-20 10:30",
            ]
        );
    }

    #[test]
    fn incomplete_entries_are_skipped() {
        let input: Vec<ShowSlotInput> = serde_json::from_value(json!([
            { "hall": "C1", "date": "2025-12-20" },
            { "hall": "C1", "times": ["18:00"] },
            { "date": "2025-12-20", "times": ["18:00"] },
            { "hall": "C1", "date": "2025-12-20", "times": "18:00" },
            { "hall": "C3", "date": "2025-12-20", "times": ["18:00:00"] }
        ]))
        .unwrap();

        let slots = flatten_selection(&input).unwrap();
        assert_eq!(slots.len(), 1);
        assert_eq!(slots[0].hall, Hall::C3);
    }

    #[test]
    fn unknown_halls_and_bad_times_are_rejected() {
        let bad_hall = vec![slot_input("D9", "2025-12-20", json!(["18:00"]))];
        assert!(matches!(flatten_selection(&bad_hall), Err(AppError::Validation(_))));

        let bad_time = vec![slot_input("C1", "2025-12-20", json!(["25:00"]))];
        assert!(matches!(flatten_selection(&bad_time), Err(AppError::Validation(_))));

        let bad_date = vec![slot_input("C1", "20/12/2025", json!(["18:00"]))];
        assert!(matches!(flatten_selection(&bad_date), Err(AppError::Validation(_))));
    }

    #[test]
    fn instants_use_the_configured_offset() {
        let slot = ShowSlot {
            hall: Hall::C1,
            date: NaiveDate::from_ymd_opt(2025, 12, 20).unwrap(),
            time: NaiveTime::from_hms_opt(18, 0, 0).unwrap(),
        };

        let utc = show_instant(&slot, FixedOffset::east_opt(0).unwrap()).unwrap();
        let plus_three = show_instant(&slot, FixedOffset::east_opt(3 * 3600).unwrap()).unwrap();

        assert_eq!(utc.try_to_rfc3339_string().unwrap(), "2025-12-20T18:00:00Z");
        assert_eq!(plus_three.try_to_rfc3339_string().unwrap(), "2025-12-20T15:00:00Z");
    }

    #[tokio::test]
    async fn existing_and_repeated_slots_are_not_planned() {
        let store = MemoryStore::new();
        let utc = FixedOffset::east_opt(0).unwrap();
        let input = vec![slot_input("C1", "2025-12-20", json!(["18:00", "21:00", "18:00"]))];
        let slots = flatten_selection(&input).unwrap();

        let first = plan_new_shows(&store, "550", PresentationType::TwoD, PRICE, &slots, utc)
            .await
            .unwrap();
        assert_eq!(first.len(), 2);
        assert!(first.iter().all(|s| s.occupied_seats == OccupiedSeats::default()));

        store.insert_shows(first).await.unwrap();

        let second = plan_new_shows(&store, "550", PresentationType::TwoD, PRICE, &slots, utc)
            .await
            .unwrap();
        assert!(second.is_empty());

        let other_movie = plan_new_shows(&store, "551", PresentationType::ThreeD, PRICE, &slots, utc)
            .await
            .unwrap();
        assert_eq!(other_movie.len(), 2);
    }
}
