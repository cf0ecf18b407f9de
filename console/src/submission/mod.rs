//! Draft validation and transformation into a create request.
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌──────────────────────┐
//! │  LoadDraft  │────▶│  validate   │────▶│ ShipmentCreateRequest│
//! │ (+ stops)   │     │ (1st error) │     │  (sequence, notes)   │
//! └─────────────┘     └─────────────┘     └──────────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use loadboard::{build_request, LoadDraft};
//!
//! let mut draft = LoadDraft::new();
//! draft.customer_id = "cust-1".into();
//! // ... fill in location IDs ...
//! let request = build_request(&draft)?;
//! ```

use chrono::{Duration, LocalResult, NaiveDateTime, Offset, SecondsFormat, TimeZone, Utc};

use crate::draft::{LoadDraft, StopRow, StopType};
use crate::error::ValidationError;
use crate::models::{CreateStop, ShipmentCreateRequest, StopKind};

/// Separator between note fragments.
pub const NOTES_SEPARATOR: &str = " | ";

/// Check a draft; the first failing rule wins.
pub fn validate(draft: &LoadDraft) -> Result<(), ValidationError> {
    if draft.customer_id.is_empty() {
        return Err(ValidationError::MissingCustomer);
    }

    let stops = draft.stops();
    let has_load = stops.iter().any(|s| s.stop_type == StopType::Load);
    let has_unload = stops.iter().any(|s| s.stop_type == StopType::Unload);
    if !has_load || !has_unload {
        return Err(ValidationError::MissingStopCoverage);
    }

    if stops.iter().any(|s| s.location_id.is_empty()) {
        return Err(ValidationError::MissingLocationId);
    }

    Ok(())
}

/// Validate and build the request, resolving stop times in the local zone.
pub fn build_request(draft: &LoadDraft) -> Result<ShipmentCreateRequest, ValidationError> {
    build_request_in(draft, &chrono::Local)
}

/// Validate and build the request, resolving stop times in `tz`.
pub fn build_request_in<Tz: TimeZone>(
    draft: &LoadDraft,
    tz: &Tz,
) -> Result<ShipmentCreateRequest, ValidationError> {
    validate(draft)?;

    let stops = draft
        .stops()
        .iter()
        .enumerate()
        .map(|(i, stop)| CreateStop {
            sequence: i as u32 + 1,
            kind: stop_kind(stop.stop_type),
            location_id: stop.location_id.clone(),
            window_start: window_start_in(&stop.date, &stop.time, tz),
            notes: stop_notes(stop, draft),
        })
        .collect();

    Ok(ShipmentCreateRequest {
        customer_id: draft.customer_id.clone(),
        reference: non_empty(&draft.load_number).map(str::to_string),
        stops,
    })
}

/// Map a draft stop type to the API's stop kind.
pub fn stop_kind(stop_type: StopType) -> StopKind {
    match stop_type {
        StopType::Load => StopKind::Pickup,
        StopType::Unload => StopKind::Delivery,
    }
}

/// Combine a `yyyy-mm-dd` date and optional `hh:mm` time into an ISO-8601
/// UTC instant, reading them as local time.
pub fn window_start(date: &str, time: &str) -> Option<String> {
    window_start_in(date, time, &chrono::Local)
}

/// Like [`window_start`], reading the date and time in `tz`.
///
/// Returns `None` for an empty date or an unparseable combination. Ambiguous
/// times take the earlier instant. A time skipped by a DST transition is read
/// with the offset in force before the transition, so it lands the length of
/// the gap later on the wall clock.
pub fn window_start_in<Tz: TimeZone>(date: &str, time: &str, tz: &Tz) -> Option<String> {
    if date.is_empty() {
        return None;
    }
    let time = if time.is_empty() { "00:00" } else { time };
    let combined = format!("{}T{}:00", date, time);
    let naive = NaiveDateTime::parse_from_str(&combined, "%Y-%m-%dT%H:%M:%S").ok()?;

    let instant = match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => dt.with_timezone(&Utc),
        LocalResult::Ambiguous(earliest, _) => earliest.with_timezone(&Utc),
        LocalResult::None => {
            // A day back, read as UTC, is before the transition in any zone.
            let before = tz.offset_from_utc_datetime(&(naive - Duration::days(1))).fix();
            let utc = naive - Duration::seconds(i64::from(before.local_minus_utc()));
            Utc.from_utc_datetime(&utc)
        }
    };

    Some(instant.to_rfc3339_opts(SecondsFormat::Millis, true))
}

/// Notes for one stop.
///
/// PO, BOL, commodity and weight come from the load header, so they repeat
/// on every stop.
pub fn stop_notes(stop: &StopRow, draft: &LoadDraft) -> Option<String> {
    let weight = non_empty(&draft.weight_lbs).map(|w| match non_empty(&draft.qty_unit) {
        Some(unit) => format!("Weight:{} {}", w, unit),
        None => format!("Weight:{}", w),
    });

    let fragments: Vec<String> = [
        non_empty(&stop.stop_name).map(|v| format!("Stop:{}", v)),
        non_empty(&stop.city).map(|v| format!("City:{}", v)),
        non_empty(stop.qualifier.as_str()).map(|v| format!("Qual:{}", v)),
        non_empty(&draft.po_number).map(|v| format!("PO:{}", v)),
        non_empty(&draft.bol).map(|v| format!("BOL:{}", v)),
        non_empty(&draft.commodity).map(|v| format!("Commodity:{}", v)),
        weight,
    ]
    .into_iter()
    .flatten()
    .collect();

    if fragments.is_empty() {
        None
    } else {
        Some(fragments.join(NOTES_SEPARATOR))
    }
}

fn non_empty(value: &str) -> Option<&str> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}
