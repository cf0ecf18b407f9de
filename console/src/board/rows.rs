//! Per-shipment grid rows, derived on demand.
//!
//! Nothing here is stored: rows are recomputed from the shipment list and a
//! reference time whenever the board is displayed.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::Serialize;

use crate::models::{Shipment, ShipmentStop, STOP_TYPE_DELIVERY};

/// Cell content when a value is missing.
pub const PLACEHOLDER: &str = "—";

/// One line of the shipment grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoardRow {
    #[serde(rename = "Shipment ID")]
    pub shipment_id: String,
    #[serde(rename = "Load #")]
    pub load_number: String,
    #[serde(rename = "Carrier")]
    pub carrier: String,
    #[serde(rename = "Customer")]
    pub customer: String,
    #[serde(rename = "Pickup")]
    pub pickup: String,
    #[serde(rename = "Appointment")]
    pub appointment: String,
    #[serde(rename = "P/U Completed")]
    pub pickup_completed: String,
    #[serde(rename = "Deliver")]
    pub deliver: String,
    #[serde(rename = "Deliver Date")]
    pub deliver_date: String,
    #[serde(rename = "Overdue")]
    pub overdue: bool,
    #[serde(rename = "Last Known Location")]
    pub last_known_location: String,
    #[serde(rename = "ETA")]
    pub eta: String,
}

impl BoardRow {
    /// Derive the row for `shipment`, rendering times in the local zone.
    pub fn from_shipment(shipment: &Shipment, now: DateTime<Utc>) -> Self {
        Self::from_shipment_in(shipment, now, &chrono::Local)
    }

    /// Derive the row for `shipment`, rendering times in `tz`.
    pub fn from_shipment_in<Tz>(shipment: &Shipment, now: DateTime<Utc>, tz: &Tz) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: std::fmt::Display,
    {
        let pickup = pickup_stop(shipment);
        let delivery = delivery_stop(shipment);
        let deliver_date = deliver_date(shipment);

        let location = |stop: Option<&ShipmentStop>| {
            stop.and_then(|s| s.location_id.clone())
                .unwrap_or_else(|| PLACEHOLDER.to_string())
        };
        let window = |value: Option<&str>| {
            value
                .and_then(|v| format_instant_in(v, tz))
                .unwrap_or_else(|| PLACEHOLDER.to_string())
        };

        Self {
            shipment_id: shipment.id.clone(),
            load_number: load_number(shipment),
            carrier: shipment
                .carrier_name()
                .unwrap_or(PLACEHOLDER)
                .to_string(),
            customer: shipment
                .customer_name()
                .filter(|n| !n.is_empty())
                .or(shipment.customer_id.as_deref())
                .unwrap_or_default()
                .to_string(),
            pickup: location(pickup),
            appointment: window(pickup.and_then(|s| s.window_start.as_deref())),
            pickup_completed: window(pickup.and_then(|s| s.window_end.as_deref())),
            deliver: location(delivery),
            deliver_date: window(deliver_date),
            overdue: is_overdue(shipment, now),
            last_known_location: location(delivery),
            eta: window(deliver_date),
        }
    }
}

/// Rows for every shipment, in list order.
pub fn board_rows(shipments: &[Shipment], now: DateTime<Utc>) -> Vec<BoardRow> {
    shipments
        .iter()
        .map(|s| BoardRow::from_shipment(s, now))
        .collect()
}

/// The reference, or the first six characters of the ID.
pub fn load_number(shipment: &Shipment) -> String {
    match shipment.reference.as_deref() {
        Some(reference) if !reference.is_empty() => reference.to_string(),
        _ => shipment.id.chars().take(6).collect(),
    }
}

/// The stop with sequence 1.
pub fn pickup_stop(shipment: &Shipment) -> Option<&ShipmentStop> {
    shipment.stops.iter().find(|s| s.sequence == Some(1))
}

/// The first stop of type `DELIVERY`.
pub fn delivery_stop(shipment: &Shipment) -> Option<&ShipmentStop> {
    shipment
        .stops
        .iter()
        .find(|s| s.stop_type.as_deref() == Some(STOP_TYPE_DELIVERY))
}

/// Delivery window end, falling back to its start.
pub fn deliver_date(shipment: &Shipment) -> Option<&str> {
    let delivery = delivery_stop(shipment)?;
    delivery
        .window_end
        .as_deref()
        .filter(|v| !v.is_empty())
        .or_else(|| delivery.window_start.as_deref().filter(|v| !v.is_empty()))
}

/// Deliver date has passed and the shipment is not delivered.
pub fn is_overdue(shipment: &Shipment, now: DateTime<Utc>) -> bool {
    deliver_date(shipment)
        .and_then(parse_instant)
        .is_some_and(|when| when < now && !shipment.is_delivered())
}

/// Parse an API timestamp (RFC 3339, or a bare `yyyy-mm-dd` read as UTC).
pub fn parse_instant(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Render an API timestamp in the local zone, e.g. `3/1/2024, 9:00:00 AM`.
pub fn format_instant(value: &str) -> Option<String> {
    format_instant_in(value, &chrono::Local)
}

/// Render an API timestamp in `tz`; `None` if it does not parse.
pub fn format_instant_in<Tz>(value: &str, tz: &Tz) -> Option<String>
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let instant = parse_instant(value)?;
    Some(
        instant
            .with_timezone(tz)
            .format("%-m/%-d/%Y, %-I:%M:%S %p")
            .to_string(),
    )
}
