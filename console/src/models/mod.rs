//! Wire models shared with the shipments API.
//!
//! - [`Shipment`] - Server-owned shipment record (read only)
//! - [`ShipmentStop`] - Stop within a listed shipment
//! - [`ShipmentCreateRequest`] - Body of `POST /api/shipments`
//! - [`CreateStop`] - Stop within a create request
//! - [`StopKind`] - `PICKUP` / `DELIVERY`

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Shipment status meaning the freight has arrived.
pub const STATUS_DELIVERED: &str = "DELIVERED";

/// Stop type value the API uses for deliveries.
pub const STOP_TYPE_DELIVERY: &str = "DELIVERY";

// =============================================================================
// Listed Shipments
// =============================================================================

/// A shipment as returned by `GET /api/shipments`.
///
/// Owned by the remote system and never constructed locally except in tests.
/// Fields the console does not read are kept in `extra` so the record can be
/// echoed back unchanged.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shipment {
    pub id: String,
    #[serde(default)]
    pub reference: Option<String>,
    #[serde(default)]
    pub customer_id: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub customer: Option<PartyRef>,
    #[serde(default)]
    pub carrier_assignment: Option<CarrierAssignment>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub stops: Vec<ShipmentStop>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A named party (customer, carrier).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PartyRef {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Carrier currently assigned to a shipment.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CarrierAssignment {
    #[serde(default)]
    pub carrier: Option<PartyRef>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A stop of a listed shipment.
///
/// Window timestamps stay as the server sent them; they are parsed only
/// when the board needs them.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShipmentStop {
    #[serde(default)]
    pub sequence: Option<u32>,
    #[serde(default, rename = "type")]
    pub stop_type: Option<String>,
    #[serde(default)]
    pub location_id: Option<String>,
    #[serde(default)]
    pub window_start: Option<String>,
    #[serde(default)]
    pub window_end: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Shipment {
    /// Carrier name, if a carrier is assigned.
    pub fn carrier_name(&self) -> Option<&str> {
        self.carrier_assignment
            .as_ref()
            .and_then(|a| a.carrier.as_ref())
            .and_then(|c| c.name.as_deref())
    }

    /// Customer display name, if the API expanded the customer.
    pub fn customer_name(&self) -> Option<&str> {
        self.customer.as_ref().and_then(|c| c.name.as_deref())
    }

    /// Whether the shipment is in the delivered state.
    pub fn is_delivered(&self) -> bool {
        self.status.as_deref() == Some(STATUS_DELIVERED)
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<ShipmentStop>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<Vec<ShipmentStop>>::deserialize(deserializer)?.unwrap_or_default())
}

// =============================================================================
// Create Request
// =============================================================================

/// Outbound stop type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StopKind {
    Pickup,
    Delivery,
}

impl StopKind {
    /// Wire value (`PICKUP` / `DELIVERY`).
    pub fn as_str(&self) -> &'static str {
        match self {
            StopKind::Pickup => "PICKUP",
            StopKind::Delivery => STOP_TYPE_DELIVERY,
        }
    }
}

/// One stop of a create request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateStop {
    /// 1-based position in the draft's stop list
    pub sequence: u32,
    #[serde(rename = "type")]
    pub kind: StopKind,
    pub location_id: String,
    /// ISO-8601 UTC instant, `null` when unknown
    pub window_start: Option<String>,
    /// `" | "`-joined note fragments, `null` when empty
    pub notes: Option<String>,
}

/// Body of `POST /api/shipments`.
///
/// Built once from a validated draft and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShipmentCreateRequest {
    pub customer_id: String,
    /// Load number; absent from the JSON when empty
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    pub stops: Vec<CreateStop>,
}
