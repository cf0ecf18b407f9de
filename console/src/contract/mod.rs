//! JSON Schema check of outbound create requests.
//!
//! The schema is embedded at compile time from
//! `schemas/shipment-create-request.json` and checked with JSON Schema
//! Draft 7. Payloads produced by [`crate::build_request`] always conform;
//! the check exists for payloads assembled elsewhere (hand-edited files,
//! other tools) and for the CLI dry run.
//!
//! # Example
//!
//! ```rust,ignore
//! use serde_json::json;
//! use loadboard::validate_create_request;
//!
//! let body = json!({
//!     "customerId": "cust-1",
//!     "stops": [
//!         { "sequence": 1, "type": "PICKUP", "locationId": "a", "windowStart": null, "notes": null },
//!         { "sequence": 2, "type": "DELIVERY", "locationId": "b", "windowStart": null, "notes": null }
//!     ]
//! });
//! assert!(validate_create_request(&body).is_ok());
//! ```

use serde_json::Value;

const CREATE_REQUEST_SCHEMA: &str = include_str!("../../schemas/shipment-create-request.json");

/// Validate a JSON value against a JSON schema.
///
/// Returns every violation, not only the first.
pub fn validate(schema: &Value, data: &Value) -> Result<(), Vec<String>> {
    let validator = jsonschema::draft7::new(schema)
        .map_err(|e| vec![format!("Invalid schema: {}", e)])?;

    let errors: Vec<String> = validator
        .iter_errors(data)
        .map(|e| e.to_string())
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// The embedded create-request schema.
pub fn create_request_schema() -> Result<Value, Vec<String>> {
    serde_json::from_str(CREATE_REQUEST_SCHEMA)
        .map_err(|e| vec![format!("Invalid embedded schema: {}", e)])
}

/// Validate a payload against the create-request schema.
pub fn validate_create_request(data: &Value) -> Result<(), Vec<String>> {
    let schema = create_request_schema()?;
    validate(&schema, data)
}

/// Quick check against the create-request schema.
pub fn is_valid_create_request(data: &Value) -> bool {
    validate_create_request(data).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draft::LoadDraft;
    use crate::submission::build_request_in;
    use serde_json::json;

    #[test]
    fn test_load_schema() {
        let schema = create_request_schema().unwrap();
        assert!(schema.get("properties").is_some());
    }

    #[test]
    fn test_built_request_conforms() {
        let mut draft = LoadDraft::new();
        draft.customer_id = "cust-1".into();
        draft.load_number = "L-9".into();
        draft.po_number = "PO7".into();
        let keys: Vec<_> = draft.stops().iter().map(|s| s.key()).collect();
        for key in keys {
            let row = draft.stop_mut(key).unwrap();
            row.location_id = "loc".into();
            row.date = "2024-03-01".into();
        }

        let request = build_request_in(&draft, &chrono::Utc).unwrap();
        let value = serde_json::to_value(&request).unwrap();
        assert!(validate_create_request(&value).is_ok());
    }

    #[test]
    fn test_unknown_stop_type_rejected() {
        let body = json!({
            "customerId": "cust-1",
            "stops": [
                { "sequence": 1, "type": "PICKUP", "locationId": "a", "windowStart": null, "notes": null },
                { "sequence": 2, "type": "CROSSDOCK", "locationId": "b", "windowStart": null, "notes": null }
            ]
        });
        assert!(!is_valid_create_request(&body));
    }

    #[test]
    fn test_null_reference_rejected() {
        let body = json!({
            "customerId": "cust-1",
            "reference": null,
            "stops": [
                { "sequence": 1, "type": "PICKUP", "locationId": "a", "windowStart": null, "notes": null },
                { "sequence": 2, "type": "DELIVERY", "locationId": "b", "windowStart": null, "notes": null }
            ]
        });
        let errors = validate_create_request(&body).unwrap_err();
        assert!(!errors.is_empty());
    }

    #[test]
    fn test_local_row_key_not_allowed() {
        let body = json!({
            "customerId": "cust-1",
            "stops": [
                { "id": 0, "sequence": 1, "type": "PICKUP", "locationId": "a", "windowStart": null, "notes": null },
                { "sequence": 2, "type": "DELIVERY", "locationId": "b", "windowStart": null, "notes": null }
            ]
        });
        assert!(!is_valid_create_request(&body));
    }
}
