//! The "New Load" draft edited by the operator.
//!
//! - [`LoadDraft`] - Header fields plus the ordered stop list
//! - [`StopRow`] - One physical stop
//! - [`StopKey`] - Local identity of a stop row, never sent to the API
//!
//! Drafts round-trip through JSON (camelCase, like the API) so the CLI can
//! read them from and write them back to disk.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;

use crate::error::DraftResult;

// =============================================================================
// Enumerations
// =============================================================================

/// Whether freight is picked up or dropped at a stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StopType {
    Load,
    Unload,
}

/// Appointment qualifier of a stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Qualifier {
    #[default]
    Appointment,
    Open,
    #[serde(rename = "FCFS")]
    Fcfs,
    #[serde(rename = "")]
    Unset,
}

impl Qualifier {
    /// Display value; empty for [`Qualifier::Unset`].
    pub fn as_str(&self) -> &'static str {
        match self {
            Qualifier::Appointment => "Appointment",
            Qualifier::Open => "Open",
            Qualifier::Fcfs => "FCFS",
            Qualifier::Unset => "",
        }
    }
}

impl fmt::Display for Qualifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How billable miles are obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BillableMode {
    #[default]
    Miler,
    Manual,
}

// =============================================================================
// Stop Rows
// =============================================================================

/// Local identity of a stop row.
///
/// Allocated from a per-draft counter; unique within the draft.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StopKey(u64);

impl fmt::Display for StopKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One stop in the draft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StopRow {
    #[serde(skip)]
    key: StopKey,
    #[serde(rename = "type")]
    pub stop_type: StopType,
    #[serde(default)]
    pub stop_name: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub qualifier: Qualifier,
    /// `yyyy-mm-dd`, empty when unknown
    #[serde(default)]
    pub date: String,
    /// `hh:mm`, empty means midnight
    #[serde(default)]
    pub time: String,
    #[serde(default)]
    pub location_id: String,
}

impl StopRow {
    fn blank(key: StopKey, stop_type: StopType) -> Self {
        Self {
            key,
            stop_type,
            stop_name: String::new(),
            city: String::new(),
            qualifier: Qualifier::Appointment,
            date: String::new(),
            time: String::new(),
            location_id: String::new(),
        }
    }

    /// The row's local key.
    pub fn key(&self) -> StopKey {
        self.key
    }
}

// =============================================================================
// Load Draft
// =============================================================================

/// The in-progress, unsubmitted load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoadDraft {
    pub company: String,
    /// External load number, sent as `reference`
    pub load_number: String,
    pub customer_id: String,
    pub trailer_no: String,
    pub trailer_type: String,
    pub trailer_length: String,
    pub temperature: String,
    pub po_number: String,
    pub bol: String,
    pub commodity: String,
    pub billable_mode: BillableMode,
    pub billable_manual: String,
    pub charge_type: String,
    pub charge_amount: String,
    pub weight_lbs: String,
    pub qty: String,
    pub qty_unit: String,
    stops: Vec<StopRow>,
    #[serde(skip)]
    next_key: u64,
}

impl Default for LoadDraft {
    /// A fresh draft: one Load and one Unload row.
    fn default() -> Self {
        let mut draft = Self {
            company: String::new(),
            load_number: String::new(),
            customer_id: String::new(),
            trailer_no: String::new(),
            trailer_type: "Dry Van".to_string(),
            trailer_length: "53'".to_string(),
            temperature: "NA".to_string(),
            po_number: String::new(),
            bol: String::new(),
            commodity: String::new(),
            billable_mode: BillableMode::Miler,
            billable_manual: String::new(),
            charge_type: "Mile".to_string(),
            charge_amount: String::new(),
            weight_lbs: String::new(),
            qty: String::new(),
            qty_unit: String::new(),
            stops: Vec::new(),
            next_key: 0,
        };
        draft.push_stop(StopType::Load);
        draft.push_stop(StopType::Unload);
        draft
    }
}

impl LoadDraft {
    /// Create a draft with the default header and stop rows.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stop rows in list order.
    pub fn stops(&self) -> &[StopRow] {
        &self.stops
    }

    /// Look up a row by key.
    pub fn stop(&self, key: StopKey) -> Option<&StopRow> {
        self.stops.iter().find(|s| s.key == key)
    }

    /// Mutable access to a row for in-place edits.
    pub fn stop_mut(&mut self, key: StopKey) -> Option<&mut StopRow> {
        self.stops.iter_mut().find(|s| s.key == key)
    }

    /// Append a blank `Load` row and return its key.
    pub fn add_stop(&mut self) -> StopKey {
        self.push_stop(StopType::Load)
    }

    /// Append a blank row of the given type and return its key.
    pub fn push_stop(&mut self, stop_type: StopType) -> StopKey {
        let key = self.allocate_key();
        self.stops.push(StopRow::blank(key, stop_type));
        key
    }

    /// Remove a row. The last remaining row is never removed.
    ///
    /// Returns `true` if a row was removed.
    pub fn remove_stop(&mut self, key: StopKey) -> bool {
        if self.stops.len() <= 1 {
            return false;
        }
        let before = self.stops.len();
        self.stops.retain(|s| s.key != key);
        self.stops.len() != before
    }

    /// Clear what differs between consecutive loads after a successful create.
    ///
    /// Keeps the header (except the load number), each row's type and
    /// qualifier, and the first row's location.
    pub fn reset_after_submit(&mut self) {
        self.load_number.clear();
        for (i, stop) in self.stops.iter_mut().enumerate() {
            stop.stop_name.clear();
            stop.city.clear();
            stop.date.clear();
            stop.time.clear();
            if i > 0 {
                stop.location_id.clear();
            }
        }
    }

    /// Read a draft from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> DraftResult<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Parse a draft from JSON. Missing header fields take their defaults.
    pub fn from_json(json: &str) -> DraftResult<Self> {
        let mut draft: LoadDraft = serde_json::from_str(json)?;
        draft.rekey();
        Ok(draft)
    }

    /// Serialize to pretty JSON (row keys are not included).
    pub fn to_json(&self) -> DraftResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the draft to a JSON file.
    pub fn save(&self, path: impl AsRef<Path>) -> DraftResult<()> {
        fs::write(path, self.to_json()?)?;
        Ok(())
    }

    fn allocate_key(&mut self) -> StopKey {
        let key = StopKey(self.next_key);
        self.next_key += 1;
        key
    }

    // Keys are skipped by serde, so deserialized rows all share the zero key.
    fn rekey(&mut self) {
        self.next_key = 0;
        let keys: Vec<StopKey> = (0..self.stops.len()).map(|_| self.allocate_key()).collect();
        for (stop, key) in self.stops.iter_mut().zip(keys) {
            stop.key = key;
        }
    }
}
