//! Remote API access and the activity feed.
//!
//! This module provides the shipments API client and the notification feed
//! the console reports through.

pub mod client;
pub mod logs;

pub use client::{HttpShipmentApi, ShipmentApi};
pub use logs::*;
