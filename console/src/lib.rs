//! # Loadboard - freight brokerage operations console core
//!
//! Lists shipments from the brokerage's shipments API and turns the operator's
//! "New Load" draft into a create request.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  LoadDraft  │────▶│  Validate   │────▶│  Transform  │────▶│ POST /api/  │
//! │ (+ stops)   │     │ (1st error) │     │ (wire JSON) │     │  shipments  │
//! └─────────────┘     └─────────────┘     └─────────────┘     └──────┬──────┘
//!        ▲ partial reset                                             │ 2xx
//!        └─────────────────────────── Console ◀──────────────────────┘
//!                                        │ refresh
//!                                        ▼
//!                              ┌──────────────────┐
//!                              │  ShipmentBoard   │◀── GET /api/shipments
//!                              │ loading/err/data │
//!                              └──────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use loadboard::{Console, ConsoleConfig, HttpShipmentApi};
//!
//! #[tokio::main]
//! async fn main() {
//!     let api = HttpShipmentApi::new(ConsoleConfig::from_env().unwrap());
//!     let mut console = Console::new(api);
//!     console.refresh().await;
//!
//!     let draft = console.draft_mut();
//!     draft.customer_id = "cmf2ye9020002112n49evyvxn".into();
//!     // ... location IDs, dates ...
//!     console.submit().await.unwrap();
//! }
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Error types
//! - [`config`] - API base URL configuration
//! - [`models`] - Wire models (Shipment, ShipmentCreateRequest)
//! - [`draft`] - The editable load draft
//! - [`submission`] - Validation and request building
//! - [`contract`] - JSON Schema check of create requests
//! - [`api`] - HTTP client and activity feed
//! - [`board`] - Shipment list loader and grid rows
//! - [`console`] - Draft + board owner, submission flow

// Core modules
pub mod error;
pub mod config;
pub mod models;

// Draft and submission
pub mod draft;
pub mod submission;
pub mod contract;

// Remote API
pub mod api;

// Shipment board
pub mod board;

// Orchestration
pub mod console;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{
    ValidationError,
    RequestError,
    SubmitError,
    DraftError,
    ConfigError,
    RequestResult,
    SubmitResult,
    DraftResult,
};

// =============================================================================
// Re-exports - Configuration
// =============================================================================

pub use config::{ConsoleConfig, DEFAULT_API_BASE, API_URL_ENV};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{
    Shipment,
    ShipmentStop,
    PartyRef,
    CarrierAssignment,
    ShipmentCreateRequest,
    CreateStop,
    StopKind,
};

// =============================================================================
// Re-exports - Draft
// =============================================================================

pub use draft::{LoadDraft, StopRow, StopKey, StopType, Qualifier, BillableMode};

// =============================================================================
// Re-exports - Submission
// =============================================================================

pub use submission::{
    validate,
    build_request,
    build_request_in,
    window_start,
    window_start_in,
    stop_notes,
};

pub use contract::{validate_create_request, is_valid_create_request};

// =============================================================================
// Re-exports - API
// =============================================================================

pub use api::{HttpShipmentApi, ShipmentApi, ActivityFeed, LogEntry, LogLevel};

// =============================================================================
// Re-exports - Board
// =============================================================================

pub use board::{
    ShipmentBoard,
    BoardState,
    RefreshTicket,
    BoardRow,
    board_rows,
    format_instant,
};

// =============================================================================
// Re-exports - Console
// =============================================================================

pub use console::{Console, PendingSubmission};
