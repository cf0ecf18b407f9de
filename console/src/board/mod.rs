//! Shipment board: the list loader and its tri-state view.
//!
//! A refresh is two steps so callers driving their own event loop can issue
//! the request elsewhere:
//!
//! ```text
//!  begin_refresh() ──▶ RefreshTicket ──▶ (GET /api/shipments) ──▶ finish_refresh(ticket, result)
//! ```
//!
//! Each ticket carries a generation. Only the newest ticket may change the
//! state; completions of older refreshes are dropped.

pub mod rows;

use chrono::{DateTime, Utc};

use crate::api::client::ShipmentApi;
use crate::api::logs::ActivityFeed;
use crate::error::{RequestError, RequestResult};
use crate::models::Shipment;

pub use rows::{board_rows, format_instant, BoardRow, PLACEHOLDER};

/// What the board currently shows.
#[derive(Debug, Clone, PartialEq)]
pub enum BoardState {
    /// A refresh is in progress.
    Loading,
    /// The last refresh failed.
    Failed(String),
    /// Shipments in the order the API returned them.
    Ready(Vec<Shipment>),
}

impl Default for BoardState {
    fn default() -> Self {
        BoardState::Ready(Vec::new())
    }
}

/// Handle for one in-progress refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use = "a refresh must be finished with its ticket"]
pub struct RefreshTicket {
    generation: u64,
}

impl RefreshTicket {
    /// Generation number of this refresh.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Owner of the shipment collection.
#[derive(Debug, Default)]
pub struct ShipmentBoard {
    state: BoardState,
    generation: u64,
}

impl ShipmentBoard {
    /// An empty, ready board.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current view.
    pub fn state(&self) -> &BoardState {
        &self.state
    }

    /// Whether a refresh is outstanding.
    pub fn is_loading(&self) -> bool {
        matches!(self.state, BoardState::Loading)
    }

    /// Shipments, when the last refresh succeeded.
    pub fn shipments(&self) -> Option<&[Shipment]> {
        match &self.state {
            BoardState::Ready(shipments) => Some(shipments),
            _ => None,
        }
    }

    /// Start a refresh: switch to `Loading` and hand out a newer ticket.
    pub fn begin_refresh(&mut self) -> RefreshTicket {
        self.generation += 1;
        self.state = BoardState::Loading;
        RefreshTicket { generation: self.generation }
    }

    /// Apply the outcome of a refresh.
    ///
    /// Returns `false` (and changes nothing) if a newer refresh was started
    /// after `ticket` was issued.
    pub fn finish_refresh(&mut self, ticket: RefreshTicket, result: RequestResult<Vec<Shipment>>) -> bool {
        if ticket.generation != self.generation {
            return false;
        }
        self.state = match result {
            Ok(shipments) => BoardState::Ready(shipments),
            Err(err) => BoardState::Failed(failure_message(&err)),
        };
        true
    }

    /// [`finish_refresh`](Self::finish_refresh), publishing an applied
    /// failure to `feed`. Stale outcomes are dropped silently.
    pub fn finish_refresh_logged(
        &mut self,
        ticket: RefreshTicket,
        result: RequestResult<Vec<Shipment>>,
        feed: &ActivityFeed,
    ) -> bool {
        let message = result.as_ref().err().map(failure_message);
        let applied = self.finish_refresh(ticket, result);
        if let (true, Some(message)) = (applied, message) {
            feed.error(message);
        }
        applied
    }

    /// Fetch the collection and apply it.
    pub async fn refresh<A: ShipmentApi>(&mut self, api: &A, feed: &ActivityFeed) {
        let ticket = self.begin_refresh();
        let result = api.list_shipments().await;
        self.finish_refresh_logged(ticket, result, feed);
    }

    /// Derived grid rows as of `now`; empty unless the board is ready.
    pub fn rows_at(&self, now: DateTime<Utc>) -> Vec<BoardRow> {
        self.shipments()
            .map(|shipments| board_rows(shipments, now))
            .unwrap_or_default()
    }
}

/// Message shown when a refresh fails.
pub fn failure_message(err: &RequestError) -> String {
    match err {
        RequestError::Status { status, .. } => format!("HTTP {}", status),
        RequestError::Network(msg) | RequestError::Decode(msg) => msg.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ShipmentCreateRequest;

    struct FixedApi {
        result: RequestResult<Vec<Shipment>>,
    }

    impl ShipmentApi for FixedApi {
        async fn list_shipments(&self) -> RequestResult<Vec<Shipment>> {
            self.result.clone()
        }

        async fn create_shipment(&self, _request: &ShipmentCreateRequest) -> RequestResult<()> {
            Ok(())
        }
    }

    fn shipment(id: &str) -> Shipment {
        Shipment { id: id.into(), ..Default::default() }
    }

    #[test]
    fn test_initial_state() {
        let board = ShipmentBoard::new();
        assert_eq!(board.state(), &BoardState::Ready(Vec::new()));
        assert!(!board.is_loading());
    }

    #[test]
    fn test_refresh_lifecycle() {
        let mut board = ShipmentBoard::new();
        let ticket = board.begin_refresh();
        assert!(board.is_loading());
        assert_eq!(board.shipments(), None);

        assert!(board.finish_refresh(ticket, Ok(vec![shipment("s1")])));
        assert_eq!(board.shipments().unwrap().len(), 1);
    }

    #[test]
    fn test_failure_message() {
        let mut board = ShipmentBoard::new();
        let ticket = board.begin_refresh();
        board.finish_refresh(
            ticket,
            Err(RequestError::Status { status: 502, body: "bad gateway".into() }),
        );
        assert_eq!(board.state(), &BoardState::Failed("HTTP 502".into()));

        let ticket = board.begin_refresh();
        board.finish_refresh(ticket, Err(RequestError::Network("connection refused".into())));
        assert_eq!(board.state(), &BoardState::Failed("connection refused".into()));
    }

    #[test]
    fn test_stale_completion_dropped() {
        let mut board = ShipmentBoard::new();
        let slow = board.begin_refresh();
        let fast = board.begin_refresh();
        assert!(fast.generation() > slow.generation());

        assert!(board.finish_refresh(fast, Ok(vec![shipment("fresh")])));
        assert!(!board.finish_refresh(slow, Ok(vec![shipment("stale")])));

        assert_eq!(board.shipments().unwrap()[0].id, "fresh");
    }

    #[test]
    fn test_stale_completion_dropped_while_loading() {
        let mut board = ShipmentBoard::new();
        let slow = board.begin_refresh();
        let _fast = board.begin_refresh();

        assert!(!board.finish_refresh(slow, Err(RequestError::Network("timeout".into()))));
        assert!(board.is_loading());
    }

    #[test]
    fn test_stale_failure_not_reported() {
        let feed = ActivityFeed::quiet();
        let mut rx = feed.subscribe();
        let mut board = ShipmentBoard::new();
        let slow = board.begin_refresh();
        let fast = board.begin_refresh();

        assert!(board.finish_refresh_logged(fast, Ok(vec![shipment("fresh")]), &feed));
        assert!(!board.finish_refresh_logged(
            slow,
            Err(RequestError::Network("timeout".into())),
            &feed
        ));

        assert_eq!(board.shipments().unwrap()[0].id, "fresh");
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_refresh_reports_failure_to_feed() {
        let feed = ActivityFeed::quiet();
        let mut rx = feed.subscribe();
        let api = FixedApi {
            result: Err(RequestError::Status { status: 500, body: String::new() }),
        };

        let mut board = ShipmentBoard::new();
        board.refresh(&api, &feed).await;

        assert_eq!(board.state(), &BoardState::Failed("HTTP 500".into()));
        assert_eq!(rx.try_recv().unwrap().message, "HTTP 500");
    }

    #[tokio::test]
    async fn test_refresh_success() {
        let feed = ActivityFeed::quiet();
        let api = FixedApi { result: Ok(vec![shipment("s1"), shipment("s2")]) };

        let mut board = ShipmentBoard::new();
        board.refresh(&api, &feed).await;

        let ids: Vec<&str> = board.shipments().unwrap().iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["s1", "s2"]);
        assert_eq!(board.rows_at(Utc::now()).len(), 2);
    }
}
