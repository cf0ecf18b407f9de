//! The console: single owner of the draft and the shipment board.
//!
//! ```text
//! edit draft ──▶ begin_submit ──▶ POST /api/shipments ──▶ finish_submit ──▶ refresh
//!                  │ invalid                  │ non-2xx
//!                  ▼                          ▼
//!             feed (error)              feed (error), draft untouched
//! ```
//!
//! [`Console::submit`] runs the whole chain. Event-loop callers can instead
//! call [`Console::begin_submit`], issue the request themselves, and hand the
//! outcome to [`Console::finish_submit`].

use crate::api::client::ShipmentApi;
use crate::api::logs::ActivityFeed;
use crate::board::ShipmentBoard;
use crate::draft::LoadDraft;
use crate::error::{RequestResult, SubmitError, SubmitResult, ValidationError};
use crate::models::ShipmentCreateRequest;
use crate::submission::build_request;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// A submission that passed validation and holds the in-flight guard.
///
/// The guard is released when this value is dropped, so a cancelled
/// [`Console::submit`] future or an abandoned two-phase submission never
/// leaves the console stuck.
#[derive(Debug)]
#[must_use = "a pending submission must be finished"]
pub struct PendingSubmission {
    request: ShipmentCreateRequest,
    in_flight: Arc<AtomicBool>,
}

impl PendingSubmission {
    /// The request to send.
    pub fn request(&self) -> &ShipmentCreateRequest {
        &self.request
    }
}

impl Drop for PendingSubmission {
    fn drop(&mut self) {
        self.in_flight.store(false, Ordering::SeqCst);
    }
}

/// Draft, board and remote API, owned together.
pub struct Console<A> {
    api: A,
    draft: LoadDraft,
    board: ShipmentBoard,
    feed: ActivityFeed,
    submitting: Arc<AtomicBool>,
}

impl<A: ShipmentApi> Console<A> {
    /// A console with a fresh draft and an empty board.
    pub fn new(api: A) -> Self {
        Self::with_feed(api, ActivityFeed::new())
    }

    /// Use a specific activity feed.
    pub fn with_feed(api: A, feed: ActivityFeed) -> Self {
        Self {
            api,
            draft: LoadDraft::new(),
            board: ShipmentBoard::new(),
            feed,
            submitting: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Start from an existing draft.
    pub fn with_draft(mut self, draft: LoadDraft) -> Self {
        self.draft = draft;
        self
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn draft(&self) -> &LoadDraft {
        &self.draft
    }

    /// Mutable access for field edits.
    pub fn draft_mut(&mut self) -> &mut LoadDraft {
        &mut self.draft
    }

    pub fn board(&self) -> &ShipmentBoard {
        &self.board
    }

    pub fn feed(&self) -> &ActivityFeed {
        &self.feed
    }

    /// Whether a submission is waiting for the API.
    pub fn is_submitting(&self) -> bool {
        self.submitting.load(Ordering::SeqCst)
    }

    /// Build the request for the current draft without submitting.
    pub fn preview(&self) -> Result<ShipmentCreateRequest, ValidationError> {
        build_request(&self.draft)
    }

    /// Validate the draft, build the request and take the in-flight guard.
    ///
    /// Validation failures are published to the feed and never reach the
    /// network.
    pub fn begin_submit(&mut self) -> SubmitResult<PendingSubmission> {
        if self.is_submitting() {
            self.feed.warning("Submission already in progress");
            return Err(SubmitError::SubmissionInFlight);
        }

        let request = build_request(&self.draft).map_err(|err| {
            self.feed.error(err.to_string());
            err
        })?;

        self.submitting.store(true, Ordering::SeqCst);
        Ok(PendingSubmission {
            request,
            in_flight: Arc::clone(&self.submitting),
        })
    }

    /// Give up on a pending submission without applying any outcome.
    ///
    /// The draft is left as is. Dropping `pending` has the same effect.
    pub fn abandon_submit(&mut self, pending: PendingSubmission) {
        drop(pending);
        self.feed.warning("Submission abandoned");
    }

    /// Release the guard and apply the API's answer.
    ///
    /// On success the draft is partially reset; on failure it is left as is.
    /// The board is not refreshed here.
    pub fn finish_submit(
        &mut self,
        pending: PendingSubmission,
        result: RequestResult<()>,
    ) -> SubmitResult<()> {
        let outcome = match result {
            Ok(()) => {
                let stops = pending.request.stops.len();
                match &pending.request.reference {
                    Some(reference) => self
                        .feed
                        .success(format!("Load {} created ({} stops)", reference, stops)),
                    None => self.feed.success(format!("Load created ({} stops)", stops)),
                }
                self.draft.reset_after_submit();
                Ok(())
            }
            Err(err) => {
                let err = SubmitError::from(err);
                self.feed.error(err.to_string());
                Err(err)
            }
        };
        drop(pending);
        outcome
    }

    /// Submit the draft; on success reset it and refresh the board.
    pub async fn submit(&mut self) -> SubmitResult<()> {
        let pending = self.begin_submit()?;
        let result = self.api.create_shipment(pending.request()).await;
        self.finish_submit(pending, result)?;
        self.refresh().await;
        Ok(())
    }

    /// Reload the shipment board.
    pub async fn refresh(&mut self) {
        self.board.refresh(&self.api, &self.feed).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::logs::LogLevel;
    use crate::board::BoardState;
    use crate::error::RequestError;
    use crate::models::{Shipment, StopKind};
    use std::sync::atomic::AtomicUsize;
    use std::sync::Mutex;
    use std::time::Duration;

    /// Records create calls and counts list calls.
    #[derive(Default)]
    struct RecordingApi {
        created: Mutex<Vec<ShipmentCreateRequest>>,
        list_calls: AtomicUsize,
        create_error: Option<RequestError>,
        list_error: Option<RequestError>,
        create_never_answers: bool,
    }

    impl RecordingApi {
        fn failing(err: RequestError) -> Self {
            Self { create_error: Some(err), ..Default::default() }
        }

        fn created(&self) -> Vec<ShipmentCreateRequest> {
            self.created.lock().unwrap().clone()
        }

        fn list_calls(&self) -> usize {
            self.list_calls.load(Ordering::SeqCst)
        }
    }

    impl ShipmentApi for RecordingApi {
        async fn list_shipments(&self) -> RequestResult<Vec<Shipment>> {
            self.list_calls.fetch_add(1, Ordering::SeqCst);
            match &self.list_error {
                Some(err) => Err(err.clone()),
                None => Ok(vec![Shipment { id: "s1".into(), ..Default::default() }]),
            }
        }

        async fn create_shipment(&self, request: &ShipmentCreateRequest) -> RequestResult<()> {
            self.created.lock().unwrap().push(request.clone());
            if self.create_never_answers {
                std::future::pending::<()>().await;
            }
            match &self.create_error {
                Some(err) => Err(err.clone()),
                None => Ok(()),
            }
        }
    }

    fn console(api: RecordingApi) -> Console<RecordingApi> {
        Console::with_feed(api, ActivityFeed::quiet())
    }

    fn fill_valid(draft: &mut LoadDraft) {
        draft.customer_id = "cust-1".into();
        draft.load_number = "L-42".into();
        draft.po_number = "PO7".into();
        let keys: Vec<_> = draft.stops().iter().map(|s| s.key()).collect();
        for (i, key) in keys.into_iter().enumerate() {
            let row = draft.stop_mut(key).unwrap();
            row.location_id = format!("loc-{}", i + 1);
            row.stop_name = format!("Dock {}", i + 1);
            row.city = "Fresno".into();
            row.date = "2024-03-01".into();
            row.time = "09:15".into();
        }
    }

    #[tokio::test]
    async fn test_missing_customer_issues_no_request() {
        let mut console = console(RecordingApi::default());
        let mut rx = console.feed().subscribe();

        let err = console.submit().await.unwrap_err();

        assert_eq!(err, SubmitError::Validation(ValidationError::MissingCustomer));
        assert!(console.api().created().is_empty());
        assert_eq!(console.api().list_calls(), 0);
        assert!(!console.is_submitting());

        let entry = rx.try_recv().unwrap();
        assert_eq!(entry.level, LogLevel::Error);
        assert_eq!(entry.message, "Customer ID is required.");
    }

    #[tokio::test]
    async fn test_missing_location_issues_no_request() {
        let mut console = console(RecordingApi::default());
        fill_valid(console.draft_mut());
        console.draft_mut().add_stop();

        let err = console.submit().await.unwrap_err();
        assert_eq!(err, SubmitError::Validation(ValidationError::MissingLocationId));
        assert!(console.api().created().is_empty());
    }

    #[tokio::test]
    async fn test_successful_submit_resets_and_refreshes() {
        let mut console = console(RecordingApi::default());
        fill_valid(console.draft_mut());
        let header_before = console.draft().clone();

        console.submit().await.unwrap();

        let created = console.api().created();
        assert_eq!(created.len(), 1);
        assert_eq!(created[0].reference.as_deref(), Some("L-42"));
        assert_eq!(created[0].stops[0].kind, StopKind::Pickup);
        assert_eq!(created[0].stops[1].kind, StopKind::Delivery);
        assert_eq!(
            created[0].stops[0].notes.as_deref(),
            Some("Stop:Dock 1 | City:Fresno | Qual:Appointment | PO:PO7")
        );

        let draft = console.draft();
        assert!(draft.load_number.is_empty());
        assert_eq!(draft.customer_id, header_before.customer_id);
        assert_eq!(draft.po_number, header_before.po_number);
        assert_eq!(draft.stops()[0].location_id, "loc-1");
        assert!(draft.stops()[1].location_id.is_empty());
        for stop in draft.stops() {
            assert!(stop.stop_name.is_empty());
            assert!(stop.city.is_empty());
            assert!(stop.date.is_empty());
            assert!(stop.time.is_empty());
        }

        assert_eq!(console.api().list_calls(), 1);
        assert!(matches!(console.board().state(), BoardState::Ready(s) if s.len() == 1));
        assert!(!console.is_submitting());
    }

    #[tokio::test]
    async fn test_remote_failure_keeps_draft_and_skips_refresh() {
        let mut console = console(RecordingApi::failing(RequestError::Status {
            status: 400,
            body: "customer not found".into(),
        }));
        fill_valid(console.draft_mut());
        let before = console.draft().clone();
        let mut rx = console.feed().subscribe();

        let err = console.submit().await.unwrap_err();

        assert_eq!(
            err,
            SubmitError::Request(RequestError::Status {
                status: 400,
                body: "customer not found".into()
            })
        );
        assert_eq!(console.draft(), &before);
        assert_eq!(console.api().list_calls(), 0);
        assert!(!console.is_submitting());

        let entry = rx.try_recv().unwrap();
        assert!(entry.is_blocking());
        assert!(entry.message.contains("400"));
        assert!(entry.message.contains("customer not found"));
    }

    #[test]
    fn test_in_flight_guard() {
        let mut console = console(RecordingApi::default());
        fill_valid(console.draft_mut());

        let pending = console.begin_submit().unwrap();
        assert!(console.is_submitting());
        assert_eq!(
            console.begin_submit().unwrap_err(),
            SubmitError::SubmissionInFlight
        );

        console.finish_submit(pending, Ok(())).unwrap();
        assert!(!console.is_submitting());
    }

    #[test]
    fn test_guard_released_on_failure() {
        let mut console = console(RecordingApi::default());
        fill_valid(console.draft_mut());

        let pending = console.begin_submit().unwrap();
        let result = console.finish_submit(pending, Err(RequestError::Network("refused".into())));
        assert!(result.is_err());
        assert!(!console.is_submitting());
        assert!(console.begin_submit().is_ok());
    }

    #[test]
    fn test_preview_matches_submission() {
        let mut console = console(RecordingApi::default());
        fill_valid(console.draft_mut());

        let preview = console.preview().unwrap();
        let pending = console.begin_submit().unwrap();
        assert_eq!(pending.request(), &preview);
    }

    #[tokio::test]
    async fn test_cancelled_submit_releases_guard() {
        let mut console = console(RecordingApi {
            create_never_answers: true,
            ..Default::default()
        });
        fill_valid(console.draft_mut());
        let before = console.draft().clone();

        let outcome = tokio::time::timeout(Duration::from_millis(50), console.submit()).await;
        assert!(outcome.is_err());

        assert_eq!(console.api().created().len(), 1);
        assert!(!console.is_submitting());
        assert_eq!(console.draft(), &before);
        assert!(console.begin_submit().is_ok());
    }

    #[test]
    fn test_dropped_pending_submission_releases_guard() {
        let mut console = console(RecordingApi::default());
        fill_valid(console.draft_mut());

        let pending = console.begin_submit().unwrap();
        assert!(console.is_submitting());
        drop(pending);
        assert!(!console.is_submitting());

        let pending = console.begin_submit().unwrap();
        let mut rx = console.feed().subscribe();
        console.abandon_submit(pending);
        assert!(!console.is_submitting());
        assert_eq!(rx.try_recv().unwrap().level, LogLevel::Warning);
        assert!(console.begin_submit().is_ok());
    }

    #[tokio::test]
    async fn test_submit_succeeds_when_refresh_fails() {
        let mut console = console(RecordingApi {
            list_error: Some(RequestError::Status { status: 503, body: String::new() }),
            ..Default::default()
        });
        fill_valid(console.draft_mut());

        console.submit().await.unwrap();

        assert_eq!(console.api().created().len(), 1);
        assert!(console.draft().load_number.is_empty());
        assert_eq!(console.board().state(), &BoardState::Failed("HTTP 503".into()));
    }
}
