//! Tests for the dispatch pipeline.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use http::HeaderValue;

use crate::event::{Event, EventKind, Subject};
use crate::gateway::{Batcher, NotifyGateway};
use crate::net::{HttpClient, HttpError, HttpRequest, HttpResponse};
use crate::time::InstantSleeper;

use super::{DispatchReport, Dispatcher, MessageFormat, SkipReason};
use crate::capture::ErrorCapture;

/// Mock HTTP client that returns a configurable sequence of responses.
#[derive(Debug)]
struct MockClient {
    responses: std::sync::Mutex<Vec<Result<HttpResponse, HttpError>>>,
    requests: std::sync::Mutex<Vec<HttpRequest>>,
    call_count: AtomicUsize,
}

impl MockClient {
    fn new(responses: Vec<Result<HttpResponse, HttpError>>) -> Self {
        Self {
            responses: std::sync::Mutex::new(responses),
            requests: std::sync::Mutex::new(Vec::new()),
            call_count: AtomicUsize::new(0),
        }
    }

    fn ok_json(body: &str) -> Result<HttpResponse, HttpError> {
        Ok(HttpResponse::new(
            http::StatusCode::OK,
            http::HeaderMap::new(),
            body.as_bytes().to_vec(),
        ))
    }

    fn calls(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    fn captured_requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl HttpClient for MockClient {
    async fn request(&self, req: HttpRequest) -> Result<HttpResponse, HttpError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(req);
        self.responses.lock().unwrap().remove(0)
    }
}

impl HttpClient for Arc<MockClient> {
    async fn request(&self, req: HttpRequest) -> Result<HttpResponse, HttpError> {
        (**self).request(req).await
    }
}

/// Capture sink that counts invocations per scope.
#[derive(Debug, Default)]
struct CountingCapture {
    captures: std::sync::Mutex<Vec<&'static str>>,
}

impl CountingCapture {
    fn scopes(&self) -> Vec<&'static str> {
        self.captures.lock().unwrap().clone()
    }
}

impl ErrorCapture for &CountingCapture {
    fn capture(&self, scope: &'static str, _error: &dyn std::error::Error) {
        self.captures.lock().unwrap().push(scope);
    }
}

fn start_event() -> Event {
    Event {
        id: "subject/0x38c654c0f81b63ea1839ec3b221fad6e".to_string(),
        kind: EventKind::SubjectStart,
        subject_id: "demo.group".to_string(),
        expire: 1_647_343_155,
    }
}

fn test_subject() -> Subject {
    Subject {
        id: "s1".to_string(),
        owner_group_id: "demo.group".to_string(),
        display_name: "First entry".to_string(),
        link: "https://example.com/s1".to_string(),
        icon_url: "https://example.com/icon.png".to_string(),
    }
}

fn dispatcher<'a>(
    client: Arc<MockClient>,
    capture: &'a CountingCapture,
    max_accounts: usize,
) -> Dispatcher<Arc<MockClient>, InstantSleeper, &'a CountingCapture> {
    let gateway = NotifyGateway::new(
        client,
        url::Url::parse("https://notify.example.com").unwrap(),
        "project-1".to_string(),
        HeaderValue::from_static("Bearer secret-token"),
    );
    let batcher = Batcher::new()
        .with_max_accounts_per_request(max_accounts)
        .with_sleeper(InstantSleeper);

    Dispatcher::new(gateway, Batcher::new(), MessageFormat::new("entry_created"))
        .with_batcher(batcher)
        .with_capture(capture)
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(ToString::to_string).collect()
}

mod filtering {
    use super::*;

    #[tokio::test]
    async fn non_start_event_makes_zero_outbound_calls() {
        let client = Arc::new(MockClient::new(vec![]));
        let capture = CountingCapture::default();
        let dispatcher = dispatcher(client.clone(), &capture, 500);

        let mut event = start_event();
        event.kind = EventKind::Other("subject/end".to_string());

        let report = dispatcher
            .dispatch(&event, &test_subject(), &strings(&["0xABC"]))
            .await;

        assert_eq!(report, DispatchReport::skipped(SkipReason::NotSubjectStart));
        assert_eq!(client.calls(), 0);
    }

    #[tokio::test]
    async fn subject_without_owning_group_makes_zero_outbound_calls() {
        let client = Arc::new(MockClient::new(vec![]));
        let capture = CountingCapture::default();
        let dispatcher = dispatcher(client.clone(), &capture, 500);

        let mut subject = test_subject();
        subject.owner_group_id = String::new();

        let report = dispatcher
            .dispatch(&start_event(), &subject, &strings(&["0xABC"]))
            .await;

        assert_eq!(report, DispatchReport::skipped(SkipReason::NoOwningGroup));
        assert_eq!(client.calls(), 0);
    }
}

mod resolution {
    use super::*;

    #[tokio::test]
    async fn unresolved_recipients_are_dropped_silently() {
        let client = Arc::new(MockClient::new(vec![
            MockClient::ok_json(r#"["eip155:1:0xABC","eip155:1:0xDEF"]"#),
            MockClient::ok_json(r#"{"sent":1}"#),
        ]));
        let capture = CountingCapture::default();
        let dispatcher = dispatcher(client.clone(), &capture, 500);

        let report = dispatcher
            .dispatch(
                &start_event(),
                &test_subject(),
                &strings(&["0xABC", "0xZZZ"]),
            )
            .await;

        assert_eq!(report.resolved, 1);
        assert_eq!(report.batches, 1);
        assert_eq!(report.failed_batches, 0);
        assert!(capture.scopes().is_empty());

        // Directory fetch, then one notify.
        let requests = client.captured_requests();
        assert_eq!(requests.len(), 2);
        let body: serde_json::Value =
            serde_json::from_slice(requests[1].body.as_ref().unwrap()).unwrap();
        assert_eq!(body["accounts"], serde_json::json!(["eip155:1:0xABC"]));
    }

    #[tokio::test]
    async fn zero_resolved_recipients_sends_no_notifications() {
        let client = Arc::new(MockClient::new(vec![MockClient::ok_json("[]")]));
        let capture = CountingCapture::default();
        let dispatcher = dispatcher(client.clone(), &capture, 500);

        let report = dispatcher
            .dispatch(&start_event(), &test_subject(), &strings(&["0xABC"]))
            .await;

        assert_eq!(report, DispatchReport::default());
        // Only the directory fetch went out.
        assert_eq!(client.calls(), 1);
    }

    #[tokio::test]
    async fn directory_fetch_failure_captures_once_and_notifies_nobody() {
        let client = Arc::new(MockClient::new(vec![Err(HttpError::Connection(
            Box::new(std::io::Error::other("dns failure")),
        ))]));
        let capture = CountingCapture::default();
        let dispatcher = dispatcher(client.clone(), &capture, 500);

        let report = dispatcher
            .dispatch(&start_event(), &test_subject(), &strings(&["0xABC"]))
            .await;

        assert_eq!(report, DispatchReport::default());
        assert_eq!(capture.scopes(), vec!["subscriber_directory"]);
        assert_eq!(client.calls(), 1);
    }

    #[tokio::test]
    async fn repeated_recipients_notify_once() {
        let client = Arc::new(MockClient::new(vec![
            MockClient::ok_json(r#"["eip155:1:0xABC"]"#),
            MockClient::ok_json(r#"{"sent":1}"#),
        ]));
        let capture = CountingCapture::default();
        let dispatcher = dispatcher(client.clone(), &capture, 500);

        let report = dispatcher
            .dispatch(
                &start_event(),
                &test_subject(),
                &strings(&["0xABC", "0xABC"]),
            )
            .await;

        assert_eq!(report.resolved, 1);
        let requests = client.captured_requests();
        let body: serde_json::Value =
            serde_json::from_slice(requests[1].body.as_ref().unwrap()).unwrap();
        assert_eq!(body["accounts"], serde_json::json!(["eip155:1:0xABC"]));
    }
}

mod delivery {
    use super::*;

    #[tokio::test]
    async fn splits_resolved_recipients_into_batches() {
        let client = Arc::new(MockClient::new(vec![
            MockClient::ok_json(r#"["eip155:1:0xA","eip155:1:0xB","eip155:1:0xC"]"#),
            MockClient::ok_json(r#"{"sent":2}"#),
            MockClient::ok_json(r#"{"sent":1}"#),
        ]));
        let capture = CountingCapture::default();
        let dispatcher = dispatcher(client.clone(), &capture, 2);

        let report = dispatcher
            .dispatch(
                &start_event(),
                &test_subject(),
                &strings(&["0xA", "0xB", "0xC"]),
            )
            .await;

        assert_eq!(report.resolved, 3);
        assert_eq!(report.batches, 2);
        assert_eq!(report.delivered_batches(), 2);

        let requests = client.captured_requests();
        assert_eq!(requests.len(), 3);
        let first: serde_json::Value =
            serde_json::from_slice(requests[1].body.as_ref().unwrap()).unwrap();
        let second: serde_json::Value =
            serde_json::from_slice(requests[2].body.as_ref().unwrap()).unwrap();
        assert_eq!(first["accounts"], serde_json::json!(["eip155:1:0xA", "eip155:1:0xB"]));
        assert_eq!(second["accounts"], serde_json::json!(["eip155:1:0xC"]));
    }

    #[tokio::test]
    async fn failed_batch_is_captured_and_later_batches_still_sent() {
        let client = Arc::new(MockClient::new(vec![
            MockClient::ok_json(r#"["eip155:1:0xA","eip155:1:0xB"]"#),
            Err(HttpError::Timeout),
            MockClient::ok_json(r#"{"sent":1}"#),
        ]));
        let capture = CountingCapture::default();
        let dispatcher = dispatcher(client.clone(), &capture, 1);

        let report = dispatcher
            .dispatch(&start_event(), &test_subject(), &strings(&["0xA", "0xB"]))
            .await;

        assert_eq!(report.batches, 2);
        assert_eq!(report.failed_batches, 1);
        assert_eq!(report.delivered_batches(), 1);
        assert_eq!(capture.scopes(), vec!["gateway_notify"]);
        // Directory fetch plus both notify attempts.
        assert_eq!(client.calls(), 3);
    }

    #[tokio::test]
    async fn notification_payload_is_formatted_from_subject() {
        let client = Arc::new(MockClient::new(vec![
            MockClient::ok_json(r#"["eip155:1:0xABC"]"#),
            MockClient::ok_json(r#"{"sent":1}"#),
        ]));
        let capture = CountingCapture::default();
        let dispatcher = dispatcher(client.clone(), &capture, 500);

        dispatcher
            .dispatch(&start_event(), &test_subject(), &strings(&["0xABC"]))
            .await;

        let requests = client.captured_requests();
        let body: serde_json::Value =
            serde_json::from_slice(requests[1].body.as_ref().unwrap()).unwrap();
        let notification = &body["notification"];
        assert_eq!(notification["title"], "First entry");
        assert_eq!(notification["body"], "🟢 New entry from @demo.group\n\n");
        assert_eq!(notification["url"], "https://example.com/s1?app=inbox");
        assert_eq!(notification["icon"], "https://example.com/icon.png");
        assert_eq!(notification["type"], "entry_created");
    }
}
