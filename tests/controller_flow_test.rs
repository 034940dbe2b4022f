//! Submit flow driven through the app state with a counting client

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use serde_json::{json, Value};

use tx_sampler::app::{App, Pane, StatusLevel};
use tx_sampler::core::Session;
use tx_sampler::domain::render::{LineKind, NO_DATA_MESSAGE};
use tx_sampler::domain::{Chain, QueryParams, SampleRequest, SampleResponse};
use tx_sampler::error::TransportError;
use tx_sampler::infrastructure::runtime::fetch_outcome;
use tx_sampler::infrastructure::SampleClient;
use tx_sampler::modules::ResultState;

enum Reply {
    Body(Value),
    Fail(TransportError),
}

struct CountingClient {
    calls: AtomicUsize,
    reply: Reply,
}

impl CountingClient {
    fn body(value: Value) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            reply: Reply::Body(value),
        }
    }

    fn failing(err: TransportError) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            reply: Reply::Fail(err),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SampleClient for CountingClient {
    async fn fetch_sample(&self, _request: &SampleRequest) -> Result<SampleResponse, TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.reply {
            Reply::Body(value) => serde_json::from_value(value.clone())
                .map_err(|err| TransportError::Decode(err.to_string())),
            Reply::Fail(err) => Err(err.clone()),
        }
    }
}

const ADDRESS: &str = "0x52908400098527886E0F7030069857D2E4169EE7";

fn app_with(address: &str) -> App {
    let session = Session::new(QueryParams::new(Chain::Ethereum, address), Default::default());
    App::new(session, "http://127.0.0.1:8080")
}

/// Submit and, if a request was produced, serve it with `client`
async fn submit_and_serve(app: &mut App, client: &CountingClient) {
    app.submit();
    if let Some((id, request)) = app.take_sample_request() {
        let outcome = fetch_outcome(client, &request).await;
        app.apply_sample_ready(id, outcome);
    }
}

#[tokio::test]
async fn test_invalid_address_never_reaches_backend() {
    let mut app = app_with(ADDRESS);
    let before = app.session.query.clone();
    app.input.set_address("0x1234");
    let client = CountingClient::body(json!({ "data": [] }));

    submit_and_serve(&mut app, &client).await;

    assert_eq!(client.calls(), 0);
    assert_eq!(app.session.query, before);
    assert_eq!(
        app.input.validation_error.as_deref(),
        Some("Invalid EVM address. Please enter a valid address.")
    );
    assert!(matches!(app.results.state(), ResultState::Idle));
}

#[tokio::test]
async fn test_valid_address_sends_one_request() {
    let mut app = app_with("");
    app.input.set_address(ADDRESS);
    let client = CountingClient::body(json!({
        "data": [{ "tx_hash": "0xabc", "block_number": 17 }]
    }));

    submit_and_serve(&mut app, &client).await;

    assert_eq!(client.calls(), 1);
    assert_eq!(app.session.query.address, ADDRESS);
    assert_eq!(
        app.share_query(),
        format!("?chain=eth&address={ADDRESS}")
    );
    assert!(app.submit_enabled());
    assert_eq!(app.pane, Pane::Results);
    assert_eq!(
        app.session.last_result.as_ref().map(|r| r.records.len()),
        Some(1)
    );
}

#[tokio::test]
async fn test_second_submit_while_in_flight_is_refused() {
    let mut app = app_with(ADDRESS);
    app.submit();
    let first = app.take_sample_request();
    assert!(first.is_some());
    assert!(!app.submit_enabled());

    app.submit();
    assert!(app.take_sample_request().is_none());
    assert_eq!(app.status_text().map(|(_, level)| level), Some(StatusLevel::Warn));

    let (id, request) = first.unwrap();
    let client = CountingClient::body(json!({ "data": [] }));
    let outcome = fetch_outcome(&client, &request).await;
    app.apply_sample_ready(id, outcome);
    assert!(app.submit_enabled());
    assert_eq!(client.calls(), 1);
}

#[tokio::test]
async fn test_error_message_shows_warning_without_sections() {
    let mut app = app_with(ADDRESS);
    let client = CountingClient::body(json!({
        "error_message": "Address has no transactions on this chain",
        "data": [{ "tx_hash": "0xignored" }]
    }));

    submit_and_serve(&mut app, &client).await;

    assert!(matches!(
        app.results.state(),
        ResultState::Warning(msg) if msg == "Address has no transactions on this chain"
    ));
    assert_eq!(app.results.section_count(), 0);
    assert!(app.session.last_result.is_none());
    assert_eq!(app.status_text().map(|(_, level)| level), Some(StatusLevel::Warn));
}

#[tokio::test]
async fn test_empty_data_shows_no_data_notice() {
    let mut app = app_with(ADDRESS);
    for body in [json!({ "data": [] }), json!({})] {
        let client = CountingClient::body(body);
        submit_and_serve(&mut app, &client).await;
        assert!(matches!(app.results.state(), ResultState::Empty));
        assert_eq!(app.status_text().map(|(text, _)| text), Some(NO_DATA_MESSAGE));
    }
}

#[tokio::test]
async fn test_record_with_logs_renders_section() {
    let mut app = app_with(ADDRESS);
    let client = CountingClient::body(json!({
        "data": [{
            "tx_hash": "0xabc",
            "logs": [["0x1", "Transfer(address,address,uint256)"]]
        }]
    }));

    submit_and_serve(&mut app, &client).await;

    let sections = app.results.sections();
    assert_eq!(sections.len(), 1);
    assert_eq!(sections[0].section.title, "Transaction 1: 0xabc");
    let fields: Vec<(&str, &str)> = sections[0]
        .section
        .body
        .lines
        .iter()
        .filter_map(|line| match &line.kind {
            LineKind::Field { label, value } => Some((label.as_str(), value.as_str())),
            _ => None,
        })
        .collect();
    assert_eq!(
        fields,
        vec![
            ("Tx Hash", "0xabc"),
            ("Event ID", "0x1"),
            ("Event Signature", "Transfer(address,address,uint256)"),
        ]
    );
}

#[tokio::test]
async fn test_transport_failure_shows_error_and_reenables_submit() {
    let mut app = app_with(ADDRESS);
    let client = CountingClient::failing(TransportError::Connect("connection refused".into()));

    submit_and_serve(&mut app, &client).await;

    assert!(matches!(app.results.state(), ResultState::Failed(msg) if msg.contains("connection refused")));
    assert_eq!(app.status_text().map(|(_, level)| level), Some(StatusLevel::Error));
    assert!(app.submit_enabled());

    let retry = CountingClient::body(json!({ "data": [{ "tx_hash": "0x1" }] }));
    submit_and_serve(&mut app, &retry).await;
    assert_eq!(retry.calls(), 1);
    assert_eq!(app.results.section_count(), 1);
}
