//! Integration tests for the request path: raw bytes → decoder → routes
//! → StateStore → encoded response.

use std::time::Duration;

use semaforo::app::state::{OperatingMode, SignalState, StateStore};
use semaforo::error::TransportError;
use semaforo::http::codec::MAX_REQUEST_SIZE;
use semaforo::http::routes::{ControlReply, ErrorReply, StatusBody};
use semaforo::http::server;

use super::mock_hw::{MockStream, SilentStream, exchange, exchange_result, get, post_control};

fn status_of(store: &StateStore) -> StatusBody {
    let resp = exchange(store, &get("/status"));
    assert_eq!(resp.status(), 200);
    serde_json::from_str(resp.body()).unwrap()
}

#[test]
fn control_then_status_round_trip() {
    let store = StateStore::new();

    let resp = exchange(&store, &post_control(r#"{"mode":"manual","light":"green"}"#));
    assert_eq!(resp.status(), 200);
    let reply: ControlReply = serde_json::from_str(resp.body()).unwrap();
    assert!(reply.ok);
    assert_eq!(reply.mode, OperatingMode::Manual);
    assert_eq!(reply.light, SignalState::Green);

    let status = status_of(&store);
    assert_eq!(status.mode, OperatingMode::Manual);
    assert_eq!(status.light, SignalState::Green);
}

#[test]
fn invalid_mode_returns_error_and_leaves_mode() {
    let store = StateStore::new();
    let resp = exchange(&store, &post_control(r#"{"mode":"sideways"}"#));
    assert_eq!(resp.status(), 400);
    let err: ErrorReply = serde_json::from_str(resp.body()).unwrap();
    assert!(!err.ok);
    assert_eq!(status_of(&store).mode, OperatingMode::Auto);
}

#[test]
fn unknown_field_is_rejected() {
    let store = StateStore::new();
    let resp = exchange(&store, &post_control(r#"{"mode":"manual","colour":"red"}"#));
    assert_eq!(resp.status(), 400);
    assert_eq!(status_of(&store).mode, OperatingMode::Auto);
}

#[test]
fn malformed_json_is_rejected() {
    let store = StateStore::new();
    let resp = exchange(&store, &post_control(r#"{"mode":"#));
    assert_eq!(resp.status(), 400);
    assert!(resp.body().contains(r#""ok":false"#));
}

#[test]
fn post_without_body_says_no_body() {
    let store = StateStore::new();
    let resp = exchange(&store, b"POST /control HTTP/1.1\r\nContent-Length: 0\r\n\r\n");
    assert_eq!(resp.status(), 400);
    assert_eq!(resp.body(), r#"{"ok":false,"error":"no body"}"#);
}

#[test]
fn unknown_path_and_method_are_404() {
    let store = StateStore::new();
    assert_eq!(exchange(&store, &get("/favicon.ico")).status(), 404);
    assert_eq!(
        exchange(&store, b"PUT /control HTTP/1.1\r\nContent-Length: 0\r\n\r\n").status(),
        404
    );
}

#[test]
fn index_page_is_html() {
    let store = StateStore::new();
    let resp = exchange(&store, &get("/"));
    assert_eq!(resp.status(), 200);
    assert!(resp.output_str().contains("Content-Type: text/html"));
    assert!(resp.body().contains("<b id=\"mode\">auto</b>"));
}

#[test]
fn request_split_into_tiny_reads_is_decoded() {
    let store = StateStore::new();
    let mut stream = MockStream::chunked(&post_control(r#"{"light":"yellow"}"#), 3);
    futures_lite::future::block_on(server::handle_connection(&mut stream, &store)).unwrap();
    assert_eq!(stream.status(), 200);
    assert!(stream.flushed);
    assert_eq!(store.snapshot().light, SignalState::Yellow);
}

#[test]
fn oversize_request_is_413() {
    let store = StateStore::new();
    let raw = format!(
        "POST /control HTTP/1.1\r\nContent-Length: {}\r\n\r\n",
        MAX_REQUEST_SIZE * 2
    );
    let resp = exchange(&store, raw.as_bytes());
    assert_eq!(resp.status(), 413);
}

#[test]
fn max_usize_content_length_is_413() {
    let store = StateStore::new();
    let raw = format!(
        "POST /control HTTP/1.1\r\nContent-Length: {}\r\n\r\n",
        usize::MAX
    );
    let resp = exchange(&store, raw.as_bytes());
    assert_eq!(resp.status(), 413);
    assert_eq!(store.snapshot(), semaforo::app::state::SystemState::INITIAL);
}

#[test]
fn chunked_transfer_is_rejected() {
    let store = StateStore::new();
    let resp = exchange(
        &store,
        b"POST /control HTTP/1.1\r\nTransfer-Encoding: chunked\r\n\r\n5\r\n{}\r\n0\r\n\r\n",
    );
    assert_eq!(resp.status(), 400);
    assert_eq!(store.snapshot().mode, OperatingMode::Auto);
}

#[test]
fn every_response_closes_the_connection() {
    let store = StateStore::new();
    for raw in [get("/status"), get("/nope"), post_control("{}")] {
        let resp = exchange(&store, &raw);
        assert!(resp.output_str().contains("Connection: close\r\n"));
    }
}

#[test]
fn peer_closing_mid_request_is_a_transport_error() {
    let store = StateStore::new();
    let err = exchange_result(&store, b"POST /control HTTP/1.1\r\nContent-Length: 40\r\n\r\n{")
        .err();
    assert_eq!(err, Some(TransportError::ClosedEarly));
    assert_eq!(store.snapshot().mode, OperatingMode::Auto);
}

#[test]
fn silent_peer_times_out() {
    let store = StateStore::new();
    let res = futures_lite::future::block_on(server::serve(
        SilentStream,
        &store,
        Duration::from_millis(50),
    ));
    assert_eq!(res, Err(TransportError::Timeout));
}
