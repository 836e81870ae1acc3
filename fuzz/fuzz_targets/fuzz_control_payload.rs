//! Fuzz target: `POST /control` handling.
//!
//! A rejected payload must leave the store exactly as it was.

#![no_main]

use libfuzzer_sys::fuzz_target;
use semaforo::app::state::StateStore;
use semaforo::http::codec::{Method, Request};
use semaforo::http::routes;

fuzz_target!(|data: &[u8]| {
    let store = StateStore::new();
    let before = store.snapshot();
    let resp = routes::route(&Request::new(Method::Post, "/control", data), &store);
    match resp.status {
        200 => {}
        400 => assert_eq!(store.snapshot(), before),
        other => panic!("unexpected status {other}"),
    }
});
