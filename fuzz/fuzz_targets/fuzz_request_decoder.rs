//! Fuzz target: HTTP request decoder.
//!
//! Feeds arbitrary bytes in arbitrary split points. Must never panic, and
//! any decoded request must stay within the size limit.

#![no_main]

use libfuzzer_sys::fuzz_target;
use semaforo::http::codec::{MAX_REQUEST_SIZE, RequestDecoder};

fuzz_target!(|data: &[u8]| {
    let Some((&split, rest)) = data.split_first() else {
        return;
    };
    let split = (split as usize).min(rest.len());
    let (a, b) = rest.split_at(split);

    let mut decoder = RequestDecoder::new();
    for chunk in [a, b] {
        match decoder.feed(chunk) {
            Ok(Some(req)) => {
                assert!(req.path.len() + req.body.len() <= MAX_REQUEST_SIZE);
                assert!(req.path.starts_with('/'));
                assert!(!req.path.contains('?'));
                break;
            }
            Ok(None) => {}
            Err(_) => break,
        }
    }
});
