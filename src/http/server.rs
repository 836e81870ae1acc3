//! Control server: accept loop and connection workers.
//!
//! One task accepts TCP connections and queues them on a bounded channel;
//! [`HTTP_WORKERS`] worker tasks take connections off the queue and serve
//! exactly one request each. Everything runs on the runtime's local
//! executor and is driven by the `async-io-mini` reactor.
//!
//! ```text
//!  ┌────────────┐  Async<TcpStream>  ┌──────────┐
//!  │ accept_loop│───────────────────▶│ worker 0 │──▶ routes::route ──▶ StateStore
//!  │            │    ConnQueue (4)   │ worker 1 │
//!  └────────────┘                    └──────────┘
//! ```
//!
//! Transport failures end the connection and are logged; they never reach
//! the store and never stall the scheduler or the poller.

use core::time::Duration;
use std::net::{TcpListener, TcpStream};

use async_io_mini::{Async, Timer};
use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use embassy_sync::channel::Channel;
use futures_lite::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use log::{debug, warn};

use super::codec::{HttpError, RequestDecoder, Response};
use super::routes::{self, ErrorReply};
use crate::app::state::StateStore;
use crate::error::TransportError;

/// Connections served concurrently.
pub const HTTP_WORKERS: usize = 2;

/// Accepted connections waiting for a worker.
const CONN_QUEUE_DEPTH: usize = 4;

const READ_BUF_SIZE: usize = 1024;

/// Pause after a failed `accept` (e.g. out of file descriptors).
const ACCEPT_BACKOFF: Duration = Duration::from_millis(100);

/// Hand-off from the accept loop to the workers. Single-threaded executor,
/// so no cross-core locking is needed.
pub type ConnQueue = Channel<NoopRawMutex, Async<TcpStream>, CONN_QUEUE_DEPTH>;

/// Read one request from `stream`, answer it, and flush.
///
/// Decoder errors are answered (400/413) and count as a served request.
/// Only socket-level failures come back as `Err`.
pub async fn handle_connection<S>(stream: &mut S, store: &StateStore) -> Result<(), TransportError>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let mut decoder = RequestDecoder::new();
    let mut buf = [0u8; READ_BUF_SIZE];

    let response = loop {
        let n = stream
            .read(&mut buf)
            .await
            .map_err(|e| TransportError::Read(e.kind()))?;
        if n == 0 {
            return Err(TransportError::ClosedEarly);
        }
        match decoder.feed(&buf[..n]) {
            Ok(Some(req)) => {
                debug!("HTTP: {:?} {}", req.method, req.path);
                break routes::route(&req, store);
            }
            Ok(None) => {}
            Err(HttpError::TooLarge) => {
                warn!("HTTP: request exceeds size limit");
                break Response::json(413, &ErrorReply::new(HttpError::TooLarge.to_string()));
            }
            Err(e @ HttpError::Malformed(_)) => {
                warn!("HTTP: {}", e);
                break Response::json(400, &ErrorReply::new(e.to_string()));
            }
        }
    };

    stream
        .write_all(&response.encode())
        .await
        .map_err(|e| TransportError::Write(e.kind()))?;
    stream
        .flush()
        .await
        .map_err(|e| TransportError::Write(e.kind()))?;
    Ok(())
}

/// [`handle_connection`] bounded by `timeout`. The connection is dropped
/// (closed) when this returns.
pub async fn serve<S>(mut stream: S, store: &StateStore, timeout: Duration) -> Result<(), TransportError>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    futures_lite::future::or(handle_connection(&mut stream, store), async {
        Timer::after(timeout).await;
        Err(TransportError::Timeout)
    })
    .await
}

/// Accept connections forever and queue them for the workers.
pub async fn accept_loop(listener: &Async<TcpListener>, queue: &ConnQueue) {
    loop {
        match listener.accept().await {
            Ok((stream, peer)) => {
                debug!("HTTP: connection from {}", peer);
                queue.send(stream).await;
            }
            Err(e) => {
                warn!("HTTP: accept failed: {}", e);
                Timer::after(ACCEPT_BACKOFF).await;
            }
        }
    }
}

/// Serve queued connections forever, one at a time.
pub async fn worker(id: usize, queue: &ConnQueue, store: &StateStore, timeout: Duration) {
    loop {
        let stream = queue.receive().await;
        if let Err(e) = serve(stream, store, timeout).await {
            warn!("HTTP[{}]: connection dropped: {}", id, e);
        }
    }
}
