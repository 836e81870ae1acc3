//! Request routing: the control API contract over the [`StateStore`].
//!
//! | Method | Path       | Handler   |
//! |--------|------------|-----------|
//! | GET    | `/`        | status page (HTML) |
//! | GET    | `/status`  | snapshot as JSON   |
//! | POST   | `/control` | validate, apply, echo mode/light |
//!
//! Everything else is 404. Handlers only touch the store; none of them
//! waits on the sensor or the lamps.

use log::{info, warn};
use serde::{Deserialize, Serialize};

use super::codec::{Method, Request, Response};
use crate::app::commands::ControlCommand;
use crate::app::state::{OperatingMode, SignalState, StateStore, SystemState};

const PAGE_TEMPLATE: &str = include_str!("page.html");

/// `GET /status` body.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatusBody {
    pub mode: OperatingMode,
    pub light: SignalState,
    pub temp: Option<f32>,
    pub hum: Option<f32>,
    pub last: Option<u64>,
}

impl From<SystemState> for StatusBody {
    fn from(s: SystemState) -> Self {
        Self {
            mode: s.mode,
            light: s.light,
            temp: s.sample.temperature_c,
            hum: s.sample.humidity_pct,
            last: s.sample.captured_at,
        }
    }
}

/// `POST /control` success body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlReply {
    pub ok: bool,
    pub mode: OperatingMode,
    pub light: SignalState,
}

/// Any rejected request with a JSON body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorReply {
    pub ok: bool,
    pub error: String,
}

impl ErrorReply {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            ok: false,
            error: error.into(),
        }
    }
}

/// Dispatch one request on method and path.
pub fn route(req: &Request, store: &StateStore) -> Response {
    match (req.method, req.path.as_str()) {
        (Method::Get, "/") => index(store),
        (Method::Get, "/status") => status(store),
        (Method::Post, "/control") => control(&req.body, store),
        _ => Response::text(404, "not found"),
    }
}

fn index(store: &StateStore) -> Response {
    let snap = store.snapshot();
    let last = snap
        .sample
        .captured_at
        .map_or_else(|| "--".to_owned(), |at| at.to_string());
    Response::html(
        PAGE_TEMPLATE
            .replace("{{mode}}", snap.mode.as_str())
            .replace("{{light}}", snap.light.as_str())
            .replace("{{last}}", &last),
    )
}

fn status(store: &StateStore) -> Response {
    Response::json(200, &StatusBody::from(store.snapshot()))
}

fn control(body: &[u8], store: &StateStore) -> Response {
    let cmd = match ControlCommand::parse(body) {
        Ok(cmd) => cmd,
        Err(e) => {
            warn!("HTTP: rejected control request: {}", e);
            return Response::json(400, &ErrorReply::new(e.to_string()));
        }
    };

    let after = store.apply(&cmd);
    if !cmd.is_empty() {
        info!("HTTP: control applied -> mode={} light={}", after.mode, after.light);
    }
    Response::json(
        200,
        &ControlReply {
            ok: true,
            mode: after.mode,
            light: after.light,
        },
    )
}
