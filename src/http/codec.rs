//! Streaming HTTP/1.x request decoder and response encoder.
//!
//! The decoder accumulates incoming bytes into a fixed buffer and yields a
//! [`Request`] once the head and the full `Content-Length` body are in.
//! A single socket read may deliver part of the request line, a header
//! split across two reads, or the whole request at once.
//!
//! Only what the control API needs is supported: one request per
//! connection, `Content-Length` bodies, no chunked transfer coding.

use heapless::Vec;

/// Upper bound on head + body. Larger requests are answered with 413.
pub const MAX_REQUEST_SIZE: usize = 4096;

const HEAD_TERMINATOR: &[u8] = b"\r\n\r\n";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    /// Any other token. Routed to 404.
    Other,
}

impl Method {
    fn from_token(token: &str) -> Self {
        match token {
            "GET" => Self::Get,
            "POST" => Self::Post,
            _ => Self::Other,
        }
    }
}

/// A fully received request. The query string is already stripped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub method: Method,
    pub path: String,
    pub body: std::vec::Vec<u8>,
}

impl Request {
    pub fn new(method: Method, path: &str, body: &[u8]) -> Self {
        Self {
            method,
            path: path.to_owned(),
            body: body.to_vec(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpError {
    /// Head or declared body exceeds [`MAX_REQUEST_SIZE`].
    TooLarge,
    /// Unparsable request line or headers.
    Malformed(&'static str),
}

impl core::fmt::Display for HttpError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::TooLarge => write!(f, "request too large"),
            Self::Malformed(why) => write!(f, "malformed request: {why}"),
        }
    }
}

impl std::error::Error for HttpError {}

/// Decoder state machine.
#[derive(Debug, Clone, Copy)]
enum DecoderState {
    /// Waiting for the blank line that ends the head.
    ReadingHead,
    /// Head parsed, waiting for `content_length` body bytes after `head_len`.
    ReadingBody {
        method: Method,
        path_end: usize,
        head_len: usize,
        content_length: usize,
    },
}

/// Streaming request decoder.
pub struct RequestDecoder {
    state: DecoderState,
    buf: Vec<u8, MAX_REQUEST_SIZE>,
    /// Start of the path inside `buf` (after the method token).
    path_start: usize,
}

impl Default for RequestDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestDecoder {
    pub fn new() -> Self {
        Self {
            state: DecoderState::ReadingHead,
            buf: Vec::new(),
            path_start: 0,
        }
    }

    /// Feed bytes into the decoder.
    ///
    /// Returns `Ok(Some(request))` once the request is complete and
    /// `Ok(None)` while more bytes are needed. Bytes past the declared body
    /// are ignored.
    pub fn feed(&mut self, data: &[u8]) -> Result<Option<Request>, HttpError> {
        if self.buf.extend_from_slice(data).is_err() {
            if let DecoderState::ReadingBody { .. } = self.state {
                // Declared length already fit; anything more is pipelined junk.
                let room = MAX_REQUEST_SIZE - self.buf.len();
                let _ = self.buf.extend_from_slice(&data[..room.min(data.len())]);
            } else {
                return Err(HttpError::TooLarge);
            }
        }

        if let DecoderState::ReadingHead = self.state {
            let Some(pos) = find(&self.buf, HEAD_TERMINATOR) else {
                return Ok(None);
            };
            self.state = self.parse_head(pos + HEAD_TERMINATOR.len())?;
        }

        match self.state {
            DecoderState::ReadingBody {
                method,
                path_end,
                head_len,
                content_length,
            } => {
                if self.buf.len() < head_len + content_length {
                    return Ok(None);
                }
                // The head was validated as UTF-8 in `parse_head`.
                let path = core::str::from_utf8(&self.buf[self.path_start..path_end])
                    .map_err(|_| HttpError::Malformed("invalid utf-8 in head"))?;
                let body = &self.buf[head_len..head_len + content_length];
                Ok(Some(Request::new(method, path, body)))
            }
            DecoderState::ReadingHead => Ok(None),
        }
    }

    /// Parse the request line and headers in `buf[..head_len]`.
    fn parse_head(&mut self, head_len: usize) -> Result<DecoderState, HttpError> {
        let head = core::str::from_utf8(&self.buf[..head_len])
            .map_err(|_| HttpError::Malformed("invalid utf-8 in head"))?;
        let mut lines = head.split("\r\n");

        let request_line = lines.next().unwrap_or_default();
        let mut parts = request_line.split(' ');
        let (Some(method), Some(target), Some(version), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(HttpError::Malformed("bad request line"));
        };
        if version != "HTTP/1.1" && version != "HTTP/1.0" {
            return Err(HttpError::Malformed("unsupported http version"));
        }
        if !target.starts_with('/') {
            return Err(HttpError::Malformed("bad request target"));
        }
        let path_len = target.find('?').unwrap_or(target.len());

        let mut content_length = 0usize;
        for line in lines.take_while(|l| !l.is_empty()) {
            let Some((name, value)) = line.split_once(':') else {
                return Err(HttpError::Malformed("bad header line"));
            };
            let value = value.trim();
            if name.eq_ignore_ascii_case("content-length") {
                content_length = parse_content_length(value)?;
            } else if name.eq_ignore_ascii_case("transfer-encoding") {
                return Err(HttpError::Malformed("transfer-encoding not supported"));
            }
        }

        if content_length > MAX_REQUEST_SIZE.saturating_sub(head_len) {
            return Err(HttpError::TooLarge);
        }

        self.path_start = method.len() + 1;
        Ok(DecoderState::ReadingBody {
            method: Method::from_token(method),
            path_end: self.path_start + path_len,
            head_len,
            content_length,
        })
    }

    /// Discard buffered bytes and start over.
    pub fn reset(&mut self) {
        self.state = DecoderState::ReadingHead;
        self.buf.clear();
        self.path_start = 0;
    }
}

/// Digits only: no sign, no whitespace inside. A value too big for
/// `usize` is still a length, just an oversize one.
fn parse_content_length(value: &str) -> Result<usize, HttpError> {
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(HttpError::Malformed("bad content-length"));
    }
    value.parse().map_err(|_| HttpError::TooLarge)
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

// ───────────────────────────────────────────────────────────────
// Responses
// ───────────────────────────────────────────────────────────────

pub const CONTENT_TYPE_JSON: &str = "application/json";
pub const CONTENT_TYPE_HTML: &str = "text/html; charset=utf-8";
pub const CONTENT_TYPE_TEXT: &str = "text/plain; charset=utf-8";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub content_type: &'static str,
    pub body: std::vec::Vec<u8>,
}

impl Response {
    /// Serialize `value` as the JSON body.
    pub fn json<T: serde::Serialize>(status: u16, value: &T) -> Self {
        match serde_json::to_vec(value) {
            Ok(body) => Self {
                status,
                content_type: CONTENT_TYPE_JSON,
                body,
            },
            Err(e) => {
                log::error!("HTTP: response serialization failed: {}", e);
                Self::text(500, "internal error")
            }
        }
    }

    pub fn html(body: String) -> Self {
        Self {
            status: 200,
            content_type: CONTENT_TYPE_HTML,
            body: body.into_bytes(),
        }
    }

    pub fn text(status: u16, body: &str) -> Self {
        Self {
            status,
            content_type: CONTENT_TYPE_TEXT,
            body: body.as_bytes().to_vec(),
        }
    }

    pub fn body_str(&self) -> &str {
        core::str::from_utf8(&self.body).unwrap_or_default()
    }

    /// Status line, headers and body, ready for the socket.
    pub fn encode(&self) -> std::vec::Vec<u8> {
        let head = format!(
            "HTTP/1.1 {} {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
            self.status,
            reason_phrase(self.status),
            self.content_type,
            self.body.len()
        );
        let mut out = head.into_bytes();
        out.extend_from_slice(&self.body);
        out
    }
}

fn reason_phrase(status: u16) -> &'static str {
    match status {
        200 => "OK",
        400 => "Bad Request",
        404 => "Not Found",
        408 => "Request Timeout",
        413 => "Payload Too Large",
        500 => "Internal Server Error",
        _ => "",
    }
}
