use std::fmt::{self, Display};

use mime::Mime;

use crate::bridge::Bridge;
use crate::error::ApiResult;

pub mod api;
pub mod extractor;
pub mod upnp;

pub const DESCRIPTION_PATH: &str = "/description.xml";
pub const API_ROOT: &str = "/api";

const HEADER_END: &[u8] = b"\r\n\r\n";

/// A request, reduced to the parts the bridge looks at
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Request {
    pub method: String,
    pub path: String,
    pub body: String,
}

impl Request {
    #[must_use]
    pub fn new(method: impl Into<String>, path: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            body: body.into(),
        }
    }

    /// Split a raw request into method (first word), path (second word) and
    /// body (everything after the first blank line). Never fails: missing
    /// parts are left empty.
    #[must_use]
    pub fn parse(data: &[u8]) -> Self {
        let text = String::from_utf8_lossy(data);

        let mut words = text.split_ascii_whitespace();
        let method = words.next().unwrap_or_default();
        let path = words.next().unwrap_or_default();

        let body = text
            .find("\r\n\r\n")
            .map(|pos| &text[pos + 4..])
            .or_else(|| text.find("\n\n").map(|pos| &text[pos + 2..]))
            .unwrap_or_default();

        Self::new(method, path, body.replace('\r', ""))
    }

    /// Length of the request line and headers, blank line included
    #[must_use]
    pub fn header_len(data: &[u8]) -> Option<usize> {
        let pos = data.windows(HEADER_END.len()).position(|w| w == HEADER_END)?;
        Some(pos + HEADER_END.len())
    }

    /// Total length of the request at the start of `data`, once the headers
    /// and the `Content-Length` bytes of body have arrived.
    ///
    /// Without a `Content-Length`, a GET has no body, and any other request
    /// takes whatever followed the headers, once something has.
    #[must_use]
    pub fn complete_len(data: &[u8]) -> Option<usize> {
        let header_len = Self::header_len(data)?;

        let headers = String::from_utf8_lossy(&data[..header_len]);
        let content_length = headers
            .lines()
            .filter_map(|line| line.split_once(':'))
            .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
            .and_then(|(_, value)| value.trim().parse::<usize>().ok());

        match content_length {
            Some(len) => {
                let total = header_len.checked_add(len)?;
                (data.len() >= total).then_some(total)
            }
            None if data.starts_with(b"GET") => Some(header_len),
            None => (data.len() > header_len).then_some(data.len()),
        }
    }

    #[must_use]
    pub fn is_get(&self) -> bool {
        self.method.starts_with("GET")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: &'static str,
    pub mime: Mime,
    pub body: String,
}

impl Response {
    #[must_use]
    pub const fn new(status: &'static str, mime: Mime, body: String) -> Self {
        Self { status, mime, body }
    }

    #[must_use]
    pub const fn ok(mime: Mime, body: String) -> Self {
        Self::new("200 OK", mime, body)
    }

    #[must_use]
    pub const fn json(body: String) -> Self {
        Self::ok(mime::APPLICATION_JSON, body)
    }

    #[must_use]
    pub const fn xml(body: String) -> Self {
        Self::ok(mime::TEXT_XML, body)
    }

    #[must_use]
    pub const fn not_found() -> Self {
        Self::new("404 Not Found", mime::TEXT_PLAIN, String::new())
    }

    #[must_use]
    pub const fn internal_error() -> Self {
        Self::new("500 Internal Server Error", mime::TEXT_PLAIN, String::new())
    }

    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        self.to_string().into_bytes()
    }
}

impl Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "HTTP/1.1 {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            self.status,
            self.mime,
            self.body.len(),
            self.body
        )
    }
}

/// Dispatch a request. `Ok(None)` means no route handled it.
pub fn route(bridge: &mut Bridge, req: &Request) -> ApiResult<Option<Response>> {
    if req.path == DESCRIPTION_PATH {
        return upnp::description_xml(bridge).map(Some);
    }

    if req.path.starts_with(API_ROOT) {
        return if req.is_get() {
            api::get_lights(bridge, &req.path)
        } else {
            api::put_light_state(bridge, &req.path, &req.body)
        };
    }

    log::debug!("No route for {} {}", req.method, req.path);
    Ok(None)
}
