use std::fmt;

use bytes::Bytes;

use crate::StatusCode;

/// An HTTP response under construction.
///
/// Defaults to `200 OK` with an empty body. `Content-Length` is filled
/// in by the encoder from the body unless a handler set one explicitly
/// (a HEAD handler advertising a length it will not send, for example).
#[derive(Clone, Default)]
pub struct Response {
    status: StatusCode,
    reason: Option<String>,
    headers: Vec<(String, String)>,
    body: Bytes,
}

impl Response {
    pub fn new() -> Response {
        Response::default()
    }

    #[inline]
    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self.reason = None;
        self
    }

    /// A non-canonical status line, e.g. `599 Upstream Gave Up`.
    pub fn status_code(mut self, code: u16, reason: &str) -> Self {
        self.status = StatusCode::from_u16(code);
        self.reason = Some(reason.to_string());
        self
    }

    #[inline]
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    #[inline]
    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// The text after the code on the status line.
    pub fn reason(&self) -> &str {
        match &self.reason {
            Some(reason) => reason,
            None => self.status.canonical_reason().unwrap_or(""),
        }
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Drops the body while keeping the advertised length, for HEAD
    /// responses.
    pub fn into_head(mut self) -> Self {
        if self.header("content-length").is_none() {
            let len = self.body.len().to_string();
            self.headers.push(("Content-Length".to_string(), len));
        }
        self.body = Bytes::new();
        self
    }
}

impl fmt::Debug for Response {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "<HTTP Response {} {} ({} bytes)>",
            self.status.to_u16(),
            self.reason(),
            self.body.len()
        )
    }
}
