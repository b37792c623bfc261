use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::fmt;
use std::net::SocketAddr;
use std::str;

use bytes::Bytes;
use url::form_urlencoded;

use crate::{HttpVersion, Method};

/// One parsed HTTP/1.x request.
///
/// Owns everything: the decode path splits the wire bytes off the
/// connection buffer, so the body is a refcounted slice of what was
/// read, not a copy.
#[derive(Clone)]
pub struct Request {
    method: Method,
    path: String,
    raw_query: Option<String>,
    version: HttpVersion,
    scheme: String,
    headers: Vec<(String, Bytes)>,
    body: Bytes,
    peer_addr: Option<SocketAddr>,
}

impl Request {
    pub fn builder(method: Method, path: &str) -> RequestBuilder {
        RequestBuilder {
            inner: Request {
                method,
                path: path.to_string(),
                raw_query: None,
                version: HttpVersion::default(),
                scheme: "http".to_string(),
                headers: Vec::new(),
                body: Bytes::new(),
                peer_addr: None,
            },
        }
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// The query string as sent, without the leading `?`.
    pub fn raw_query(&self) -> Option<&str> {
        self.raw_query.as_deref()
    }

    pub fn version(&self) -> HttpVersion {
        self.version
    }

    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    pub fn set_scheme(&mut self, scheme: &str) {
        self.scheme = scheme.to_string();
    }

    pub fn peer_addr(&self) -> Option<SocketAddr> {
        self.peer_addr
    }

    pub fn set_peer_addr(&mut self, addr: SocketAddr) {
        self.peer_addr = Some(addr);
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// The body, or `None` when it is empty.
    pub fn payload(&self) -> Option<&[u8]> {
        if self.body.is_empty() {
            None
        } else {
            Some(&self.body)
        }
    }

    /// Header iteration in received order, values as raw bytes.
    pub fn headers(&self) -> impl Iterator<Item = (&str, &[u8])> {
        self.headers.iter().map(|(k, v)| (k.as_str(), v.as_ref()))
    }

    /// Case-insensitive single-header lookup. `None` when the header is
    /// absent or its value is not UTF-8.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .and_then(|(_, v)| str::from_utf8(v).ok())
    }

    pub fn host(&self) -> &str {
        self.header("host").unwrap_or("")
    }

    pub fn user_agent(&self) -> Option<&str> {
        self.header("user-agent")
    }

    pub fn content_length(&self) -> usize {
        self.header("content-length")
            .and_then(|v| v.parse().ok())
            .unwrap_or(0)
    }

    /// Media type of the payload: `Content-Type` for POST/PUT (falling
    /// back to `application/octet-stream`), otherwise the `Accept`
    /// header (falling back to `text/plain`).
    pub fn content_type_all(&self) -> &str {
        match self.method {
            Method::Post | Method::Put => self
                .header("content-type")
                .unwrap_or("application/octet-stream"),
            _ => self.header("accept").unwrap_or("text/plain"),
        }
    }

    /// [`content_type_all`](Self::content_type_all) up to any `;`.
    pub fn content_type(&self) -> &str {
        let all = self.content_type_all();
        match all.find(';') {
            Some(index) => &all[..index],
            None => all,
        }
    }

    /// Whatever follows the `;` in the media type, trimmed. Boundary
    /// parameters and charsets live here.
    pub fn content_type_metadata(&self) -> Option<&str> {
        let all = self.content_type_all();
        all.find(';').map(|index| all[index + 1..].trim())
    }

    /// Absolute form of the request target.
    pub fn uri(&self) -> String {
        match &self.raw_query {
            Some(q) => format!("{}://{}{}?{}", self.scheme, self.host(), self.path, q),
            None => format!("{}://{}{}", self.scheme, self.host(), self.path),
        }
    }

    /// The request line as received, e.g. `GET /index.html HTTP/1.1`.
    pub fn request_line(&self) -> String {
        match &self.raw_query {
            Some(q) => format!("{} {}?{} {}", self.method, self.path, q, self.version),
            None => format!("{} {} {}", self.method, self.path, self.version),
        }
    }

    /// The query string parsed as form-urlencoded pairs, duplicate keys
    /// combined in order of appearance.
    pub fn query(&self) -> Option<HashMap<String, Vec<String>>> {
        self.raw_query
            .as_deref()
            .map(|q| Self::urldecode(q.as_bytes()))
    }

    /// Form-urlencoded decoding for arbitrary data, typically a form
    /// body.
    pub fn urldecode(data: &[u8]) -> HashMap<String, Vec<String>> {
        combine_duplicates(form_urlencoded::parse(data).into_owned())
    }

    /// Whether the connection should stay open after this exchange.
    /// HTTP/1.1 defaults to yes, HTTP/1.0 to no; a `Connection` header
    /// wins either way.
    pub fn keep_alive(&self) -> bool {
        let connection = self.header("connection").map(str::to_ascii_lowercase);
        match self.version {
            HttpVersion::Http11 => connection.as_deref() != Some("close"),
            HttpVersion::Http10 => connection.as_deref() == Some("keep-alive"),
            _ => false,
        }
    }
}

impl fmt::Debug for Request {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "<HTTP Request {} {}>", self.method, self.path)
    }
}

fn combine_duplicates<I: Iterator<Item = (String, String)>>(
    pairs: I,
) -> HashMap<String, Vec<String>> {
    let mut combined: HashMap<String, Vec<String>> = HashMap::new();
    for (k, v) in pairs {
        match combined.entry(k) {
            Entry::Occupied(entry) => entry.into_mut().push(v),
            Entry::Vacant(entry) => {
                entry.insert(vec![v]);
            }
        }
    }
    combined
}

/// Assembles a [`Request`] by hand; the decode path and tests both use
/// it.
pub struct RequestBuilder {
    inner: Request,
}

impl RequestBuilder {
    pub fn version(mut self, version: HttpVersion) -> Self {
        self.inner.version = version;
        self
    }

    pub fn raw_query(mut self, query: &str) -> Self {
        self.inner.raw_query = Some(query.to_string());
        self
    }

    pub fn header(mut self, name: &str, value: impl AsRef<[u8]>) -> Self {
        self.inner
            .headers
            .push((name.to_string(), Bytes::copy_from_slice(value.as_ref())));
        self
    }

    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.inner.body = body.into();
        self
    }

    pub fn peer_addr(mut self, addr: SocketAddr) -> Self {
        self.inner.peer_addr = Some(addr);
        self
    }

    pub fn build(self) -> Request {
        self.inner
    }
}
