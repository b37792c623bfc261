use std::fmt;

use crate::HttpError;

/// Version of the HTTP protocol in use on a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum HttpVersion {
    /// `HTTP/0.9`
    Http09,
    /// `HTTP/1.0`
    Http10,
    /// `HTTP/1.1`
    #[default]
    Http11,
    /// `HTTP/2.0` over TLS
    H2,
    /// `HTTP/2.0` over cleartext
    H2c,
}

impl HttpVersion {
    /// Maps the minor version reported by `httparse` for an `HTTP/1.x`
    /// request line.
    pub fn from_http1_minor(minor: u8) -> Result<HttpVersion, HttpError> {
        match minor {
            0 => Ok(HttpVersion::Http10),
            1 => Ok(HttpVersion::Http11),
            other => Err(HttpError::Version(other)),
        }
    }
}

impl fmt::Display for HttpVersion {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            HttpVersion::Http09 => "HTTP/0.9",
            HttpVersion::Http10 => "HTTP/1.0",
            HttpVersion::Http11 => "HTTP/1.1",
            HttpVersion::H2 => "h2",
            HttpVersion::H2c => "h2c",
        })
    }
}
