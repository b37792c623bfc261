use std::io;

use thiserror::Error;

/// Errors surfaced by the HTTP/1.1 layer.
#[derive(Error, Debug)]
pub enum HttpError {
    #[error("failed to parse http request: {0}")]
    Parse(#[from] httparse::Error),

    #[error("invalid request method")]
    Method,

    #[error("unsupported http version: 1.{0}")]
    Version(u8),

    #[error("invalid status code: {0}")]
    Status(u16),

    #[error("request too large: {size} bytes (max: {max})")]
    TooLarge { size: usize, max: usize },

    #[error("io error: {0}")]
    Io(#[from] io::Error),
}
