//! Typed HTTP/1.1 primitives and the wire codec used by the strix server.
//!
//! The crate is deliberately low level: a [`Request`] is the parsed,
//! owned form of one request read off a connection, a [`Response`] is a
//! status plus headers plus body, and [`Http1Codec`] moves both across a
//! byte stream incrementally.

mod codec;
pub mod date;
mod error;
mod method;
mod request;
mod response;
mod status;
mod version;

pub use codec::Http1Codec;
pub use error::HttpError;
pub use method::Method;
pub use request::{Request, RequestBuilder};
pub use response::Response;
pub use status::StatusCode;
pub use version::HttpVersion;

pub type Result<T> = std::result::Result<T, HttpError>;
