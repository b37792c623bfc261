use bytes::{Buf, BufMut, BytesMut};
use tokio_util::codec::{Decoder, Encoder};

use crate::{HttpError, HttpVersion, Method, Request, Response, date};

const MAX_HEADERS: usize = 32;

pub const DEFAULT_MAX_REQUEST_SIZE: usize = 8 * 1024 * 1024;

/// HTTP/1.x wire codec: decodes [`Request`]s out of a connection
/// buffer, encodes [`Response`]s back.
///
/// Decoding is incremental: a partial head or a head whose
/// `Content-Length` body has not fully arrived yields `None` and leaves
/// the buffer untouched, so the caller keeps appending reads until a
/// full request is buffered.
#[derive(Debug, Clone)]
pub struct Http1Codec {
    max_request_size: usize,
}

impl Http1Codec {
    pub fn new(max_request_size: usize) -> Http1Codec {
        Http1Codec { max_request_size }
    }
}

impl Default for Http1Codec {
    fn default() -> Http1Codec {
        Http1Codec::new(DEFAULT_MAX_REQUEST_SIZE)
    }
}

impl Decoder for Http1Codec {
    type Item = Request;
    type Error = HttpError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Request>, HttpError> {
        if src.is_empty() {
            return Ok(None);
        }

        let (builder, head_len, content_length) = {
            let mut headers = [httparse::EMPTY_HEADER; MAX_HEADERS];
            let mut parsed = httparse::Request::new(&mut headers);

            let head_len = match parsed.parse(src)? {
                httparse::Status::Complete(n) => n,
                httparse::Status::Partial => {
                    if src.len() > self.max_request_size {
                        return Err(HttpError::TooLarge {
                            size: src.len(),
                            max: self.max_request_size,
                        });
                    }
                    return Ok(None);
                }
            };

            // httparse only reports Complete with all three present;
            // the fallbacks are for the type system, not for traffic.
            let method: Method = parsed.method.ok_or(HttpError::Method)?.parse()?;
            let minor = parsed
                .version
                .ok_or(HttpError::Parse(httparse::Error::Version))?;
            let version = HttpVersion::from_http1_minor(minor)?;
            let target = parsed
                .path
                .ok_or(HttpError::Parse(httparse::Error::Token))?;

            let content_length: usize = parsed
                .headers
                .iter()
                .find(|h| h.name.eq_ignore_ascii_case("content-length"))
                .and_then(|h| std::str::from_utf8(h.value).ok())
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(0);

            let total = head_len + content_length;
            if total > self.max_request_size {
                return Err(HttpError::TooLarge {
                    size: total,
                    max: self.max_request_size,
                });
            }
            if src.len() < total {
                src.reserve(total - src.len());
                return Ok(None);
            }

            let (path, query) = match target.find('?') {
                Some(index) => (&target[..index], Some(&target[index + 1..])),
                None => (target, None),
            };

            let mut builder = Request::builder(method, path).version(version);
            if let Some(query) = query {
                builder = builder.raw_query(query);
            }
            for h in parsed.headers.iter() {
                builder = builder.header(h.name, h.value);
            }

            (builder, head_len, content_length)
        };

        tracing::debug!("decoded request head: {} bytes, body: {} bytes", head_len, content_length);

        src.advance(head_len);
        let body = src.split_to(content_length).freeze();

        Ok(Some(builder.body(body).build()))
    }
}

impl Encoder<Response> for Http1Codec {
    type Error = HttpError;

    fn encode(&mut self, res: Response, dst: &mut BytesMut) -> Result<(), HttpError> {
        let body = res.body();
        dst.reserve(128 + res.headers().len() * 32 + body.len());

        dst.put_slice(b"HTTP/1.1 ");
        dst.put_slice(res.status().to_u16().to_string().as_bytes());
        dst.put_slice(b" ");
        dst.put_slice(res.reason().as_bytes());
        dst.put_slice(b"\r\nDate: ");
        dst.put_slice(date::now().as_bytes());
        dst.put_slice(b"\r\n");

        for (name, value) in res.headers() {
            dst.put_slice(name.as_bytes());
            dst.put_slice(b": ");
            dst.put_slice(value.as_bytes());
            dst.put_slice(b"\r\n");
        }

        if res.header("content-length").is_none() {
            dst.put_slice(b"Content-Length: ");
            dst.put_slice(body.len().to_string().as_bytes());
            dst.put_slice(b"\r\n");
        }

        dst.put_slice(b"\r\n");
        dst.put_slice(body);

        Ok(())
    }
}
