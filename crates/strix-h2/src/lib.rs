//! HTTP/2 frame layer: the RFC 7540 wire format for frame headers and
//! every registered payload kind, plus a [`FrameCodec`] for moving
//! frames over a byte stream.
//!
//! This is the framing alone. Header blocks ride through as opaque
//! bytes; HPACK, stream states and flow-control accounting belong to a
//! layer above.

mod codec;
mod error;
mod flags;
mod frame;
mod kind;
mod payload;
mod settings;

pub use codec::{DEFAULT_MAX_FRAME_SIZE, FrameCodec};
pub use error::FrameError;
pub use flags::Flags;
pub use frame::{Frame, FrameHeader};
pub use kind::Kind;
pub use payload::{Payload, Priority};
pub use settings::{Setting, SettingId};

use bytes::BufMut;

/// Bytes in a frame header.
pub const FRAME_HEADER_LEN: usize = 9;

/// The client connection preface that precedes the first frame.
pub const PREFACE: &[u8; 24] = b"PRI * HTTP/2.0\r\n\r\nSM\r\n\r\n";

/// A stream identifier. The wire's reserved high bit is masked off on
/// parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StreamId(pub u32);

impl StreamId {
    pub fn parse(buf: &[u8]) -> StreamId {
        StreamId(read_u32(buf) & ((1 << 31) - 1))
    }

    pub fn encode(&self, dst: &mut impl BufMut) {
        dst.put_u32(self.0);
    }
}

/// An HTTP/2 error code, carried by RST_STREAM and GOAWAY.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ErrorCode(pub u32);

impl ErrorCode {
    pub fn parse(buf: &[u8]) -> ErrorCode {
        ErrorCode(read_u32(buf))
    }

    pub fn encode(&self, dst: &mut impl BufMut) {
        dst.put_u32(self.0);
    }
}

/// A WINDOW_UPDATE size increment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WindowIncrement(pub u32);

impl WindowIncrement {
    pub fn parse(buf: &[u8]) -> WindowIncrement {
        WindowIncrement(read_u32(buf))
    }

    pub fn encode(&self, dst: &mut impl BufMut) {
        dst.put_u32(self.0);
    }
}

#[inline]
pub(crate) fn read_u32(buf: &[u8]) -> u32 {
    u32::from_be_bytes([buf[0], buf[1], buf[2], buf[3]])
}

#[inline]
pub(crate) fn read_u24(buf: &[u8]) -> u32 {
    ((buf[0] as u32) << 16) | ((buf[1] as u32) << 8) | buf[2] as u32
}

#[inline]
pub(crate) fn put_u24(dst: &mut impl BufMut, val: u32) {
    dst.put_u8((val >> 16) as u8);
    dst.put_u8((val >> 8) as u8);
    dst.put_u8(val as u8);
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::BytesMut;

    #[test]
    fn stream_id_masks_reserved_bit() {
        let buf = [0xFF, 0xFF, 0xFF, 0xFF];
        assert_eq!(StreamId::parse(&buf), StreamId(0x7FFF_FFFF));
    }

    #[test]
    fn u24_roundtrip() {
        let mut buf = BytesMut::new();
        put_u24(&mut buf, 0x0102_03);
        assert_eq!(&buf[..], &[0x01, 0x02, 0x03]);
        assert_eq!(read_u24(&buf), 0x0102_03);
    }

    #[test]
    fn preface_is_24_bytes() {
        assert_eq!(PREFACE.len(), 24);
        assert!(PREFACE.starts_with(b"PRI * HTTP/2.0"));
    }
}
