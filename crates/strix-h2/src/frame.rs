use bytes::{BufMut, Bytes, BytesMut};

use crate::{
    FRAME_HEADER_LEN, Flags, FrameError, Kind, Payload, StreamId, put_u24, read_u24,
};

/// The 9-byte header in front of every frame: 24-bit payload length,
/// type, flags, stream identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHeader {
    pub length: u32,
    pub kind: Kind,
    pub flags: Flags,
    pub stream: StreamId,
}

impl FrameHeader {
    pub fn parse(buf: &[u8]) -> Result<FrameHeader, FrameError> {
        if buf.len() < FRAME_HEADER_LEN {
            return Err(FrameError::Short);
        }
        Ok(FrameHeader {
            length: read_u24(buf),
            kind: Kind::new(buf[3]),
            flags: Flags::new(buf[4])?,
            stream: StreamId::parse(&buf[5..]),
        })
    }

    pub fn encode(&self, dst: &mut impl BufMut) {
        put_u24(dst, self.length);
        dst.put_u8(self.kind.encode());
        dst.put_u8(self.flags.bits());
        self.stream.encode(dst);
    }
}

/// One whole frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub header: FrameHeader,
    pub payload: Payload,
}

impl Frame {
    /// Parses the payload that follows an already-parsed header.
    pub fn parse(header: FrameHeader, buf: Bytes) -> Result<Frame, FrameError> {
        Ok(Frame {
            payload: Payload::parse(&header, buf)?,
            header,
        })
    }

    /// Builds a frame around a payload, deriving the header length.
    pub fn new(flags: Flags, stream: StreamId, payload: Payload) -> Frame {
        Frame {
            header: FrameHeader {
                length: payload.encoded_len() as u32,
                kind: payload.kind(),
                flags,
                stream,
            },
            payload,
        }
    }

    /// Encodes header and payload. The header length is re-derived from
    /// the payload so the two can never disagree on the wire.
    pub fn encode(&self, dst: &mut BytesMut) -> usize {
        let payload_len = self.payload.encoded_len();
        dst.reserve(FRAME_HEADER_LEN + payload_len);

        let header = FrameHeader {
            length: payload_len as u32,
            ..self.header
        };
        header.encode(dst);
        self.payload.encode(dst);

        FRAME_HEADER_LEN + payload_len
    }

    pub fn encoded_len(&self) -> usize {
        FRAME_HEADER_LEN + self.payload.encoded_len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_roundtrip() {
        let header = FrameHeader {
            length: 0x4321,
            kind: Kind::Headers,
            flags: Flags::END_HEADERS | Flags::END_STREAM,
            stream: StreamId(77),
        };
        let mut buf = BytesMut::new();
        header.encode(&mut buf);
        assert_eq!(buf.len(), FRAME_HEADER_LEN);
        assert_eq!(FrameHeader::parse(&buf).unwrap(), header);
    }

    #[test]
    fn short_header_rejected() {
        assert!(matches!(
            FrameHeader::parse(&[0; 8]),
            Err(FrameError::Short)
        ));
    }

    #[test]
    fn bad_flag_bits_rejected() {
        let raw = [0, 0, 0, 0, 0xFF, 0, 0, 0, 1];
        assert!(matches!(
            FrameHeader::parse(&raw),
            Err(FrameError::BadFlags(0xFF))
        ));
    }

    #[test]
    fn frame_roundtrip() {
        let frame = Frame::new(
            Flags::END_STREAM,
            StreamId(5),
            Payload::Data(Bytes::from_static(b"payload bytes")),
        );

        let mut buf = BytesMut::new();
        let wrote = frame.encode(&mut buf);
        assert_eq!(wrote, frame.encoded_len());
        assert_eq!(wrote, buf.len());

        let header = FrameHeader::parse(&buf).unwrap();
        let parsed = Frame::parse(header, buf.split_off(FRAME_HEADER_LEN).freeze()).unwrap();
        assert_eq!(parsed, frame);
    }

    #[test]
    fn encode_fixes_stale_length() {
        let mut frame = Frame::new(
            Flags::empty(),
            StreamId(1),
            Payload::Data(Bytes::from_static(b"12345678")),
        );
        frame.header.length = 3; // stale
        let mut buf = BytesMut::new();
        frame.encode(&mut buf);
        assert_eq!(FrameHeader::parse(&buf).unwrap().length, 8);
    }
}
