use bytes::{BufMut, Bytes};

use crate::frame::FrameHeader;
use crate::settings::{SETTING_LEN, Setting};
use crate::{ErrorCode, Flags, FrameError, Kind, StreamId, WindowIncrement, read_u32};

pub const PRIORITY_LEN: usize = 5;
const PADDING_LEN: usize = 1;

/// A parsed frame payload. Block fragments and data are refcounted
/// slices of the connection buffer, so cloning a payload is cheap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    Data(Bytes),
    Headers {
        priority: Option<Priority>,
        block: Bytes,
    },
    Priority(Priority),
    Reset(ErrorCode),
    Settings(Vec<Setting>),
    PushPromise {
        promised: StreamId,
        block: Bytes,
    },
    Ping(u64),
    GoAway {
        last: StreamId,
        error: ErrorCode,
        debug: Bytes,
    },
    WindowUpdate(WindowIncrement),
    Continuation(Bytes),
    Unregistered(Bytes),
}

impl Payload {
    pub fn kind(&self) -> Kind {
        match self {
            Payload::Data(_) => Kind::Data,
            Payload::Headers { .. } => Kind::Headers,
            Payload::Priority(_) => Kind::Priority,
            Payload::Reset(_) => Kind::Reset,
            Payload::Settings(_) => Kind::Settings,
            Payload::PushPromise { .. } => Kind::PushPromise,
            Payload::Ping(_) => Kind::Ping,
            Payload::GoAway { .. } => Kind::GoAway,
            Payload::WindowUpdate(_) => Kind::WindowUpdate,
            Payload::Continuation(_) => Kind::Continuation,
            Payload::Unregistered(_) => Kind::Unregistered,
        }
    }

    pub fn parse(header: &FrameHeader, buf: Bytes) -> Result<Payload, FrameError> {
        let padded = header.flags.contains(Flags::PADDED);
        let priority = header.flags.contains(Flags::PRIORITY);

        if buf.len() < header.length as usize {
            return Err(FrameError::Short);
        }

        let min_payload_len = match (priority, padded) {
            (true, true) => PRIORITY_LEN + PADDING_LEN,
            (true, false) => PRIORITY_LEN,
            (false, true) => PADDING_LEN,
            (false, false) => 0,
        };
        if (header.length as usize) < min_payload_len {
            return Err(FrameError::PayloadTooShort);
        }

        let buf = buf.slice(..header.length as usize);

        match header.kind {
            Kind::Data => Ok(Payload::Data(trim_padding(padded, &buf)?)),
            Kind::Headers => {
                let buf = trim_padding(padded, &buf)?;
                let (block, prio) = Priority::parse(priority, buf)?;
                Ok(Payload::Headers {
                    priority: prio,
                    block,
                })
            }
            Kind::Priority => {
                let (_, prio) = Priority::parse(true, buf)?;
                // parse(true, ..) always yields Some or an error
                prio.map(Payload::Priority)
                    .ok_or(FrameError::PayloadTooShort)
            }
            Kind::Reset => {
                if header.length < 4 {
                    return Err(FrameError::PayloadTooShort);
                }
                Ok(Payload::Reset(ErrorCode::parse(&buf)))
            }
            Kind::Settings => {
                if header.length as usize % SETTING_LEN != 0 {
                    return Err(FrameError::PartialSetting);
                }
                Ok(Payload::Settings(Setting::parse_all(&buf)))
            }
            Kind::PushPromise => {
                let buf = trim_padding(padded, &buf)?;
                if buf.len() < 4 {
                    return Err(FrameError::PayloadTooShort);
                }
                let promised = StreamId::parse(&buf);
                Ok(Payload::PushPromise {
                    promised,
                    block: buf.slice(4..),
                })
            }
            Kind::Ping => {
                if header.length != 8 {
                    return Err(FrameError::InvalidLength);
                }
                let mut data = [0u8; 8];
                data.copy_from_slice(&buf[..8]);
                Ok(Payload::Ping(u64::from_be_bytes(data)))
            }
            Kind::GoAway => {
                if header.length < 8 {
                    return Err(FrameError::PayloadTooShort);
                }
                Ok(Payload::GoAway {
                    last: StreamId::parse(&buf),
                    error: ErrorCode::parse(&buf[4..]),
                    debug: buf.slice(8..),
                })
            }
            Kind::WindowUpdate => {
                if header.length != 4 {
                    return Err(FrameError::InvalidLength);
                }
                Ok(Payload::WindowUpdate(WindowIncrement::parse(&buf)))
            }
            Kind::Continuation => Ok(Payload::Continuation(buf)),
            Kind::Unregistered => Ok(Payload::Unregistered(buf)),
        }
    }

    pub fn encode(&self, dst: &mut impl BufMut) {
        match self {
            Payload::Data(data) => dst.put_slice(data),
            Payload::Headers { priority, block } => {
                if let Some(priority) = priority {
                    priority.encode(dst);
                }
                dst.put_slice(block);
            }
            Payload::Priority(priority) => priority.encode(dst),
            Payload::Reset(error) => error.encode(dst),
            Payload::Settings(settings) => {
                for setting in settings {
                    setting.encode(dst);
                }
            }
            Payload::PushPromise { promised, block } => {
                promised.encode(dst);
                dst.put_slice(block);
            }
            Payload::Ping(data) => dst.put_u64(*data),
            Payload::GoAway { last, error, debug } => {
                last.encode(dst);
                error.encode(dst);
                dst.put_slice(debug);
            }
            Payload::WindowUpdate(increment) => increment.encode(dst),
            Payload::Continuation(block) => dst.put_slice(block),
            Payload::Unregistered(block) => dst.put_slice(block),
        }
    }

    /// Exact number of bytes [`encode`](Self::encode) will write.
    pub fn encoded_len(&self) -> usize {
        match self {
            Payload::Data(data) => data.len(),
            Payload::Headers { priority, block } => {
                let priority_len = if priority.is_some() { PRIORITY_LEN } else { 0 };
                priority_len + block.len()
            }
            Payload::Priority(_) => PRIORITY_LEN,
            Payload::Reset(_) => 4,
            Payload::Settings(settings) => settings.len() * SETTING_LEN,
            Payload::PushPromise { block, .. } => 4 + block.len(),
            Payload::Ping(_) => 8,
            Payload::GoAway { debug, .. } => 4 + 4 + debug.len(),
            Payload::WindowUpdate(_) => 4,
            Payload::Continuation(block) => block.len(),
            Payload::Unregistered(block) => block.len(),
        }
    }

    pub fn priority(&self) -> Option<&Priority> {
        match self {
            Payload::Priority(priority) => Some(priority),
            Payload::Headers { priority, .. } => priority.as_ref(),
            _ => None,
        }
    }
}

/// Stream dependency data carried by PRIORITY frames and prioritized
/// HEADERS.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Priority {
    pub exclusive: bool,
    pub dependency: StreamId,
    pub weight: u8,
}

impl Priority {
    /// Splits a priority block off the front of `buf` when `present`;
    /// passes the buffer through untouched otherwise.
    pub fn parse(present: bool, buf: Bytes) -> Result<(Bytes, Option<Priority>), FrameError> {
        if !present {
            return Ok((buf, None));
        }
        if buf.len() < PRIORITY_LEN {
            return Err(FrameError::PayloadTooShort);
        }
        let priority = Priority {
            // the exclusive marker is the most significant bit
            exclusive: buf[0] & 0x80 != 0,
            dependency: StreamId::parse(&buf),
            weight: buf[4],
        };
        Ok((buf.slice(PRIORITY_LEN..), Some(priority)))
    }

    pub fn encode(&self, dst: &mut impl BufMut) {
        let mut dependency = self.dependency.0;
        if self.exclusive {
            dependency |= 1 << 31;
        }
        dst.put_u32(dependency);
        dst.put_u8(self.weight);
    }
}

fn trim_padding(padded: bool, buf: &Bytes) -> Result<Bytes, FrameError> {
    if !padded {
        return Ok(buf.clone());
    }
    let pad_len = buf[0] as usize;
    if pad_len >= buf.len() {
        return Err(FrameError::TooMuchPadding(buf[0]));
    }
    Ok(buf.slice(1..buf.len() - pad_len))
}
