use bytes::BufMut;

use crate::read_u32;

/// Bytes one setting occupies on the wire: u16 identifier + u32 value.
pub const SETTING_LEN: usize = 6;

/// Registered SETTINGS identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SettingId {
    HeaderTableSize,
    EnablePush,
    MaxConcurrentStreams,
    InitialWindowSize,
    MaxFrameSize,
}

impl SettingId {
    pub fn from_u16(id: u16) -> Option<SettingId> {
        match id {
            0x1 => Some(SettingId::HeaderTableSize),
            0x2 => Some(SettingId::EnablePush),
            0x3 => Some(SettingId::MaxConcurrentStreams),
            0x4 => Some(SettingId::InitialWindowSize),
            0x5 => Some(SettingId::MaxFrameSize),
            _ => None,
        }
    }

    pub fn as_u16(self) -> u16 {
        match self {
            SettingId::HeaderTableSize => 0x1,
            SettingId::EnablePush => 0x2,
            SettingId::MaxConcurrentStreams => 0x3,
            SettingId::InitialWindowSize => 0x4,
            SettingId::MaxFrameSize => 0x5,
        }
    }
}

/// A single SETTINGS entry. Unknown identifiers are kept numerically so
/// they survive a re-encode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Setting {
    id: u16,
    value: u32,
}

impl Setting {
    pub fn new(id: SettingId, value: u32) -> Setting {
        Setting {
            id: id.as_u16(),
            value,
        }
    }

    pub fn raw(id: u16, value: u32) -> Setting {
        Setting { id, value }
    }

    pub fn identifier(&self) -> Option<SettingId> {
        SettingId::from_u16(self.id)
    }

    pub fn raw_id(&self) -> u16 {
        self.id
    }

    pub fn value(&self) -> u32 {
        self.value
    }

    /// Decodes a whole SETTINGS payload. The caller has already checked
    /// divisibility by [`SETTING_LEN`].
    pub(crate) fn parse_all(buf: &[u8]) -> Vec<Setting> {
        buf.chunks_exact(SETTING_LEN)
            .map(|chunk| Setting {
                id: u16::from_be_bytes([chunk[0], chunk[1]]),
                value: read_u32(&chunk[2..]),
            })
            .collect()
    }

    pub(crate) fn encode(&self, dst: &mut impl BufMut) {
        dst.put_u16(self.id);
        dst.put_u32(self.value);
    }
}
