use bitflags::bitflags;

use crate::FrameError;

bitflags! {
    /// Frame flag bits. ACK and END_STREAM share a value; they appear
    /// on disjoint frame types.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Flags: u8 {
        const END_STREAM = 0x1;
        const ACK = 0x1;
        const END_HEADERS = 0x4;
        const PADDED = 0x8;
        const PRIORITY = 0x20;
    }
}

impl Flags {
    /// Validating constructor for a received flags byte.
    pub fn new(byte: u8) -> Result<Flags, FrameError> {
        Flags::from_bits(byte).ok_or(FrameError::BadFlags(byte))
    }
}
