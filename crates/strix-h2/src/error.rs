use std::io;

use thiserror::Error;

/// Errors raised while parsing or framing HTTP/2 frames.
#[derive(Error, Debug)]
pub enum FrameError {
    /// A full frame header was not available.
    #[error("frame header truncated")]
    Short,

    /// The flags byte carried bits not defined for any frame type.
    #[error("unsupported flag bits: {0:#04x}")]
    BadFlags(u8),

    /// The pad length exceeded the payload it was supposed to pad.
    #[error("padding length {0} exceeds payload")]
    TooMuchPadding(u8),

    /// The payload was shorter than the frame type plus its flags
    /// require, e.g. a PRIORITY flag with no room for the dependency.
    /// Treated as a protocol error.
    #[error("payload shorter than the frame type requires")]
    PayloadTooShort,

    /// A SETTINGS payload was not a whole number of settings.
    #[error("settings payload is not a multiple of the setting size")]
    PartialSetting,

    /// The payload length was not the exact value the frame type
    /// demands (PING, WINDOW_UPDATE).
    #[error("payload length invalid for this frame type")]
    InvalidLength,

    #[error("frame payload too large: {size} bytes (max: {max})")]
    FrameTooLarge { size: usize, max: usize },

    #[error("io error: {0}")]
    Io(#[from] io::Error),
}
