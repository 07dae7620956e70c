//! Domain error types shared across the codec, protocol, and dispatch layers.

use thiserror::Error;

/// Failure decoding/encoding the DWC base64 dialect.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("malformed DWC base64: {0}")]
    Base64(#[from] base64::DecodeError),
}

/// Failure parsing or serializing one of the fixed binary lobby records.
#[derive(Debug, Error)]
pub enum FormatError {
    #[error("buffer too short: expected at least {expected} bytes, got {actual}")]
    TooShort { expected: usize, actual: usize },
    #[error("trailing bytes after parsing: consumed {consumed} of {total}")]
    TrailingBytes { consumed: usize, total: usize },
    #[error("unknown room type value {0}")]
    UnknownRoomType(u8),
    #[error("unknown season value {0}")]
    UnknownSeason(u8),
    #[error("unknown plaza event kind {0}")]
    UnknownEventKind(i32),
}

/// Failure parsing a UTM envelope. Per spec §4.1 these are always
/// logged and never propagated to the sender.
#[derive(Debug, Error)]
pub enum UtmError {
    #[error("expected 8 space-separated tokens, got {0}")]
    WrongTokenCount(usize),
    #[error("expected constant token [{field}]={expected:?}, got {actual:?}")]
    BadConstant {
        field: &'static str,
        expected: &'static str,
        actual: String,
    },
    #[error("unknown message encoding {0:?}")]
    UnknownEncoding(String),
    #[error("bad type token: {0}")]
    BadType(#[from] std::num::ParseIntError),
    #[error(transparent)]
    Codec(#[from] CodecError),
}
