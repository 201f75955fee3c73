use thiserror::Error;

/// Errors that end an encode or decode call.
#[derive(Debug, Error)]
pub enum Error {
    /// The underlying reader or writer failed.
    #[cfg(feature = "std")]
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("record length {len} is outside 1..={max}")]
    InvalidRecordLength { len: usize, max: u8 },

    #[error("buffer of {available} bytes cannot hold a {needed} byte record")]
    BufferTooSmall { needed: usize, available: usize },
}

/// Why a single line failed to parse as a record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("record does not start with ':'")]
    MissingColon,
    #[error("record has an odd number of digits")]
    OddLength,
    #[error("invalid hex digit {0:?}")]
    InvalidDigit(char),
    #[error("record is too short")]
    Truncated,
    #[error("checksum mismatch, expected {0:02X} found {1:02X}")]
    BadChecksum(u8, u8),
    #[error("byte count does not match the data length")]
    BadLength,
    #[error("unsupported record type {0:02X}")]
    BadType(u8),
}
