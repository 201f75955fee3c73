use crate::checksum::{checksum, ones_complement};
use core::fmt;

/// The on-wire grammar and checksum rule of a record stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Dialect {
    /// `:LLAAAATT...CC`, two's complement checksum.
    #[default]
    IntelHex,
    /// `S1`/`S9` records, one's complement checksum. Encoding only.
    MotorolaS,
}

impl Dialect {
    /// Load address used when the caller does not pick one. CP/M programs
    /// start at the TPA, Motorola images at zero.
    pub fn default_base_address(self) -> u16 {
        match self {
            Self::IntelHex => 0x0100,
            Self::MotorolaS => 0x0000,
        }
    }

    /// Largest payload a single record can carry.
    pub fn max_record_len(self) -> u8 {
        match self {
            Self::IntelHex => 0xFF,
            // the count byte also covers the address and checksum
            Self::MotorolaS => 0xFF - 3,
        }
    }

    /// Checksum over the record's header and data bytes, checksum excluded.
    pub fn checksum(self, bytes: &[u8]) -> u8 {
        match self {
            Self::IntelHex => checksum(bytes),
            Self::MotorolaS => ones_complement(bytes),
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IntelHex => write!(f, "Intel Hex"),
            Self::MotorolaS => write!(f, "Motorola S"),
        }
    }
}
