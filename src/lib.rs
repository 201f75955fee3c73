//! An 8-bit Intel Hex codec in the style of the CP/M-80 `load` and `unload`
//! commands, with Motorola S-record output.
//!
//! # Unload a binary
//!
//! ```
//! use hexload::{encode, EncodeOptions};
//!
//! let mut text = Vec::new();
//! encode(&[0x3Eu8, 0xFF, 0x87][..], &mut text, &EncodeOptions::default()).unwrap();
//!
//! assert_eq!(text, b":030100003EFF8738\n:00000001FF\n");
//! ```
//!
//! # Load it back
//!
//! ```
//! let text = ":030100003EFF8738\n:00000001FF\n";
//! let mut program = Vec::new();
//! let report = hexload::decode(text.as_bytes(), &mut program, 0x0100).unwrap();
//!
//! assert!(report.is_ok() && report.terminated);
//! assert_eq!(program, [0x3E, 0xFF, 0x87]);
//! ```
//!
//! Without the `std` feature the record, serializer and [`Parser`] types are
//! still available for use on targets without an allocator.

#![cfg_attr(not(feature = "std"), no_std)]

mod checksum;
pub mod digit;
mod dialect;
mod error;
mod parse;
mod parser;
mod record;
mod report;
mod serializer;

#[cfg(feature = "std")]
mod codec;

pub use dialect::Dialect;
pub use error::{Error, ParseError};
pub use parser::{Parser, State};
pub use record::{Record, RecordKind};
pub use report::RecordOutcome;
pub use serializer::MAX_LINE_LEN;

#[cfg(feature = "alloc")]
pub use report::DecodeReport;

#[cfg(feature = "std")]
pub use codec::{decode, decode_with, encode, DecodeOptions, EncodeOptions};

/// Intel Hex record type codes.
pub mod types {
    pub const DATA: u8 = 0x00;
    pub const END_OF_FILE: u8 = 0x01;
}
