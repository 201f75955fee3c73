use crate::record::RecordKind;
use core::fmt;

#[cfg(feature = "alloc")]
extern crate alloc;
#[cfg(feature = "alloc")]
use alloc::vec::Vec;

/// What happened to one record of a decoded stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordOutcome {
    Ok {
        address: u16,
        byte_count: u8,
        kind: RecordKind,
    },
    /// `expected` is the checksum computed from the record, `actual` the one
    /// it carried.
    ChecksumMismatch { expected: u8, actual: u8 },
    MalformedDigit,
    PrematureEndOfRecord,
    UnexpectedExtraData,
    /// Checksum was fine but the type is not data or end of file.
    UnsupportedRecordType(u8),
}

impl RecordOutcome {
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok { .. })
    }

    /// A valid end of file record.
    pub fn is_terminator(&self) -> bool {
        matches!(
            self,
            Self::Ok {
                kind: RecordKind::EndOfFile,
                ..
            }
        )
    }

    /// A valid data record with no payload. CP/M's `unload` closes files
    /// with one.
    pub fn is_empty_data(&self) -> bool {
        matches!(
            self,
            Self::Ok {
                kind: RecordKind::Data,
                byte_count: 0,
                ..
            }
        )
    }
}

impl fmt::Display for RecordOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ok {
                address,
                byte_count,
                kind,
            } => write!(f, "{:04X} {:02X} {} - Ok", address, byte_count, kind),
            Self::ChecksumMismatch { expected, actual } => write!(
                f,
                "- Error: checksum mismatch, expected {:02X} found {:02X}",
                expected, actual
            ),
            Self::MalformedDigit => write!(f, "- Error: invalid hex digit"),
            Self::PrematureEndOfRecord => write!(f, "- Error: record ends early"),
            Self::UnexpectedExtraData => write!(f, "- Error: data after checksum"),
            Self::UnsupportedRecordType(t) => {
                write!(f, "- Error: unsupported record type {:02X}", t)
            }
        }
    }
}

/// Result of a decode pass. Records are listed in input order.
#[cfg(feature = "alloc")]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecodeReport {
    pub outcomes: Vec<RecordOutcome>,
    /// No meaningful input was left unread. Line breaks, blanks, NUL and
    /// CP/M `^Z` padding after the terminator do not count.
    pub consumed: bool,
    /// A terminator record was decoded.
    pub terminated: bool,
    /// Data bytes written to the output.
    pub bytes_written: usize,
}

#[cfg(feature = "alloc")]
impl DecodeReport {
    pub fn failures(&self) -> impl Iterator<Item = &RecordOutcome> {
        self.outcomes.iter().filter(|outcome| !outcome.is_ok())
    }

    /// Every record decoded cleanly.
    pub fn is_ok(&self) -> bool {
        self.failures().next().is_none()
    }
}

#[cfg(feature = "alloc")]
impl fmt::Display for DecodeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, outcome) in self.outcomes.iter().enumerate() {
            writeln!(f, "{:>5}: {}", index + 1, outcome)?;
        }

        write!(
            f,
            "{} records, {} bad, {} bytes",
            self.outcomes.len(),
            self.failures().count(),
            self.bytes_written
        )?;
        if !self.terminated {
            write!(f, ", no end of file record")?;
        }
        if !self.consumed {
            write!(f, ", input after end of file ignored")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ok(address: u16, byte_count: u8, kind: RecordKind) -> RecordOutcome {
        RecordOutcome::Ok {
            address,
            byte_count,
            kind,
        }
    }

    #[test]
    fn terminators() {
        assert!(ok(0, 0, RecordKind::EndOfFile).is_terminator());
        assert!(!ok(0, 0, RecordKind::Data).is_terminator());
        assert!(!ok(0x0100, 3, RecordKind::Data).is_terminator());
        assert!(!RecordOutcome::MalformedDigit.is_terminator());

        assert!(ok(0, 0, RecordKind::Data).is_empty_data());
        assert!(!ok(0, 0, RecordKind::EndOfFile).is_empty_data());
        assert!(!ok(0x0100, 3, RecordKind::Data).is_empty_data());
    }

    #[test]
    fn outcome_lines() {
        assert_eq!(
            ok(0x0100, 3, RecordKind::Data).to_string(),
            "0100 03 Data - Ok"
        );
        assert_eq!(
            RecordOutcome::ChecksumMismatch {
                expected: 0x38,
                actual: 0x82
            }
            .to_string(),
            "- Error: checksum mismatch, expected 38 found 82"
        );
    }

    #[test]
    fn report_summary() {
        let report = DecodeReport {
            outcomes: vec![
                ok(0x0100, 3, RecordKind::Data),
                RecordOutcome::PrematureEndOfRecord,
                ok(0, 0, RecordKind::EndOfFile),
            ],
            consumed: true,
            terminated: true,
            bytes_written: 3,
        };

        assert!(!report.is_ok());
        assert_eq!(report.failures().count(), 1);
        assert_eq!(
            report.to_string(),
            "    1: 0100 03 Data - Ok\n\
             \x20   2: - Error: record ends early\n\
             \x20   3: 0000 00 EndOfFile - Ok\n\
             3 records, 1 bad, 3 bytes"
        );
    }

    #[test]
    fn report_notes_missing_terminator() {
        let report = DecodeReport {
            consumed: true,
            ..Default::default()
        };

        assert!(report.is_ok());
        assert_eq!(
            report.to_string(),
            "0 records, 0 bad, 0 bytes, no end of file record"
        );
    }
}
