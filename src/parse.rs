use crate::checksum::{checksum, sum, verify_intel};
use crate::error::ParseError;
use crate::record::{Record, RecordKind};
use core::str::FromStr;

impl Record {
    /// Parses one complete Intel Hex line, e.g. `:00000001FF`.
    ///
    /// Trailing line terminators and blanks are ignored. Both end of file
    /// checksum variants are accepted. Use [`crate::Parser`] to scan a
    /// whole stream with per-record recovery instead.
    pub fn parse<T>(line: T) -> Result<Record, ParseError>
    where
        T: AsRef<[u8]>,
    {
        let line = trim_end(line.as_ref());

        let line = match line.split_first() {
            Some((&b':', rest)) => rest,
            _ => return Err(ParseError::MissingColon),
        };

        if line.len() % 2 != 0 {
            return Err(ParseError::OddLength);
        }

        let mut bytes = [0; 4 + 0xFF + 1];

        let length = line.len() / 2;
        if length < 5 {
            return Err(ParseError::Truncated);
        }
        if length > bytes.len() {
            return Err(ParseError::BadLength);
        }

        hex::decode_to_slice(line, &mut bytes[..length]).map_err(|e| match e {
            hex::FromHexError::InvalidHexCharacter { c, .. } => ParseError::InvalidDigit(c),
            _ => ParseError::OddLength,
        })?;

        let expected_checksum = bytes[length - 1];
        let bytes = &bytes[..length - 1];

        let record_type = bytes[3];
        if !verify_intel(sum(bytes), record_type, expected_checksum, true) {
            return Err(ParseError::BadChecksum(checksum(bytes), expected_checksum));
        }

        let byte_count = bytes[0];
        let data = &bytes[4..];

        if data.len() != byte_count as usize {
            return Err(ParseError::BadLength);
        }

        let kind = RecordKind::from_type(record_type).ok_or(ParseError::BadType(record_type))?;

        let mut record = Record::end_of_file(u16::from_be_bytes([bytes[1], bytes[2]]));
        record.kind = kind;
        record.bytes[..data.len()].copy_from_slice(data);
        record.length = byte_count;

        Ok(record)
    }
}

impl FromStr for Record {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Record::parse(s)
    }
}

fn trim_end(mut line: &[u8]) -> &[u8] {
    while let [rest @ .., last] = line {
        if !matches!(*last, b'\r' | b'\n' | b' ' | b'\t') {
            break;
        }
        line = rest;
    }
    line
}
