use crate::error::Error;
use crate::types;
use core::fmt;

/// Record types this crate reads and writes. Extended address records are
/// not supported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Data,
    EndOfFile,
}

impl RecordKind {
    pub fn from_type(record_type: u8) -> Option<Self> {
        match record_type {
            types::DATA => Some(Self::Data),
            types::END_OF_FILE => Some(Self::EndOfFile),
            _ => None,
        }
    }

    /// Intel Hex `TT` field.
    pub fn record_type(self) -> u8 {
        match self {
            Self::Data => types::DATA,
            Self::EndOfFile => types::END_OF_FILE,
        }
    }

    /// Digit following the `S` of a Motorola record.
    pub fn s_type(self) -> u8 {
        match self {
            Self::Data => b'1',
            Self::EndOfFile => b'9',
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Data => write!(f, "Data"),
            Self::EndOfFile => write!(f, "EndOfFile"),
        }
    }
}

/// One line of a record stream.
///
/// The payload lives in a fixed array so records can be built without an
/// allocator; `length` bytes of it are valid.
#[derive(Clone, PartialEq, Eq)]
pub struct Record {
    pub(crate) bytes: [u8; 0xFF],
    pub(crate) length: u8,
    pub address: u16,
    pub kind: RecordKind,
}

impl Record {
    pub fn data(address: u16, data: &[u8]) -> Result<Self, Error> {
        if data.len() > 0xFF {
            return Err(Error::InvalidRecordLength {
                len: data.len(),
                max: 0xFF,
            });
        }

        let mut bytes = [0; 0xFF];
        bytes[..data.len()].copy_from_slice(data);

        Ok(Record {
            bytes,
            length: data.len() as u8,
            address,
            kind: RecordKind::Data,
        })
    }

    /// Terminator record. Intel Hex writes it at address zero, Motorola S
    /// carries the start address here.
    pub fn end_of_file(address: u16) -> Self {
        Record {
            bytes: [0; 0xFF],
            length: 0,
            address,
            kind: RecordKind::EndOfFile,
        }
    }

    pub fn byte_count(&self) -> u8 {
        self.length
    }

    pub fn data_bytes(&self) -> &[u8] {
        &self.bytes[..self.length as usize]
    }
}

impl fmt::Debug for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Record")
            .field("kind", &self.kind)
            .field("address", &format_args!("{:#06X}", self.address))
            .field("data", &self.data_bytes())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_record_keeps_length() {
        let record = Record::data(0x0100, &[0x3E, 0xFF, 0x87]).unwrap();

        assert_eq!(record.byte_count(), 3);
        assert_eq!(record.data_bytes(), &[0x3E, 0xFF, 0x87]);
        assert_eq!(record.kind, RecordKind::Data);
    }

    #[test]
    fn oversized_data_is_rejected() {
        let data = [0u8; 0x100];
        assert!(matches!(
            Record::data(0, &data),
            Err(Error::InvalidRecordLength { len: 0x100, max: 0xFF })
        ));
    }

    #[test]
    fn kinds_map_to_wire_types() {
        assert_eq!(RecordKind::from_type(0x00), Some(RecordKind::Data));
        assert_eq!(RecordKind::from_type(0x01), Some(RecordKind::EndOfFile));
        assert_eq!(RecordKind::from_type(0x04), None);
        assert_eq!(RecordKind::EndOfFile.s_type(), b'9');
    }
}
