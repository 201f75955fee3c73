use crate::dialect::Dialect;
use crate::error::Error;
use crate::record::Record;

#[cfg(feature = "alloc")]
extern crate alloc;
#[cfg(feature = "alloc")]
use alloc::string::String;

/// Longest rendered line, including the trailing newline.
pub const MAX_LINE_LEN: usize = 1 + 2 * (1 + 2 + 1 + 0xFF + 1) + 1;

impl Record {
    /// Renders the record into `buffer` without a line terminator and returns
    /// the number of bytes used. Hex digits are uppercase.
    pub fn serialize<T>(&self, dialect: Dialect, buffer: &mut T) -> Result<usize, Error>
    where
        T: AsMut<[u8]>,
    {
        let data = self.data_bytes();
        let (hi, lo) = split(self.address);
        let mut fields = [0; 0x200];

        match dialect {
            Dialect::IntelHex => {
                let end = 4 + data.len();
                fields[..4].copy_from_slice(&[self.length, hi, lo, self.kind.record_type()]);
                fields[4..end].copy_from_slice(data);
                fields[end] = dialect.checksum(&fields[..end]);

                format(&[b':'], &fields[..=end], buffer.as_mut())
            }
            Dialect::MotorolaS => {
                if self.length > dialect.max_record_len() {
                    return Err(Error::InvalidRecordLength {
                        len: data.len(),
                        max: dialect.max_record_len(),
                    });
                }

                let end = 3 + data.len();
                fields[..3].copy_from_slice(&[self.length + 3, hi, lo]);
                fields[3..end].copy_from_slice(data);
                fields[end] = dialect.checksum(&fields[..end]);

                format(&[b'S', self.kind.s_type()], &fields[..=end], buffer.as_mut())
            }
        }
    }

    #[cfg(feature = "alloc")]
    pub fn to_line(&self, dialect: Dialect) -> Result<String, Error> {
        let mut buffer = [0; MAX_LINE_LEN];
        let length = self.serialize(dialect, &mut buffer)?;

        // only ASCII was written
        Ok(buffer[..length].iter().map(|&b| b as char).collect())
    }
}

fn split(address: u16) -> (u8, u8) {
    let [hi, lo] = address.to_be_bytes();
    (hi, lo)
}

fn format(prefix: &[u8], fields: &[u8], buffer: &mut [u8]) -> Result<usize, Error> {
    let needed = prefix.len() + 2 * fields.len();
    if buffer.len() < needed {
        return Err(Error::BufferTooSmall {
            needed,
            available: buffer.len(),
        });
    }

    buffer[..prefix.len()].copy_from_slice(prefix);

    let digits = &mut buffer[prefix.len()..needed];
    hex::encode_to_slice(fields, digits).map_err(|_| Error::BufferTooSmall {
        needed,
        available: needed,
    })?;
    digits.make_ascii_uppercase();

    Ok(needed)
}

/// Record that closes an encoded stream.
#[cfg(feature = "std")]
pub(crate) fn terminator(dialect: Dialect, base_address: u16) -> Record {
    match dialect {
        Dialect::IntelHex => Record::end_of_file(0x0000),
        Dialect::MotorolaS => Record::end_of_file(base_address),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(record: &Record, dialect: Dialect) -> String {
        let mut buffer = [0; MAX_LINE_LEN];
        let length = record.serialize(dialect, &mut buffer).unwrap();
        String::from_utf8(buffer[..length].to_vec()).unwrap()
    }

    #[test]
    fn serialize_data() {
        let record = Record::data(0x0100, &[0x3E, 0xFF, 0x87]).unwrap();

        assert_eq!(render(&record, Dialect::IntelHex), ":030100003EFF8738");
    }

    #[test]
    fn serialize_eof() {
        let record = Record::end_of_file(0);

        assert_eq!(render(&record, Dialect::IntelHex), ":00000001FF");
    }

    #[test]
    fn serialize_motorola_data() {
        let record = Record::data(0x0000, &[0x3E, 0xFF, 0x87]).unwrap();

        assert_eq!(render(&record, Dialect::MotorolaS), "S10600003EFF8735");
    }

    #[test]
    #[cfg(feature = "std")]
    fn serialize_motorola_start_address() {
        let record = terminator(Dialect::MotorolaS, 0x1000);

        // !(03 + 10 + 00) = EC
        assert_eq!(render(&record, Dialect::MotorolaS), "S9031000EC");
        assert_eq!(render(&terminator(Dialect::IntelHex, 0x1000), Dialect::IntelHex), ":00000001FF");
    }

    #[test]
    fn motorola_rejects_full_intel_payload() {
        let record = Record::data(0, &[0u8; 0xFF]).unwrap();
        let mut buffer = [0; MAX_LINE_LEN];

        assert!(matches!(
            record.serialize(Dialect::MotorolaS, &mut buffer),
            Err(Error::InvalidRecordLength { len: 0xFF, max: 0xFC })
        ));
    }

    #[test]
    fn longest_record_fits() {
        let record = Record::data(0xFFFF, &[0xAA; 0xFF]).unwrap();
        let mut buffer = [0; MAX_LINE_LEN];
        let length = record.serialize(Dialect::IntelHex, &mut buffer).unwrap();

        assert_eq!(length, MAX_LINE_LEN - 1);
    }

    #[test]
    fn small_buffer_is_reported() {
        let record = Record::data(0, &[0x01, 0x02]).unwrap();
        let mut buffer = [0; 8];

        assert!(matches!(
            record.serialize(Dialect::IntelHex, &mut buffer),
            Err(Error::BufferTooSmall { needed: 15, available: 8 })
        ));
    }

    #[test]
    fn to_line_matches_serialize() {
        let record = Record::data(0x0110, &[0x01]).unwrap();

        assert_eq!(
            record.to_line(Dialect::IntelHex).unwrap(),
            render(&record, Dialect::IntelHex)
        );
    }
}
