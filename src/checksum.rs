use crate::types;

/// Two's complement of the byte sum, as used by Intel Hex.
pub fn checksum(bytes: &[u8]) -> u8 {
    0u8.wrapping_sub(sum(bytes))
}

/// One's complement of the byte sum, as used by Motorola S-records.
pub fn ones_complement(bytes: &[u8]) -> u8 {
    !sum(bytes)
}

pub(crate) fn sum(bytes: &[u8]) -> u8 {
    bytes.iter().fold(0u8, |acc, &byte| acc.wrapping_add(byte))
}

/// Checks a transmitted Intel Hex checksum against the running `sum` of a
/// record's count, address, type and data bytes.
///
/// Older CP/M `unload` builds left the record type out of the end of file
/// checksum (`:0000000100`), and the CP/M `load` command accepts both forms.
/// `accept_legacy_eof` keeps that behaviour.
pub(crate) fn verify_intel(sum: u8, record_type: u8, transmitted: u8, accept_legacy_eof: bool) -> bool {
    if 0u8.wrapping_sub(sum) == transmitted {
        return true;
    }

    accept_legacy_eof
        && record_type == types::END_OF_FILE
        && 0u8.wrapping_sub(sum.wrapping_sub(record_type)) == transmitted
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intel_record_sums_to_zero() {
        let record = [0x03, 0x01, 0x00, 0x00, 0x3E, 0xFF, 0x87];
        let cs = checksum(&record);

        assert_eq!(cs, 0x38);
        assert_eq!(sum(&record).wrapping_add(cs), 0);
    }

    #[test]
    fn end_of_file_checksums() {
        assert_eq!(checksum(&[0x00, 0x00, 0x00, 0x01]), 0xFF);
        assert_eq!(checksum(&[0x00, 0x00, 0x00]), 0x00);
    }

    #[test]
    fn motorola_record_sums_to_all_ones() {
        let record = [0x06, 0x00, 0x00, 0x3E, 0xFF, 0x87];
        let cs = ones_complement(&record);

        assert_eq!(cs, 0x35);
        assert_eq!(sum(&record).wrapping_add(cs), 0xFF);
    }

    #[test]
    fn legacy_end_of_file_needs_opt_in() {
        assert!(verify_intel(0x01, types::END_OF_FILE, 0xFF, false));
        assert!(verify_intel(0x01, types::END_OF_FILE, 0x00, true));
        assert!(!verify_intel(0x01, types::END_OF_FILE, 0x00, false));
    }

    #[test]
    fn legacy_rule_is_only_for_end_of_file() {
        let sum = 0x01 + 0x55;
        assert!(verify_intel(sum, types::DATA, 0xAA, true));
        // AA only matches if the type 02 is dropped from the sum
        assert!(!verify_intel(sum + 0x02, 0x02, 0xAA, true));
    }

    #[test]
    fn polarities_differ() {
        let bytes = [0x10, 0x20];
        assert_eq!(checksum(&bytes).wrapping_sub(ones_complement(&bytes)), 1);
    }
}
