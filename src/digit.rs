use core::fmt;

/// A character that is not one of `0-9`, `a-f` or `A-F`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidDigit(pub u8);

impl fmt::Display for InvalidDigit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid hex digit {:?}", self.0 as char)
    }
}

/// Converts one ASCII hex digit to its 4-bit value.
pub fn nibble(digit: u8) -> Result<u8, InvalidDigit> {
    match digit {
        b'0'..=b'9' => Ok(digit - b'0'),
        b'a'..=b'f' => Ok(10 + (digit - b'a')),
        b'A'..=b'F' => Ok(10 + (digit - b'A')),
        d => Err(InvalidDigit(d)),
    }
}

/// Combines two digits into a byte, most significant nibble first.
pub fn byte(high: u8, low: u8) -> Result<u8, InvalidDigit> {
    Ok(nibble(high)? << 4 | nibble(low)?)
}
