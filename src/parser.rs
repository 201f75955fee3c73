//! Character level Intel Hex scanner.
//!
//! [`Parser`] is fed one input character at a time and reports a
//! [`RecordOutcome`] whenever a record finishes, successfully or not. It does
//! no I/O of its own; the stream loop in [`crate::decode`] drives it and
//! copies [`Parser::data`] out after each good data record.

use crate::checksum::{checksum, verify_intel};
use crate::digit::nibble;
use crate::record::RecordKind;
use crate::report::RecordOutcome;

/// Position inside the current record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    /// Waiting for a `:` at the start of a line.
    SeekStart,
    Count,
    Address,
    Type,
    DataOrChecksum,
    /// Checksum read, waiting for the end of the line.
    Trailer,
}

impl State {
    /// Hex digits in one unit of this field.
    fn width(self) -> u8 {
        match self {
            Self::Address => 4,
            _ => 2,
        }
    }
}

/// Accumulators for the record being read.
#[derive(Clone)]
struct Fields {
    byte_count: u8,
    address: u16,
    record_type: u8,
    remaining: u8,
    sum: u8,
    data: [u8; 0xFF],
    length: usize,
    digits: u8,
    value: u16,
    pending: Option<RecordOutcome>,
}

impl Default for Fields {
    fn default() -> Self {
        Fields {
            byte_count: 0,
            address: 0,
            record_type: 0,
            remaining: 0,
            sum: 0,
            data: [0; 0xFF],
            length: 0,
            digits: 0,
            value: 0,
            pending: None,
        }
    }
}

impl Fields {
    fn validate(&self, transmitted: u8, accept_legacy_eof: bool) -> RecordOutcome {
        if !verify_intel(self.sum, self.record_type, transmitted, accept_legacy_eof) {
            return RecordOutcome::ChecksumMismatch {
                expected: checksum(&[self.sum]),
                actual: transmitted,
            };
        }

        match RecordKind::from_type(self.record_type) {
            Some(kind) => RecordOutcome::Ok {
                address: self.address,
                byte_count: self.byte_count,
                kind,
            },
            None => RecordOutcome::UnsupportedRecordType(self.record_type),
        }
    }
}

#[derive(Clone)]
pub struct Parser {
    state: State,
    last: u8,
    fields: Fields,
    accept_legacy_eof: bool,
}

impl Default for Parser {
    fn default() -> Self {
        Parser::new(true)
    }
}

impl Parser {
    /// `accept_legacy_eof` also accepts the end of file checksum that leaves
    /// the record type out of the sum.
    pub fn new(accept_legacy_eof: bool) -> Self {
        Parser {
            state: State::SeekStart,
            // the stream start counts as a line start
            last: b'\n',
            fields: Fields::default(),
            accept_legacy_eof,
        }
    }

    pub fn state(&self) -> State {
        self.state
    }

    /// Payload of the record that just finished. Only meaningful right after
    /// an `Ok` outcome.
    pub fn data(&self) -> &[u8] {
        &self.fields.data[..self.fields.length]
    }

    pub fn push(&mut self, c: u8) -> Option<RecordOutcome> {
        let outcome = self.step(c);

        // NUL padding after a line break does not end the line start
        if !(is_line_break(self.last) && c == 0) {
            self.last = c;
        }

        outcome
    }

    /// Call once the input is exhausted to flush a record that was cut off.
    pub fn end_of_input(&mut self) -> Option<RecordOutcome> {
        match self.state {
            State::SeekStart => None,
            State::Trailer => self.finish(),
            _ => Some(self.abandon(RecordOutcome::PrematureEndOfRecord)),
        }
    }

    fn step(&mut self, c: u8) -> Option<RecordOutcome> {
        match self.state {
            State::SeekStart => {
                if c == b':' && is_line_break(self.last) {
                    self.fields = Fields::default();
                    self.state = State::Count;
                }
                None
            }
            State::Trailer => {
                if is_line_break(c) {
                    self.finish()
                } else if c == b' ' || c == b'\t' {
                    None
                } else {
                    Some(self.abandon(RecordOutcome::UnexpectedExtraData))
                }
            }
            _ if is_line_break(c) => Some(self.abandon(RecordOutcome::PrematureEndOfRecord)),
            _ => match nibble(c) {
                Ok(n) => {
                    self.accumulate(n);
                    None
                }
                Err(_) => Some(self.abandon(RecordOutcome::MalformedDigit)),
            },
        }
    }

    fn accumulate(&mut self, n: u8) {
        let fields = &mut self.fields;

        fields.value = fields.value << 4 | u16::from(n);
        fields.digits += 1;
        if fields.digits < self.state.width() {
            return;
        }

        let value = fields.value;
        fields.value = 0;
        fields.digits = 0;

        match self.state {
            State::Count => {
                fields.byte_count = value as u8;
                self.state = State::Address;
            }
            State::Address => {
                fields.address = value;
                self.state = State::Type;
            }
            State::Type => {
                let [hi, lo] = fields.address.to_be_bytes();
                fields.record_type = value as u8;
                fields.sum = fields
                    .byte_count
                    .wrapping_add(fields.record_type)
                    .wrapping_add(hi)
                    .wrapping_add(lo);
                fields.remaining = fields.byte_count;
                self.state = State::DataOrChecksum;
            }
            State::DataOrChecksum => {
                let byte = value as u8;
                if fields.remaining > 0 {
                    fields.data[fields.length] = byte;
                    fields.length += 1;
                    fields.sum = fields.sum.wrapping_add(byte);
                    fields.remaining -= 1;
                } else {
                    fields.pending = Some(fields.validate(byte, self.accept_legacy_eof));
                    self.state = State::Trailer;
                }
            }
            State::SeekStart | State::Trailer => unreachable!("no digits are accumulated here"),
        }
    }

    fn finish(&mut self) -> Option<RecordOutcome> {
        self.state = State::SeekStart;
        self.fields.pending.take()
    }

    fn abandon(&mut self, outcome: RecordOutcome) -> RecordOutcome {
        self.state = State::SeekStart;
        self.fields.pending = None;
        self.fields.length = 0;
        outcome
    }
}

fn is_line_break(c: u8) -> bool {
    c == b'\n' || c == b'\r'
}
