//! Whole-stream encoding and decoding over `std::io`.

use crate::dialect::Dialect;
use crate::error::Error;
use crate::parser::Parser;
use crate::record::{Record, RecordKind};
use crate::report::{DecodeReport, RecordOutcome};
use crate::serializer::{terminator, MAX_LINE_LEN};
use log::{debug, info, warn};
use std::io::{self, Read, Write};

/// Settings for one [`encode`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodeOptions {
    pub dialect: Dialect,
    /// Address of the first data byte. `None` uses the dialect's default.
    pub base_address: Option<u16>,
    /// Data bytes per record.
    pub record_len: u8,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        EncodeOptions {
            dialect: Dialect::IntelHex,
            base_address: None,
            record_len: 16,
        }
    }
}

impl EncodeOptions {
    pub fn new(dialect: Dialect) -> Self {
        EncodeOptions {
            dialect,
            ..Default::default()
        }
    }

    pub fn base_address(&self) -> u16 {
        self.base_address
            .unwrap_or_else(|| self.dialect.default_base_address())
    }
}

/// Settings for one [`decode_with`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Where the first data record is expected to load.
    pub base_address: u16,
    /// Accept `:0000000100` as well as `:00000001FF` as the end of file.
    pub accept_legacy_eof: bool,
    /// Also stop at a valid zero length data record, as CP/M's `load` does.
    pub stop_on_empty_data: bool,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        DecodeOptions {
            base_address: Dialect::IntelHex.default_base_address(),
            accept_legacy_eof: true,
            stop_on_empty_data: false,
        }
    }
}

/// Writes `reader`'s bytes to `writer` as records, one per line, followed by
/// the dialect's terminator. Returns the number of characters written.
pub fn encode<R, W>(mut reader: R, mut writer: W, options: &EncodeOptions) -> Result<usize, Error>
where
    R: Read,
    W: Write,
{
    let dialect = options.dialect;
    let max = dialect.max_record_len();
    if options.record_len == 0 || options.record_len > max {
        return Err(Error::InvalidRecordLength {
            len: options.record_len as usize,
            max,
        });
    }

    let base_address = options.base_address();
    let mut chunk = [0; 0xFF];
    let chunk = &mut chunk[..options.record_len as usize];
    let mut line = [0; MAX_LINE_LEN];

    let mut address = base_address;
    let mut records = 0usize;
    let mut written = 0;

    loop {
        let length = read_chunk(&mut reader, chunk)?;
        if length == 0 {
            break;
        }

        let record = Record::data(address, &chunk[..length])?;
        written += write_record(&mut writer, &record, dialect, &mut line)?;
        records += 1;
        debug!("wrote {} byte record at {:04X}", length, address);

        address = address.wrapping_add(length as u16);
        if length < chunk.len() {
            break;
        }
    }

    written += write_record(
        &mut writer,
        &terminator(dialect, base_address),
        dialect,
        &mut line,
    )?;
    writer.flush()?;

    info!(
        "encoded {} data records as {} from {:04X}",
        records, dialect, base_address
    );
    Ok(written)
}

fn read_chunk<R: Read>(reader: &mut R, buffer: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buffer.len() {
        match reader.read(&mut buffer[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

fn write_record<W: Write>(
    writer: &mut W,
    record: &Record,
    dialect: Dialect,
    line: &mut [u8; MAX_LINE_LEN],
) -> Result<usize, Error> {
    let length = record.serialize(dialect, line)?;
    line[length] = b'\n';
    writer.write_all(&line[..=length])?;
    Ok(length + 1)
}

/// Decodes an Intel Hex stream into `writer`, expecting the first record at
/// `base_address`. See [`decode_with`].
pub fn decode<R, W>(reader: R, writer: W, base_address: u16) -> Result<DecodeReport, Error>
where
    R: Read,
    W: Write,
{
    let options = DecodeOptions {
        base_address,
        ..Default::default()
    };
    decode_with(reader, writer, &options)
}

/// Decodes an Intel Hex stream into `writer`.
///
/// Each data record is written as soon as its checksum checks out, so a bad
/// record only loses its own bytes. Bad records are listed in the returned
/// report and scanning continues at the next line that starts with `:`.
/// Decoding stops after the first valid end of file record. Only I/O errors
/// end the call early, and whatever was committed before them stays written.
pub fn decode_with<R, W>(
    reader: R,
    writer: W,
    options: &DecodeOptions,
) -> Result<DecodeReport, Error>
where
    R: Read,
    W: Write,
{
    let mut parser = Parser::new(options.accept_legacy_eof);
    let mut loader = Loader {
        writer,
        cursor: options.base_address,
        stop_on_empty_data: options.stop_on_empty_data,
        report: DecodeReport::default(),
    };

    let mut input = reader.bytes();
    while let Some(c) = input.next() {
        if let Some(outcome) = parser.push(c?) {
            if loader.record(&parser, outcome)? {
                loader.report.consumed = only_padding(&mut input)?;
                return loader.finish();
            }
        }
    }

    if let Some(outcome) = parser.end_of_input() {
        loader.record(&parser, outcome)?;
    }
    loader.report.consumed = true;
    loader.finish()
}

/// Output side of a decode pass.
struct Loader<W> {
    writer: W,
    cursor: u16,
    stop_on_empty_data: bool,
    report: DecodeReport,
}

impl<W: Write> Loader<W> {
    /// Commits one finished record. Returns whether it ends the stream.
    fn record(&mut self, parser: &Parser, outcome: RecordOutcome) -> io::Result<bool> {
        let index = self.report.outcomes.len() + 1;
        self.report.outcomes.push(outcome);

        match outcome {
            RecordOutcome::Ok {
                address,
                kind: RecordKind::Data,
                ..
            } => {
                let data = parser.data();
                if !data.is_empty() && address != self.cursor {
                    warn!(
                        "record {} loads at {:04X}, expected {:04X}",
                        index, address, self.cursor
                    );
                }

                self.writer.write_all(data)?;
                self.report.bytes_written += data.len();
                self.cursor = address.wrapping_add(data.len() as u16);
                debug!("record {}: {}", index, outcome);
            }
            RecordOutcome::Ok { .. } => debug!("record {}: {}", index, outcome),
            _ => warn!("record {}: {}", index, outcome),
        }

        let end = outcome.is_terminator() || (self.stop_on_empty_data && outcome.is_empty_data());
        if end {
            self.report.terminated = true;
        }
        Ok(end)
    }

    fn finish(mut self) -> Result<DecodeReport, Error> {
        self.writer.flush()?;

        let report = self.report;
        info!(
            "decoded {} records, {} bad, {} bytes",
            report.outcomes.len(),
            report.failures().count(),
            report.bytes_written
        );
        Ok(report)
    }
}

/// Reads past what may legitimately follow the terminator. Returns false at
/// the first byte that is anything else.
fn only_padding<R: Read>(input: &mut io::Bytes<R>) -> io::Result<bool> {
    for c in input {
        match c? {
            b'\r' | b'\n' | b' ' | b'\t' | 0x00 | 0x1A => {}
            _ => return Ok(false),
        }
    }
    Ok(true)
}
