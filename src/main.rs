use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use hexload::{decode, encode, DecodeReport, Dialect, EncodeOptions};
use log::info;

use std::fs::File;
use std::io::{self, BufReader, BufWriter};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// CP/M programs load at the start of the TPA.
const LOAD_ADDRESS: u16 = 0x0100;

#[derive(Parser, Debug)]
#[clap(
    name = "hexload",
    version,
    about = "Load and unload 8-bit Intel Hex files"
)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Convert Intel Hex FILE(s) into binary .com files
    Load {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Write FILE(s) to standard output as Intel Hex
    Unload {
        /// Write Motorola S-records instead
        #[arg(short, long)]
        motorola: bool,

        /// Load address in hex, e.g. 0100 or 0x8000
        #[arg(short, long, value_parser = parse_address)]
        base: Option<u16>,

        /// Data bytes per record
        #[arg(short, long, default_value_t = 16)]
        record_len: u8,

        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    let mut failed = false;
    match args.command {
        Command::Load { files } => {
            for file in &files {
                // name each file when several are converted
                if files.len() > 1 {
                    println!("{}", file.display());
                }

                match load(file) {
                    Ok(report) => {
                        println!("{}", report);
                        failed |= !report.is_ok();
                    }
                    Err(e) => {
                        eprintln!("hexload: {:#}", e);
                        failed = true;
                    }
                }
            }
        }
        Command::Unload {
            motorola,
            base,
            record_len,
            files,
        } => {
            let options = EncodeOptions {
                dialect: if motorola {
                    Dialect::MotorolaS
                } else {
                    Dialect::IntelHex
                },
                base_address: base,
                record_len,
            };

            for file in &files {
                if let Err(e) = unload(file, &options) {
                    eprintln!("hexload: {:#}", e);
                    failed = true;
                }
            }
        }
    }

    if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn load(path: &Path) -> anyhow::Result<DecodeReport> {
    let output_path = com_path(path)?;
    let input = open(path)?;
    let output = File::create(&output_path)
        .with_context(|| format!("Cannot open {}", output_path.display()))?;

    let report = decode(input, BufWriter::new(output), LOAD_ADDRESS)
        .with_context(|| format!("Failed to load {}", path.display()))?;

    info!(
        "{} -> {}: {} bytes",
        path.display(),
        output_path.display(),
        report.bytes_written
    );
    Ok(report)
}

fn unload(path: &Path, options: &EncodeOptions) -> anyhow::Result<()> {
    let input = open(path)?;
    let stdout = io::stdout();

    encode(input, BufWriter::new(stdout.lock()), options)
        .with_context(|| format!("Failed to unload {}", path.display()))?;
    Ok(())
}

fn open(path: &Path) -> anyhow::Result<BufReader<File>> {
    if path.is_dir() {
        bail!("Cannot open {}: Can't read from a directory", path.display());
    }

    let file = File::open(path).with_context(|| format!("Cannot open {}", path.display()))?;
    Ok(BufReader::new(file))
}

/// `PROG.hex` loads into `PROG.com`. Anything else is refused.
fn com_path(path: &Path) -> anyhow::Result<PathBuf> {
    match path.extension() {
        Some(ext) if ext == "hex" => Ok(path.with_extension("com")),
        _ => bail!("Cannot open {}: Invalid filetype", path.display()),
    }
}

fn parse_address(s: &str) -> Result<u16, String> {
    let digits = s
        .trim_start_matches("0x")
        .trim_start_matches("0X")
        .trim_end_matches(|c: char| c == 'h' || c == 'H');

    u16::from_str_radix(digits, 16).map_err(|e| format!("invalid address {:?}: {}", s, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_name_replaces_hex() {
        assert_eq!(
            com_path(Path::new("dir/prog.hex")).unwrap(),
            PathBuf::from("dir/prog.com")
        );
        assert!(com_path(Path::new("prog.bin")).is_err());
        assert!(com_path(Path::new("prog")).is_err());
        assert!(com_path(Path::new(".hex")).is_err());
    }

    #[test]
    fn addresses_are_hex() {
        assert_eq!(parse_address("0100"), Ok(0x0100));
        assert_eq!(parse_address("0x8000"), Ok(0x8000));
        assert_eq!(parse_address("F000h"), Ok(0xF000));
        assert!(parse_address("10000").is_err());
        assert!(parse_address("zz").is_err());
    }

    #[test]
    fn args_parse() {
        let args = Args::try_parse_from(["hexload", "unload", "-m", "-b", "1000", "a.bin"]).unwrap();

        match args.command {
            Command::Unload {
                motorola,
                base,
                record_len,
                files,
            } => {
                assert!(motorola);
                assert_eq!(base, Some(0x1000));
                assert_eq!(record_len, 16);
                assert_eq!(files, [PathBuf::from("a.bin")]);
            }
            command => panic!("unexpected {:?}", command),
        }
    }
}
