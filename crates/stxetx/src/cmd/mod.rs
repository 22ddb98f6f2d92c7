use std::path::PathBuf;

use clap::{Args, Subcommand};

use crate::exit::CliResult;
use crate::output::OutputFormat;

pub mod decode;
pub mod encode;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Encode a frame and print the wire bytes.
    Encode(EncodeArgs),
    /// Decode wire bytes and print the frame.
    Decode(DecodeArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Encode(args) => encode::run(args, format),
        Command::Decode(args) => decode::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug)]
pub struct EncodeArgs {
    /// Message type byte.
    #[arg(long, short = 't', default_value = "1")]
    pub msg_type: u8,
    /// Ask the receiver to acknowledge the frame.
    #[arg(long)]
    pub ack: bool,
    /// Transmit a zero checksum and mark it as not to be verified.
    #[arg(long)]
    pub ignore_checksum: bool,
    /// Checksum byte to transmit.
    #[arg(long, default_value = "0")]
    pub checksum: u8,
    /// UTF-8 text payload.
    #[arg(long, conflicts_with_all = ["hex", "file"])]
    pub data: Option<String>,
    /// Payload bytes as hex tokens (e.g. "0x02 0xFF").
    #[arg(long, conflicts_with_all = ["data", "file"])]
    pub hex: Option<String>,
    /// Read payload bytes from a file.
    #[arg(long, conflicts_with_all = ["data", "hex"])]
    pub file: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct DecodeArgs {
    /// Wire bytes as hex tokens.
    #[arg(long, conflicts_with = "file")]
    pub hex: Option<String>,
    /// Read wire bytes from a file; stdin when neither option is given.
    #[arg(long)]
    pub file: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}
