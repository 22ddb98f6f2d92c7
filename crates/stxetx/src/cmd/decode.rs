use std::fs;
use std::io::Read;

use stxetx_frame::{decode_frame, MAX_WIRE_PAYLOAD};
use tracing::warn;

use crate::cmd::DecodeArgs;
use crate::exit::{frame_error, io_error, CliError, CliResult, DATA_INVALID, SUCCESS, USAGE};
use crate::output::{parse_hex, print_frame, OutputFormat};

pub fn run(args: DecodeArgs, format: OutputFormat) -> CliResult<i32> {
    let wire = resolve_wire(&args)?;

    let mut scratch = [0u8; MAX_WIRE_PAYLOAD];
    match decode_frame(&wire, &mut scratch) {
        Ok(Some((frame, consumed))) => {
            if consumed < wire.len() {
                warn!(extra = wire.len() - consumed, "trailing bytes after frame");
            }
            print_frame(&frame, format);
            Ok(SUCCESS)
        }
        Ok(None) => Err(CliError::new(
            DATA_INVALID,
            "input ends before the frame is complete",
        )),
        Err(err) => Err(frame_error("decode failed", err)),
    }
}

fn resolve_wire(args: &DecodeArgs) -> CliResult<Vec<u8>> {
    if let Some(hex) = &args.hex {
        return parse_hex(hex).map_err(|err| CliError::new(USAGE, err));
    }
    if let Some(path) = &args.file {
        return fs::read(path)
            .map_err(|err| io_error(&format!("failed reading {}", path.display()), err));
    }
    let mut buf = Vec::new();
    std::io::stdin()
        .read_to_end(&mut buf)
        .map_err(|err| io_error("failed reading stdin", err))?;
    Ok(buf)
}
