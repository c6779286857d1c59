#![no_main]

use core::cell::Cell;

use inimodem::{verifying, IniParser, ParseError};
use libfuzzer_sys::fuzz_target;

/// Outcome of one parse: stored error, final line, committed number, and the
/// committed string bytes.
type Outcome = (Option<ParseError>, usize, u32, i32, [u8; 16]);

/// Parses `data` in chunks of `chunk` bytes with a mapper configured from
/// `flags` and returns everything observable.
fn run(flags: u8, chunk: usize, data: &[u8]) -> Outcome {
    let mut buf = [0u8; 16];
    let dst = inimodem::str_slot(&mut buf);
    let num = Cell::new(0u32);
    let snum = Cell::new(0i32);

    let mut parser = IniParser::new(verifying(|ctx, parsed| {
        if parsed {
            // exercise the verification phase without constraining the value
            return flags & 0x10 == 0 || num.get() != 1;
        }
        let hex = flags & 0x04 != 0;
        match flags & 0x03 {
            1 => ctx.map_str(dst),
            2 if hex => ctx.map_hex_u32(&num, ..),
            2 => ctx.map_u32(&num, ..),
            3 if hex => ctx.map_hex_i32(&snum, ..),
            3 => ctx.map_i32(&snum, -1000..=1000),
            _ => {}
        }
        flags & 0x08 == 0 || ctx.key() != "die"
    }));

    let mut failed = None;
    for part in data.chunks(chunk.max(1)) {
        if let Err(err) = parser.feed_slice(part) {
            failed = Some(err);
            break;
        }
    }
    if failed.is_none() {
        failed = parser.finish().err();
    }
    let line = parser.line();
    assert_eq!(failed.is_none(), parser.is_ok());
    assert_eq!(failed, parser.error());
    drop(parser);

    (failed, line, num.get(), snum.get(), buf)
}

fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }
    let flags = data[0];
    let chunk = usize::from(data[1]) + 1;
    let data = &data[2..];

    // the parse must be deterministic and independent of chunking
    let chunked = run(flags, chunk, data);
    let per_byte = run(flags, 1, data);
    assert_eq!(chunked, per_byte);
});
