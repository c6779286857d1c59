mod limits;
mod parse_bad;

use alloc::string::String;
use core::cell::Cell;

use crate::Context;

/// Mapping provider that scans and discards every value.
pub(crate) fn ignore_all(_: &mut Context) -> bool {
    true
}

/// The contents of a string destination up to its null terminator.
pub(crate) fn slot_text(cells: &[Cell<u8>]) -> String {
    cells
        .iter()
        .map(Cell::get)
        .take_while(|&b| b != 0)
        .map(char::from)
        .collect()
}

/// Parses `input` with an ignore-all provider and returns the failing line.
pub(crate) fn err_line(input: &str) -> usize {
    crate::parse_str(input, crate::mapping(ignore_all))
        .expect_err("expected parse failure")
        .line()
}
