//! The parsing context handed to the mapping provider.

use core::cell::Cell;
use core::ops::{Bound, RangeBounds};

use crate::parser::ParseState;

/// Destination for the value currently being parsed, selected by the mapping
/// provider at value start. Whether a number is decimal or hexadecimal is
/// carried by the parser state, not here.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Binding<'dst> {
    /// No destination; the value is scanned and discarded.
    None,
    /// A null-terminated string of up to `len - 1` bytes.
    Str(&'dst [Cell<u8>]),
    Unsigned {
        dst: &'dst Cell<u32>,
        min: u32,
        max: u32,
    },
    Signed {
        dst: &'dst Cell<i32>,
        min: i32,
        max: i32,
    },
}

/// Reinterprets a byte buffer as a string destination.
///
/// The parser writes committed string values through [`Cell`]s so that the
/// mapping provider, which captures the same buffer, can still read it during
/// verification. `str_slot` performs that reinterpretation without copying;
/// once the parser and the mapping closure are gone, the original `&mut [u8]`
/// is accessible again.
pub fn str_slot(buf: &mut [u8]) -> &[Cell<u8>] {
    Cell::from_mut(buf).as_slice_of_cells()
}

/// The parsing context passed to the mapping provider.
///
/// At value start the provider inspects [`group`](Context::group) and
/// [`key`](Context::key) and invokes at most one of the `map_*` verbs to
/// declare how the upcoming value is to be captured. Calling no verb makes
/// the parser scan and discard the value.
///
/// All group and key comparisons are case-sensitive.
pub struct Context<'p, 'dst> {
    pub(crate) group: &'p str,
    pub(crate) key: &'p str,
    pub(crate) state: &'p mut ParseState,
    pub(crate) binding: &'p mut Binding<'dst>,
}

impl<'p, 'dst> Context<'p, 'dst> {
    /// The group most recently declared by a `[…]` header, or `""` before the
    /// first header. Persists across records until replaced.
    #[must_use]
    pub fn group(&self) -> &str {
        self.group
    }

    /// The key on the left of the current assignment.
    #[must_use]
    pub fn key(&self) -> &str {
        self.key
    }

    /// Captures the value as a string of up to `dst.len() - 1` bytes,
    /// null-terminated on close.
    ///
    /// Both quoted (`'…'`, `"…"`) and unquoted forms are accepted; unquoted
    /// values have their trailing blanks trimmed, quoted values are stored
    /// verbatim. A longer value fails the parse with
    /// [`ErrorKind::ValueTooLong`](crate::ErrorKind::ValueTooLong).
    pub fn map_str(&mut self, dst: &'dst [Cell<u8>]) {
        *self.state = ParseState::StrValue;
        *self.binding = Binding::Str(dst);
    }

    /// Captures the value as a decimal unsigned integer within `range`.
    ///
    /// A value prefixed with `0x` is read as hexadecimal instead.
    pub fn map_u32(&mut self, dst: &'dst Cell<u32>, range: impl RangeBounds<u32>) {
        let (min, max) = u32_bounds(&range);
        *self.state = ParseState::U32Value;
        *self.binding = Binding::Unsigned { dst, min, max };
    }

    /// Captures the value as a decimal signed integer within `range`.
    pub fn map_i32(&mut self, dst: &'dst Cell<i32>, range: impl RangeBounds<i32>) {
        let (min, max) = i32_bounds(&range);
        *self.state = ParseState::I32Value;
        *self.binding = Binding::Signed { dst, min, max };
    }

    /// Captures the value as a hexadecimal unsigned integer within `range`.
    ///
    /// The digits are read bare, without a `0x` prefix.
    pub fn map_hex_u32(&mut self, dst: &'dst Cell<u32>, range: impl RangeBounds<u32>) {
        let (min, max) = u32_bounds(&range);
        *self.state = ParseState::HexU32Value;
        *self.binding = Binding::Unsigned { dst, min, max };
    }

    /// Captures the value as a hexadecimal signed integer within `range`.
    pub fn map_hex_i32(&mut self, dst: &'dst Cell<i32>, range: impl RangeBounds<i32>) {
        let (min, max) = i32_bounds(&range);
        *self.state = ParseState::HexI32Value;
        *self.binding = Binding::Signed { dst, min, max };
    }
}

fn u32_bounds(range: &impl RangeBounds<u32>) -> (u32, u32) {
    let min = match range.start_bound() {
        Bound::Included(&v) => v,
        Bound::Excluded(&v) => v.saturating_add(1),
        Bound::Unbounded => u32::MIN,
    };
    let max = match range.end_bound() {
        Bound::Included(&v) => v,
        Bound::Excluded(&v) => v.saturating_sub(1),
        Bound::Unbounded => u32::MAX,
    };
    (min, max)
}

fn i32_bounds(range: &impl RangeBounds<i32>) -> (i32, i32) {
    let min = match range.start_bound() {
        Bound::Included(&v) => v,
        Bound::Excluded(&v) => v.saturating_add(1),
        Bound::Unbounded => i32::MIN,
    };
    let max = match range.end_bound() {
        Bound::Included(&v) => v,
        Bound::Excluded(&v) => v.saturating_sub(1),
        Bound::Unbounded => i32::MAX,
    };
    (min, max)
}
