//! The INI streaming parser implementation.
//!
//! This module provides the push-driven [`IniParser`] state machine together
//! with the convenience entry points for parsing complete inputs.

use crate::context::{Binding, Context};
use crate::error::{ErrorKind, ParseError};
use crate::idents::{HeapIdents, IdentStore, InlineIdents};
use crate::mapping::MappingProvider;

/// Identifier capacity (including the null terminator) used by [`IniParser::new`].
const DEFAULT_MAX_ID: usize = 16;

// ------------------------------------------------------------------------------------------------
// Parser states
// ------------------------------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ParseState {
    /// Searching for the start of a record.
    Start,
    /// Within a `[group]` header.
    Group,
    /// Within a key name.
    Key,
    /// Between key and `=`.
    Assign,
    /// Before the first value byte.
    Value,
    /// Scanning a value nothing is bound to.
    IgnoreValue,
    /// Within a string value.
    StrValue,
    /// Within an unsigned decimal number.
    U32Value,
    /// Within an unsigned hexadecimal number.
    HexU32Value,
    /// Signed decimal binding requested; resolves at the first value byte.
    I32Value,
    /// Signed hexadecimal binding requested; resolves at the first value byte.
    HexI32Value,
    /// Trailing blanks after a closed value.
    Blank,
    /// Within a `#` comment.
    Comment,
    /// Stopped at a syntax error. Terminal.
    Error,
}

// ------------------------------------------------------------------------------------------------
// Character classes
// ------------------------------------------------------------------------------------------------

fn is_blank(c: u8) -> bool {
    c == b' ' || c == b'\t'
}

fn is_space(c: u8) -> bool {
    is_blank(c) || c == b'\r' || c == b'\n'
}

/// Valid group or key character. The first character must additionally be a
/// letter.
fn is_id_cont(c: u8) -> bool {
    c.is_ascii_alphanumeric() || c == b'_' || c == b'.'
}

/// Valid string value character: anything but DEL that is tab or at least
/// 0x20.
fn is_str_char(c: u8) -> bool {
    c != 0x7f && (c == b'\t' || c >= b' ')
}

fn hex_value(c: u8) -> u32 {
    match c {
        b'0'..=b'9' => u32::from(c - b'0'),
        b'a'..=b'f' => u32::from(c - b'a' + 10),
        _ => u32::from(c - b'A' + 10),
    }
}

/// Appends one byte to an identifier buffer, keeping it null-terminated.
fn push_ident(buf: &mut [u8], idx: &mut usize, c: u8) -> Result<(), ErrorKind> {
    if *idx + 1 >= buf.len() {
        return Err(ErrorKind::IdentifierTooLong);
    }
    buf[*idx] = c;
    *idx += 1;
    buf[*idx] = 0;
    Ok(())
}

/// The bytes of an identifier buffer up to its null terminator.
fn ident_str(buf: &[u8]) -> &str {
    let len = buf.iter().position(|&b| b == 0).unwrap_or(buf.len());
    // identifier characters are ASCII, so the buffer is valid UTF-8
    core::str::from_utf8(&buf[..len]).unwrap_or("")
}

// ------------------------------------------------------------------------------------------------
// The parser
// ------------------------------------------------------------------------------------------------

/// The streaming INI parser.
///
/// `IniParser` is fed one byte at a time (or in buffered form) and consults
/// its [`MappingProvider`] for every value: once at value start, to select a
/// destination, and (for two-phase providers) once after the value has been
/// committed, to verify it. See the [crate docs](crate) for the dialect.
///
/// The parser stops permanently at the first syntax violation; the error,
/// with the 1-based line it occurred on, is returned from the failing `feed`
/// and from every call after it until [`reset`](IniParser::reset).
///
/// # Examples
///
/// ```rust
/// use core::cell::Cell;
///
/// use inimodem::{mapping, IniParser};
///
/// let brightness = Cell::new(0u32);
/// let mut parser = IniParser::new(mapping(|ctx| {
///     if ctx.group() == "DISPLAY" && ctx.key() == "BRIGHTNESS" {
///         ctx.map_u32(&brightness, 0..=100);
///     }
///     true
/// }));
///
/// for &byte in b"[DISPLAY]\nBRIGHTNESS = 80\n" {
///     parser.feed(byte).unwrap();
/// }
/// parser.finish().unwrap();
/// assert_eq!(brightness.get(), 80);
/// ```
pub struct IniParser<'dst, M, S = HeapIdents> {
    mapper: M,
    idents: S,
    state: ParseState,
    binding: Binding<'dst>,
    err: Option<ParseError>,
    /// Current 1-based line.
    line: usize,
    /// Previous byte; `None` initially and after end-of-input.
    last: Option<u8>,
    /// Bytes written into the current value, or digits consumed.
    idx: usize,
    /// Index of the first trailing-blank byte of an unquoted string, or 0.
    trail_blank: usize,
    /// Number accumulator.
    num: u32,
    num_neg: bool,
    /// Active quote character, 0 if none.
    quote: u8,
}

/// An [`IniParser`] whose identifier storage lives inline in the parser
/// value; no heap allocation at all.
pub type SizedIniParser<'dst, M, const MAX_ID: usize> = IniParser<'dst, M, InlineIdents<MAX_ID>>;

impl<'dst, M> IniParser<'dst, M, HeapIdents>
where
    M: MappingProvider<'dst>,
{
    /// Creates a heap-backed parser with the default identifier capacity of
    /// 16 bytes (including the null terminator).
    pub fn new(mapper: M) -> Self {
        Self::with_max_id(mapper, DEFAULT_MAX_ID)
    }

    /// Creates a heap-backed parser whose group and key names may be up to
    /// `max_id - 1` bytes long.
    ///
    /// # Panics
    ///
    /// Panics if `max_id < 2`.
    pub fn with_max_id(mapper: M, max_id: usize) -> Self {
        Self::with_idents(mapper, HeapIdents::new(max_id))
    }
}

impl<'dst, M, S> IniParser<'dst, M, S>
where
    M: MappingProvider<'dst>,
    S: IdentStore,
{
    /// Creates a parser over caller-provided identifier storage, e.g.
    /// [`InlineIdents`] for an allocation-free parser.
    pub fn with_idents(mapper: M, idents: S) -> Self {
        Self {
            mapper,
            idents,
            state: ParseState::Start,
            binding: Binding::None,
            err: None,
            line: 1,
            last: None,
            idx: 0,
            trail_blank: 0,
            num: 0,
            num_neg: false,
            quote: 0,
        }
    }

    /// Parses a single byte.
    pub fn feed(&mut self, byte: u8) -> Result<(), ParseError> {
        self.advance(Some(byte))
    }

    /// Parses a buffer of bytes, stopping at the first error.
    pub fn feed_slice(&mut self, bytes: &[u8]) -> Result<(), ParseError> {
        for &byte in bytes {
            self.advance(Some(byte))?;
        }
        Ok(())
    }

    /// Parses a buffer of text, stopping at the first error.
    pub fn feed_str(&mut self, text: &str) -> Result<(), ParseError> {
        self.feed_slice(text.as_bytes())
    }

    /// Signals end of input, closing any record in progress.
    ///
    /// End of input behaves like a line terminator in every value context. A
    /// successfully finished parser sits at a record boundary and may be fed
    /// further input.
    pub fn finish(&mut self) -> Result<(), ParseError> {
        self.advance(None)
    }

    /// The current 1-based line number. After a failure this is the line the
    /// error occurred on.
    #[must_use]
    pub fn line(&self) -> usize {
        self.line
    }

    /// `true` while no parsing error has occurred.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.state != ParseState::Error
    }

    /// The stored error, if parsing has failed.
    #[must_use]
    pub fn error(&self) -> Option<ParseError> {
        self.err
    }

    /// Restores the parser to its initial state: line 1, empty group and key,
    /// no binding, no error.
    pub fn reset(&mut self) {
        self.state = ParseState::Start;
        self.binding = Binding::None;
        self.err = None;
        self.line = 1;
        self.last = None;
        self.idx = 0;
        self.trail_blank = 0;
        self.num = 0;
        self.num_neg = false;
        self.quote = 0;
        self.idents.clear();
    }

    /// Consumes the parser and returns the mapping provider.
    #[must_use]
    pub fn into_mapper(self) -> M {
        self.mapper
    }

    fn advance(&mut self, ch: Option<u8>) -> Result<(), ParseError> {
        if let Some(err) = self.err {
            return Err(err);
        }
        // A CR bumps the line; an LF only if the previous byte was not CR,
        // which collapses CR+LF into one line. The bump is applied after the
        // byte has been accepted so that errors report the line they are on.
        let add_line = match ch {
            Some(b'\r') => 1,
            Some(b'\n') if self.last != Some(b'\r') => 1,
            _ => 0,
        };
        self.last = ch;
        match self.step(ch) {
            Ok(()) => {
                self.line += add_line;
                Ok(())
            }
            Err(kind) => {
                let err = ParseError {
                    kind,
                    line: self.line,
                };
                self.state = ParseState::Error;
                self.err = Some(err);
                Err(err)
            }
        }
    }

    /// Dispatches one byte (`None` = end of input) against the current state.
    ///
    /// The `loop` re-dispatches a byte after a state change where the
    /// original position would not consume it; this happens at most twice per
    /// byte (once in `Value` to select the binding, once in the new state).
    #[allow(clippy::too_many_lines)]
    fn step(&mut self, ch: Option<u8>) -> Result<(), ErrorKind> {
        loop {
            match self.state {
                ParseState::Start => {
                    return match ch {
                        None => Ok(()),
                        Some(b'[') => {
                            self.idents.group_mut()[0] = 0;
                            self.idx = 0;
                            self.state = ParseState::Group;
                            Ok(())
                        }
                        Some(b'#') => {
                            self.state = ParseState::Comment;
                            Ok(())
                        }
                        Some(c) if c.is_ascii_alphabetic() => {
                            self.idx = 0;
                            self.state = ParseState::Key;
                            push_ident(self.idents.key_mut(), &mut self.idx, c)
                        }
                        Some(c) if is_space(c) => Ok(()),
                        Some(c) => Err(ErrorKind::InvalidCharacter(c)),
                    };
                }

                ParseState::Group => {
                    return match ch {
                        Some(b']') => {
                            // buffer is already null-terminated
                            self.state = ParseState::Start;
                            Ok(())
                        }
                        Some(c) if is_id_cont(c) => {
                            if self.idx == 0 && !c.is_ascii_alphabetic() {
                                Err(ErrorKind::InvalidCharacter(c))
                            } else {
                                push_ident(self.idents.group_mut(), &mut self.idx, c)
                            }
                        }
                        None | Some(b'\r' | b'\n') => Err(ErrorKind::UnexpectedEnd),
                        Some(c) => Err(ErrorKind::InvalidCharacter(c)),
                    };
                }

                ParseState::Key => {
                    return match ch {
                        Some(c) if is_id_cont(c) => {
                            push_ident(self.idents.key_mut(), &mut self.idx, c)
                        }
                        Some(b'=') => {
                            self.state = ParseState::Value;
                            Ok(())
                        }
                        Some(c) if is_blank(c) => {
                            self.state = ParseState::Assign;
                            Ok(())
                        }
                        None | Some(b'\r' | b'\n') => Err(ErrorKind::UnexpectedEnd),
                        Some(c) => Err(ErrorKind::InvalidCharacter(c)),
                    };
                }

                ParseState::Assign => {
                    return match ch {
                        Some(b'=') => {
                            self.state = ParseState::Value;
                            Ok(())
                        }
                        Some(c) if is_blank(c) => Ok(()),
                        None | Some(b'\r' | b'\n') => Err(ErrorKind::UnexpectedEnd),
                        Some(c) => Err(ErrorKind::InvalidCharacter(c)),
                    };
                }

                ParseState::Value => {
                    if let Some(c) = ch {
                        if is_blank(c) {
                            // leading blanks
                            return Ok(());
                        }
                        if !is_str_char(c) && c != b'\r' && c != b'\n' {
                            return Err(ErrorKind::InvalidCharacter(c));
                        }
                    }
                    // First value byte, or end of record for an empty value:
                    // let the mapping provider choose a destination.
                    self.state = ParseState::IgnoreValue;
                    self.binding = Binding::None;
                    if !self.run_mapper(false) {
                        return Err(ErrorKind::Rejected);
                    }
                    match self.state {
                        ParseState::StrValue => {
                            self.idx = 0;
                            self.trail_blank = 0;
                            match ch {
                                Some(q @ (b'"' | b'\'')) => {
                                    self.quote = q;
                                    return Ok(());
                                }
                                _ => {
                                    self.quote = 0;
                                    continue;
                                }
                            }
                        }
                        ParseState::U32Value | ParseState::HexU32Value => {
                            self.idx = 0;
                            self.num = 0;
                            self.num_neg = false;
                            continue;
                        }
                        ParseState::I32Value | ParseState::HexI32Value => {
                            let hex = self.state == ParseState::HexI32Value;
                            self.idx = 0;
                            self.num = 0;
                            self.num_neg = ch == Some(b'-');
                            self.state = if hex {
                                ParseState::HexU32Value
                            } else {
                                ParseState::U32Value
                            };
                            if self.num_neg {
                                // the sign is consumed; digits follow
                                return Ok(());
                            }
                            // without a sign the value cannot reach below
                            // zero, so collect it on the unsigned path
                            if let Binding::Signed { max, .. } = self.binding {
                                if max < 0 {
                                    return Err(ErrorKind::NumberOutOfRange);
                                }
                            }
                            continue;
                        }
                        ParseState::IgnoreValue => match ch {
                            Some(q @ (b'"' | b'\'')) => {
                                self.quote = q;
                                return Ok(());
                            }
                            _ => {
                                self.quote = 0;
                                continue;
                            }
                        },
                        // the binding verbs are the only state mutators the
                        // provider can reach
                        _ => unreachable!(),
                    }
                }

                ParseState::IgnoreValue => {
                    return if self.quote == 0 {
                        match ch {
                            Some(b'#') => {
                                self.state = ParseState::Comment;
                                Ok(())
                            }
                            None | Some(b'\r' | b'\n') => {
                                self.state = ParseState::Start;
                                Ok(())
                            }
                            Some(c) if is_str_char(c) => Ok(()),
                            Some(c) => Err(ErrorKind::InvalidCharacter(c)),
                        }
                    } else {
                        match ch {
                            Some(c) if c == self.quote => {
                                self.state = ParseState::Blank;
                                Ok(())
                            }
                            None | Some(b'\r' | b'\n') => Err(ErrorKind::UnexpectedEnd),
                            Some(c) if is_str_char(c) => Ok(()),
                            Some(c) => Err(ErrorKind::InvalidCharacter(c)),
                        }
                    };
                }

                ParseState::StrValue => {
                    // the string binding verb is the only path into this state
                    let Binding::Str(dst) = self.binding else {
                        unreachable!()
                    };
                    if self.idx >= dst.len() {
                        return Err(ErrorKind::ValueTooLong);
                    }
                    let close_to = match ch {
                        Some(b'#') if self.quote == 0 => Some(ParseState::Comment),
                        Some(c) if self.quote != 0 && c == self.quote => Some(ParseState::Blank),
                        None | Some(b'\r' | b'\n') if self.quote == 0 => Some(ParseState::Start),
                        None | Some(b'\r' | b'\n') => return Err(ErrorKind::UnexpectedEnd),
                        Some(c) if is_str_char(c) => {
                            if is_blank(c) {
                                if self.trail_blank == 0 {
                                    self.trail_blank = self.idx;
                                }
                            } else {
                                self.trail_blank = 0;
                            }
                            dst[self.idx].set(c);
                            self.idx += 1;
                            None
                        }
                        Some(c) => return Err(ErrorKind::InvalidCharacter(c)),
                    };
                    if let Some(next) = close_to {
                        // unquoted values drop their trailing blanks, quoted
                        // values keep them
                        let end = if self.quote == 0 && self.trail_blank != 0 {
                            self.trail_blank
                        } else {
                            self.idx
                        };
                        dst[end].set(0);
                        if !self.run_mapper(true) {
                            return Err(ErrorKind::Rejected);
                        }
                        self.state = next;
                    }
                    return Ok(());
                }

                ParseState::U32Value => {
                    let close_to = match ch {
                        Some(c) if c.is_ascii_digit() => {
                            self.idx += 1;
                            self.num = self
                                .num
                                .checked_mul(10)
                                .and_then(|n| n.checked_add(u32::from(c - b'0')))
                                .ok_or(ErrorKind::NumberOverflow)?;
                            None
                        }
                        None | Some(b'\r' | b'\n') => Some(ParseState::Start),
                        Some(b'x') if self.idx == 1 && self.num == 0 => {
                            // a single leading zero followed by `x` switches
                            // to hexadecimal
                            self.state = ParseState::HexU32Value;
                            None
                        }
                        Some(b'#') => Some(ParseState::Comment),
                        Some(c) if is_blank(c) => Some(ParseState::Blank),
                        Some(c) => return Err(ErrorKind::InvalidCharacter(c)),
                    };
                    if let Some(next) = close_to {
                        if self.idx == 0 {
                            return Err(ErrorKind::MissingNumber);
                        }
                        self.close_number()?;
                        self.state = next;
                    }
                    return Ok(());
                }

                ParseState::HexU32Value => {
                    let close_to = match ch {
                        Some(c) if c.is_ascii_hexdigit() => {
                            self.idx += 1;
                            self.num = self
                                .num
                                .checked_mul(16)
                                .and_then(|n| n.checked_add(hex_value(c)))
                                .ok_or(ErrorKind::NumberOverflow)?;
                            None
                        }
                        None | Some(b'\r' | b'\n') => Some(ParseState::Start),
                        Some(b'#') => Some(ParseState::Comment),
                        Some(c) if is_blank(c) => Some(ParseState::Blank),
                        Some(c) => return Err(ErrorKind::InvalidCharacter(c)),
                    };
                    if let Some(next) = close_to {
                        if self.idx == 0 {
                            return Err(ErrorKind::MissingNumber);
                        }
                        self.close_number()?;
                        self.state = next;
                    }
                    return Ok(());
                }

                ParseState::Blank => {
                    return match ch {
                        Some(b'#') => {
                            self.state = ParseState::Comment;
                            Ok(())
                        }
                        None | Some(b'\r' | b'\n') => {
                            self.state = ParseState::Start;
                            Ok(())
                        }
                        Some(c) if is_blank(c) => Ok(()),
                        Some(c) => Err(ErrorKind::InvalidCharacter(c)),
                    };
                }

                ParseState::Comment => {
                    if matches!(ch, None | Some(b'\r' | b'\n')) {
                        self.state = ParseState::Start;
                    }
                    return Ok(());
                }

                // I32Value/HexI32Value resolve inside the Value dispatch;
                // advance() returns the stored error before stepping on Error
                ParseState::I32Value | ParseState::HexI32Value | ParseState::Error => {
                    unreachable!()
                }
            }
        }
    }

    /// Range-checks the accumulated number, commits it through the binding
    /// and runs the verification phase.
    fn close_number(&mut self) -> Result<(), ErrorKind> {
        match self.binding {
            Binding::Unsigned { dst, min, max } => {
                if self.num < min || self.num > max {
                    return Err(ErrorKind::NumberOutOfRange);
                }
                dst.set(self.num);
            }
            Binding::Signed { dst, min, max } => {
                if self.num_neg {
                    if self.num > 0x8000_0000 {
                        return Err(ErrorKind::NumberOverflow);
                    }
                    let val = (self.num as i32).wrapping_neg();
                    if val < min || val > max {
                        return Err(ErrorKind::NumberOutOfRange);
                    }
                    dst.set(val);
                } else {
                    // max >= 0 was checked at value start, and the minimum
                    // clamps to zero for an unsigned parse
                    let min = min.max(0) as u32;
                    if self.num < min || self.num > max as u32 {
                        return Err(ErrorKind::NumberOutOfRange);
                    }
                    dst.set(self.num as i32);
                }
            }
            // number states are entered only with a number binding
            Binding::None | Binding::Str(_) => unreachable!(),
        }
        if self.run_mapper(true) {
            Ok(())
        } else {
            Err(ErrorKind::Rejected)
        }
    }

    fn run_mapper(&mut self, parsed: bool) -> bool {
        let mut ctx = Context {
            group: ident_str(self.idents.group()),
            key: ident_str(self.idents.key()),
            state: &mut self.state,
            binding: &mut self.binding,
        };
        self.mapper.map(&mut ctx, parsed)
    }
}

// ------------------------------------------------------------------------------------------------
// Convenience entry points
// ------------------------------------------------------------------------------------------------

/// Parses a complete document from a string with a fresh default parser.
///
/// Returns the first error, carrying the 1-based line it occurred on.
pub fn parse_str<'dst, M>(text: &str, mapper: M) -> Result<(), ParseError>
where
    M: MappingProvider<'dst>,
{
    parse_bytes(text.as_bytes(), mapper)
}

/// Parses a complete document from a byte slice with a fresh default parser.
pub fn parse_bytes<'dst, M>(bytes: &[u8], mapper: M) -> Result<(), ParseError>
where
    M: MappingProvider<'dst>,
{
    let mut parser = IniParser::new(mapper);
    parser.feed_slice(bytes)?;
    parser.finish()
}

/// Parses a complete document from a pull-style byte provider; `None` is the
/// end-of-input sentinel.
pub fn parse_fn<'dst, M, D>(mut data: D, mapper: M) -> Result<(), ParseError>
where
    M: MappingProvider<'dst>,
    D: FnMut() -> Option<u8>,
{
    let mut parser = IniParser::new(mapper);
    loop {
        match data() {
            Some(byte) => parser.feed(byte)?,
            None => return parser.finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_of_state() {
        use core::mem::size_of;
        assert_eq!(size_of::<ParseState>(), 1);
    }
}
