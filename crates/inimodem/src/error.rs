use thiserror::Error;

/// A parse failure, carrying the 1-based line it occurred on.
///
/// Once an [`IniParser`](crate::IniParser) has produced a `ParseError`, every
/// further [`feed`](crate::IniParser::feed) returns the same error until
/// [`reset`](crate::IniParser::reset) is called.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("{kind} at line {line}")]
pub struct ParseError {
    pub(crate) kind: ErrorKind,
    pub(crate) line: usize,
}

impl ParseError {
    /// What went wrong.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// The 1-based line the offending byte was on.
    #[must_use]
    pub fn line(&self) -> usize {
        self.line
    }
}

/// The kind of a [`ParseError`].
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A byte that is not valid in the current position.
    #[error("invalid character 0x{0:02x}")]
    InvalidCharacter(u8),
    /// The line or the input ended inside an open construct: an unterminated
    /// `[group]` header, a quoted value, or a record cut short before `=`.
    #[error("unexpected end of line or input")]
    UnexpectedEnd,
    /// A group or key name longer than the identifier capacity allows.
    #[error("group or key name too long")]
    IdentifierTooLong,
    /// A string value longer than the bound destination buffer.
    #[error("string value too long")]
    ValueTooLong,
    /// A number that does not fit into 32 bits.
    #[error("number overflow")]
    NumberOverflow,
    /// A number binding closed without a single digit.
    #[error("missing number")]
    MissingNumber,
    /// A number outside the range the binding allows.
    #[error("number out of range")]
    NumberOutOfRange,
    /// The mapping provider returned `false`.
    #[error("rejected by mapping provider")]
    Rejected,
}
