//! A streaming, push-driven parser for a restricted INI-style configuration
//! dialect.
//!
//! `inimodem` consumes input one byte at a time (or in buffered form) and, for
//! each completed `group.key = value` record, routes the parsed value into a
//! caller-supplied destination. The destination, and whether the value is a
//! string or a ranged number (decimal or hexadecimal, signed or unsigned), is
//! chosen dynamically by a *mapping provider* the caller installs at
//! construction, based on the current group and key. Unknown keys are scanned
//! and discarded.
//!
//! The parser allocates nothing after construction (nothing at all with
//! [`InlineIdents`] storage), tracks a 1-based line counter for diagnostics,
//! and stops permanently at the first syntax violation.
//!
//! # Examples
//!
//! ```rust
//! use core::cell::Cell;
//!
//! use inimodem::{mapping, parse_str, str_slot};
//!
//! let mut name_buf = [0u8; 16];
//! let name = str_slot(&mut name_buf);
//! let port = Cell::new(0u32);
//!
//! parse_str(
//!     "[SERVER]\nNAME = 'ntp0'\nPORT = 123 # NTP\n",
//!     mapping(|ctx| {
//!         if ctx.group() == "SERVER" {
//!             match ctx.key() {
//!                 "NAME" => ctx.map_str(name),
//!                 "PORT" => ctx.map_u32(&port, 1..=65_535),
//!                 _ => {}
//!             }
//!         }
//!         true
//!     }),
//! )
//! .unwrap();
//!
//! assert_eq!(port.get(), 123);
//! assert!(name.iter().map(Cell::get).take_while(|&b| b != 0).eq(*b"ntp0"));
//! ```
//!
//! For incremental input, construct an [`IniParser`] and drive it with
//! [`feed`](IniParser::feed) / [`finish`](IniParser::finish); see the type
//! docs for details.

#![no_std]

extern crate alloc;

#[cfg(test)]
extern crate std;

mod context;
mod error;
mod idents;
mod mapping;
mod parser;

pub use context::{str_slot, Context};
pub use error::{ErrorKind, ParseError};
pub use idents::{HeapIdents, IdentStore, InlineIdents};
pub use mapping::{mapping, verifying, Mapping, MappingProvider, Verifying};
pub use parser::{parse_bytes, parse_fn, parse_str, IniParser, SizedIniParser};

#[cfg(test)]
mod tests;
