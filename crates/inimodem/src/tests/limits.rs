use super::ignore_all;
use crate::{mapping, ErrorKind, IniParser, InlineIdents, SizedIniParser};

fn parse_with_max_id(input: &str, max_id: usize) -> Result<(), crate::ParseError> {
    let mut parser = IniParser::with_max_id(mapping(ignore_all), max_id);
    parser.feed_str(input)?;
    parser.finish()
}

#[test]
fn identifier_limits() {
    // seven characters plus the null terminator fit a capacity of eight
    assert_eq!(parse_with_max_id("[g123456]", 8), Ok(()));
    assert_eq!(
        parse_with_max_id("[g1234567]", 8).unwrap_err().kind(),
        ErrorKind::IdentifierTooLong
    );
    assert_eq!(parse_with_max_id("k123456 =", 8), Ok(()));
    assert_eq!(
        parse_with_max_id("k1234567 =", 8).unwrap_err().kind(),
        ErrorKind::IdentifierTooLong
    );
}

#[test]
fn identifier_limits_inline() {
    let mut parser: SizedIniParser<_, 6> =
        IniParser::with_idents(mapping(ignore_all), InlineIdents::new());
    parser.feed_str("[group]\ngroup = 1\n").unwrap();
    parser.finish().unwrap();

    let mut parser = IniParser::with_idents(mapping(ignore_all), InlineIdents::<5>::new());
    let err = parser.feed_str("[group]").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::IdentifierTooLong);
    assert_eq!(err.line(), 1);
}

#[test]
fn long_key_after_short_key_does_not_leak() {
    use alloc::string::ToString;
    use alloc::vec::Vec;
    use core::cell::RefCell;

    let keys = RefCell::new(Vec::new());
    let mut parser = IniParser::new(mapping(|ctx| {
        keys.borrow_mut().push(ctx.key().to_string());
        true
    }));
    parser.feed_str("longkey = 1\nk= 2\nke =3\n").unwrap();
    parser.finish().unwrap();
    assert_eq!(*keys.borrow(), ["longkey", "k", "ke"]);
}
