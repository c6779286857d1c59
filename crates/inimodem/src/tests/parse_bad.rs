use super::{err_line, ignore_all};
use crate::{mapping, parse_str, str_slot, ErrorKind, IniParser};

#[test]
fn invalid_characters() {
    for input in [
        "\x03",
        "[8A]",
        "[A-]",
        "[A:]",
        "[A,]",
        "(A)",
        "; not a comment",
        "8A = b",
        "A-b = b",
        "A\x03 = b",
        "A = \x03",
        "A = b\x03",
        "A : b",
        "A = 'b\n'",
        "A = 'b\r'",
        "A = 'b'z",
        "A = '\x7f'",
    ] {
        assert_eq!(err_line(input), 1, "{input:?}");
    }
}

#[test]
fn invalid_formats() {
    for input in [
        "[group",
        "[ group]",
        "[\tgroup]",
        "[\rgroup]",
        "[\ngroup]",
        "[gr oup]",
        "[gr\toup]",
        "[gr\roup]",
        "[gr\noup]",
        "[group ]",
        "[group\t]",
        "[group\r]",
        "[group\n]",
        "k ey = value",
        "k\tey = value",
        "k\rey = value",
        "k\ney = value",
        "key",
        "key\r",
        "key\n",
        "key \r",
        "key \n",
        "key #comment\n",
        "key\t\r",
        "key\t\n",
        "key\t#comment\n",
    ] {
        assert_eq!(err_line(input), 1, "{input:?}");
    }
}

#[test]
fn error_kinds() {
    let cases: [(&str, ErrorKind); 6] = [
        ("(A)", ErrorKind::InvalidCharacter(b'(')),
        ("[gr oup]", ErrorKind::InvalidCharacter(b' ')),
        ("[group", ErrorKind::UnexpectedEnd),
        ("[group\n]", ErrorKind::UnexpectedEnd),
        ("key #c", ErrorKind::InvalidCharacter(b'#')),
        ("A = 'b\n'", ErrorKind::UnexpectedEnd),
    ];
    for (input, kind) in cases {
        let err = parse_str(input, mapping(ignore_all)).unwrap_err();
        assert_eq!(err.kind(), kind, "{input:?}");
    }
}

#[test]
fn errors_are_sticky() {
    let mut parser = IniParser::new(mapping(ignore_all));
    let first = parser.feed_str("[gr oup]").unwrap_err();
    assert_eq!(first.kind(), ErrorKind::InvalidCharacter(b' '));
    assert_eq!(first.line(), 1);
    for _ in 0..3 {
        assert_eq!(parser.feed(b' '), Err(first));
    }
    assert_eq!(parser.finish(), Err(first));
    assert!(!parser.is_ok());
    assert_eq!(parser.error(), Some(first));
    assert_eq!(parser.line(), 1);
}

#[test]
fn nul_byte_is_rejected() {
    let mut buf = [0u8; 8];
    let dst = str_slot(&mut buf);
    let mut parser = IniParser::new(mapping(|ctx| {
        if ctx.key() == "key" {
            ctx.map_str(dst);
        }
        true
    }));
    parser.feed_str("[group]\nkey = abc").unwrap();
    let err = parser.feed(0).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidCharacter(0));
    assert_eq!(err.line(), 2);

    // same for a value nothing is bound to
    let mut parser = IniParser::new(mapping(ignore_all));
    parser.feed_str("[group]\nkey = abc").unwrap();
    assert_eq!(parser.feed(0).unwrap_err().line(), 2);
}

#[test]
fn mapper_rejects_at_selection() {
    let err = parse_str("[group]\nkey = abc", mapping(|_| false)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Rejected);
    assert_eq!(err.line(), 2);
}

#[test]
fn error_line_is_the_offending_line() {
    assert_eq!(err_line("[group]\nkey = 'abc'd"), 2);
    assert_eq!(err_line("[group]\nkey = 'ab\rc'"), 2);
    assert_eq!(err_line("[group]\nkey = 'ab\nc'"), 2);
    assert_eq!(err_line("[group]\nkey = 'ab"), 2);
    assert_eq!(err_line("[a]\n[b]\n[c]\n[d"), 4);
}
