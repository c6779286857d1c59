//! End-to-end parsing of a realistic configuration through the public API.

use core::cell::Cell;

use inimodem::{mapping, parse_fn, parse_str, str_slot, IniParser};

const CONFIG: &str = "\
# wall clock configuration
[WLAN]
SSID = 'hallway clock'
PASS = \"s3cr3t!#\"
TIMEOUT = 30

[TIME]
HOST = pool.ntp.org
PORT = 123
ZONE = -60\t# minutes east of UTC

[CLOCK]
BRIGHTNESS = 0x80
";

fn text(cells: &[Cell<u8>]) -> String {
    cells
        .iter()
        .map(Cell::get)
        .take_while(|&b| b != 0)
        .map(char::from)
        .collect()
}

#[test]
fn parses_a_complete_configuration() {
    let mut ssid_buf = [0u8; 32];
    let mut pass_buf = [0u8; 32];
    let mut host_buf = [0u8; 32];
    let ssid = str_slot(&mut ssid_buf);
    let pass = str_slot(&mut pass_buf);
    let host = str_slot(&mut host_buf);
    let timeout = Cell::new(0u32);
    let port = Cell::new(0u32);
    let zone = Cell::new(0i32);
    let brightness = Cell::new(0u32);

    let mapper = mapping(|ctx| {
        match (ctx.group(), ctx.key()) {
            ("WLAN", "SSID") => ctx.map_str(ssid),
            ("WLAN", "PASS") => ctx.map_str(pass),
            ("WLAN", "TIMEOUT") => ctx.map_u32(&timeout, 1..=300),
            ("TIME", "HOST") => ctx.map_str(host),
            ("TIME", "PORT") => ctx.map_u32(&port, 1..=65_535),
            ("TIME", "ZONE") => ctx.map_i32(&zone, -720..=720),
            ("CLOCK", "BRIGHTNESS") => ctx.map_u32(&brightness, 0..=255),
            _ => {}
        }
        true
    });

    parse_str(CONFIG, mapper).unwrap();

    assert_eq!(text(ssid), "hallway clock");
    assert_eq!(text(pass), "s3cr3t!#");
    assert_eq!(text(host), "pool.ntp.org");
    assert_eq!(timeout.get(), 30);
    assert_eq!(port.get(), 123);
    assert_eq!(zone.get(), -60);
    assert_eq!(brightness.get(), 128);
}

#[test]
fn byte_at_a_time_matches_buffered_parsing() {
    let mut host_buf = [0u8; 32];
    let host = str_slot(&mut host_buf);
    let port = Cell::new(0u32);

    let mapper = mapping(|ctx| {
        if ctx.group() == "TIME" {
            match ctx.key() {
                "HOST" => ctx.map_str(host),
                "PORT" => ctx.map_u32(&port, ..),
                _ => {}
            }
        }
        true
    });

    let mut parser = IniParser::new(mapper);
    for byte in CONFIG.bytes() {
        parser.feed(byte).unwrap();
    }
    parser.finish().unwrap();

    assert_eq!(text(host), "pool.ntp.org");
    assert_eq!(port.get(), 123);
    assert_eq!(parser.line(), CONFIG.lines().count() + 1);
}

#[test]
fn pull_provider_entry_point() {
    let port = Cell::new(0u32);
    let mut bytes = CONFIG.bytes();

    parse_fn(
        || bytes.next(),
        mapping(|ctx| {
            if ctx.group() == "TIME" && ctx.key() == "PORT" {
                ctx.map_u32(&port, ..);
            }
            true
        }),
    )
    .unwrap();

    assert_eq!(port.get(), 123);
}

#[test]
fn reports_the_failing_line() {
    let err = parse_str("[WLAN]\nSSID = 'clock\nPASS = x\n", mapping(|_| true)).unwrap_err();
    assert_eq!(err.line(), 2);
}
