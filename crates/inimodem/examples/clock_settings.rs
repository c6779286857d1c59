//! Loads wall-clock firmware settings from an INI image and prints them.
//!
//! Run with `cargo run --example clock_settings`.

use core::cell::Cell;

use inimodem::{mapping, parse_str, str_slot};

const GOOD: &str = "\
# shipped defaults, overridden from flash at boot
[WLAN]
SSID = 'hallway clock'
PASS = \"s3cr3t!\"

[TIME]
HOST = pool.ntp.org
PORT = 123
ZONE = -60        # minutes east of UTC

[CLOCK]
BRIGHTNESS = 0x80
TICK.MS    = 250
";

const BAD: &str = "[CLOCK]\nBRIGHTNESS = 4096\n";

fn text(cells: &[Cell<u8>]) -> String {
    cells
        .iter()
        .map(Cell::get)
        .take_while(|&b| b != 0)
        .map(char::from)
        .collect()
}

fn main() {
    let mut ssid_buf = [0u8; 32];
    let mut pass_buf = [0u8; 32];
    let mut host_buf = [0u8; 32];
    let ssid = str_slot(&mut ssid_buf);
    let pass = str_slot(&mut pass_buf);
    let host = str_slot(&mut host_buf);
    let port = Cell::new(123u32);
    let zone = Cell::new(0i32);
    let brightness = Cell::new(255u32);
    let tick_ms = Cell::new(500u32);

    let mapper = mapping(|ctx| {
        match (ctx.group(), ctx.key()) {
            ("WLAN", "SSID") => ctx.map_str(ssid),
            ("WLAN", "PASS") => ctx.map_str(pass),
            ("TIME", "HOST") => ctx.map_str(host),
            ("TIME", "PORT") => ctx.map_u32(&port, 1..=65_535),
            ("TIME", "ZONE") => ctx.map_i32(&zone, -720..=720),
            ("CLOCK", "BRIGHTNESS") => ctx.map_u32(&brightness, 0..=255),
            ("CLOCK", "TICK.MS") => ctx.map_u32(&tick_ms, 50..=1_000),
            _ => {}
        }
        true
    });

    parse_str(GOOD, mapper).expect("shipped defaults parse");

    println!("wlan:  {:?} / {:?}", text(ssid), text(pass));
    println!("ntp:   {}:{} (zone {:+} min)", text(host), port.get(), zone.get());
    println!("clock: brightness {}, tick {} ms", brightness.get(), tick_ms.get());

    // out-of-range values surface as an error with the offending line
    match parse_str(BAD, mapper) {
        Ok(()) => unreachable!("BAD must not parse"),
        Err(err) => println!("rejected override: {err}"),
    }
}
