use crate::domain::model::{Banner, Firmware};
use regex::Regex;
use std::sync::OnceLock;

fn banner_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?m)(MicroPython|CircuitPython) (\S+) on (\S+); (.+?) with ([^\r\n]*?)[ \t]*\r?$",
        )
        .expect("banner regex is valid")
    })
}

/// Finds the last firmware banner in captured REPL output.
pub fn parse_banner(text: &str) -> Option<Banner> {
    banner_regex()
        .captures_iter(text)
        .filter_map(|caps| {
            let firmware = match &caps[1] {
                "MicroPython" => Firmware::MicroPython,
                _ => Firmware::CircuitPython,
            };
            let chip = caps[5].trim().to_string();
            if chip.is_empty() {
                return None;
            }
            Some(Banner {
                firmware,
                version: caps[2].to_string(),
                build_date: caps[3].to_string(),
                board: caps[4].trim().to_string(),
                chip,
            })
        })
        .last()
}

pub fn parse_banner_bytes(bytes: &[u8]) -> Option<Banner> {
    parse_banner(&String::from_utf8_lossy(bytes))
}
