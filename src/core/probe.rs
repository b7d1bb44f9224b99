use crate::core::banner::parse_banner_bytes;
use crate::domain::model::{MpyBoard, UsbIdentity};
use crate::domain::ports::SerialLink;
use crate::utils::error::{AmpyError, Result};
use std::time::{Duration, Instant};

/// Ctrl-C twice to stop a running program, then Ctrl-B to leave raw REPL.
pub const WAKE: &[u8] = b"\r\x03\x03\x02";
pub const SOFT_RESET: &[u8] = b"\x04";
/// Ctrl-B in the friendly REPL reprints the banner.
pub const REPRINT_BANNER: &[u8] = b"\x03\x02";
pub const PROMPT: &[u8] = b">>> ";

pub const SETTLE: Duration = Duration::from_millis(100);
const CHUNK: usize = 256;

/// Soft-resets the device behind `link` and identifies it from the banner it prints.
pub fn detect_board<L: SerialLink + ?Sized>(
    link: &mut L,
    baud: u32,
    usb: Option<UsbIdentity>,
    timeout: Duration,
) -> Result<MpyBoard> {
    let port = link.port_name().to_string();
    tracing::debug!("Probing {} at {} baud", port, baud);

    link.write_all(WAKE)?;
    let settled = read_until(link, None, Instant::now() + SETTLE.min(timeout))?;
    link.clear_input()?;
    let mut heard_anything = !settled.is_empty();

    link.write_all(SOFT_RESET)?;
    let capture = read_until(link, Some(PROMPT), Instant::now() + timeout)?;
    heard_anything |= !capture.is_empty();

    let banner = match parse_banner_bytes(&capture) {
        Some(banner) => Some(banner),
        None => {
            tracing::debug!("No banner after soft reset on {}, asking again", port);
            link.write_all(REPRINT_BANNER)?;
            let retry = read_until(link, Some(PROMPT), Instant::now() + timeout)?;
            heard_anything |= !retry.is_empty();
            parse_banner_bytes(&retry)
        }
    };

    match banner {
        Some(banner) => {
            tracing::debug!("{} answered as {} {}", port, banner.firmware, banner.version);
            Ok(MpyBoard {
                port,
                baud,
                usb,
                banner,
            })
        }
        None if heard_anything => Err(AmpyError::NotABoard { port }),
        None => Err(AmpyError::ProbeTimeout { port }),
    }
}

/// Collects output until `needle` has been seen or `deadline` passes.
pub fn read_until<L: SerialLink + ?Sized>(
    link: &mut L,
    needle: Option<&[u8]>,
    deadline: Instant,
) -> Result<Vec<u8>> {
    let mut collected = Vec::new();
    let mut buf = [0u8; CHUNK];

    while Instant::now() < deadline {
        let n = link.read_chunk(&mut buf)?;
        if n == 0 {
            continue;
        }
        collected.extend_from_slice(&buf[..n]);
        if let Some(needle) = needle {
            if collected.ends_with(needle) {
                break;
            }
        }
    }

    Ok(collected)
}
