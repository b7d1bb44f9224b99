use crate::domain::ports::SerialLink;
use crate::utils::error::{AmpyError, Result};
use chrono::{DateTime, Local};
use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

/// Interrupt whatever runs, then soft reset so boot output is captured from the start.
pub const INTERRUPT_AND_RESET: &[u8] = b"\r\x03\x03\x04";

/// Serial read timeout while streaming; also how often the stop flag is checked.
pub const LOG_READ_TICK: Duration = Duration::from_millis(200);

#[derive(Debug, Clone, Default)]
pub struct LogOptions {
    pub timestamps: bool,
    pub reset: bool,
    pub duration: Option<Duration>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamSummary {
    pub bytes: u64,
}

pub type Clock = Box<dyn Fn() -> DateTime<Local> + Send>;

/// Prefixes each line with the local time it started arriving.
pub struct LineStamper {
    at_line_start: bool,
    clock: Clock,
}

impl LineStamper {
    pub fn new() -> Self {
        Self::with_clock(Box::new(Local::now))
    }

    pub fn with_clock(clock: Clock) -> Self {
        Self {
            at_line_start: true,
            clock,
        }
    }

    pub fn stamp(&mut self, chunk: &[u8]) -> Vec<u8> {
        let mut out = Vec::with_capacity(chunk.len() + 16);
        for &byte in chunk {
            if self.at_line_start {
                let now = (self.clock)();
                out.extend_from_slice(format!("[{}] ", now.format("%H:%M:%S%.3f")).as_bytes());
                self.at_line_start = false;
            }
            out.push(byte);
            if byte == b'\n' {
                self.at_line_start = true;
            }
        }
        out
    }
}

impl Default for LineStamper {
    fn default() -> Self {
        Self::new()
    }
}

pub struct LogStreamer<L: SerialLink, W: Write> {
    link: L,
    sink: W,
    stamper: Option<LineStamper>,
    options: LogOptions,
}

impl<L: SerialLink, W: Write> LogStreamer<L, W> {
    pub fn new(link: L, sink: W, options: LogOptions) -> Self {
        let stamper = options.timestamps.then(LineStamper::new);
        Self {
            link,
            sink,
            stamper,
            options,
        }
    }

    pub fn with_stamper(mut self, stamper: LineStamper) -> Self {
        self.stamper = Some(stamper);
        self
    }

    pub fn into_sink(self) -> W {
        self.sink
    }

    /// Copies device output to the sink until `stop` is raised or the configured duration passes.
    pub fn run(&mut self, stop: &AtomicBool) -> Result<StreamSummary> {
        let port = self.link.port_name().to_string();
        // a duration past what Instant can represent means no deadline
        let deadline = self
            .options
            .duration
            .and_then(|d| Instant::now().checked_add(d));

        self.link.clear_input()?;
        if self.options.reset && !stop.load(Ordering::Relaxed) {
            tracing::debug!("Soft resetting {} before streaming", port);
            self.link.write_all(INTERRUPT_AND_RESET)?;
        }

        let mut summary = StreamSummary { bytes: 0 };
        let mut buf = [0u8; 1024];

        loop {
            if stop.load(Ordering::Relaxed) {
                tracing::debug!("Stop requested for {}", port);
                break;
            }
            if deadline.is_some_and(|deadline| Instant::now() >= deadline) {
                break;
            }

            let n = match self.link.read_chunk(&mut buf) {
                Ok(n) => n,
                Err(AmpyError::IoError(e)) => {
                    tracing::warn!("Read from {} failed: {}", port, e);
                    return Err(AmpyError::Disconnected { port });
                }
                Err(e) => return Err(e),
            };
            if n == 0 {
                continue;
            }

            match self.stamper.as_mut() {
                Some(stamper) => self.sink.write_all(&stamper.stamp(&buf[..n]))?,
                None => self.sink.write_all(&buf[..n])?,
            }
            self.sink.flush()?;
            summary.bytes += n as u64;
        }

        Ok(summary)
    }
}
