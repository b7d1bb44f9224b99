#![allow(dead_code)]

use ampy::core::{PortInfo, PortKind, SerialLink, SerialOpener, UsbIdentity};
use ampy::{AmpyError, Result};
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const ESP32_BANNER: &[u8] = b"MPY: soft reboot\r\nMicroPython v1.19.1 on 2022-06-18; ESP32 module with ESP32\r\nType \"help()\" for more information.\r\n>>> ";
pub const PICO_BANNER: &[u8] =
    b"MPY: soft reboot\r\nMicroPython v1.20.0 on 2023-04-26; Raspberry Pi Pico W with RP2040\r\n>>> ";

/// How a scripted device reacts.
#[derive(Clone, Default)]
pub struct Script {
    /// Reply queued whenever the exact trigger bytes are written.
    pub replies: Vec<(Vec<u8>, Vec<u8>)>,
    /// Bytes that start arriving on the first read.
    pub initial: Vec<u8>,
    /// Fail reads with a broken pipe once `initial` and replies are drained.
    pub disconnect_when_drained: bool,
}

impl Script {
    pub fn board(banner: &[u8]) -> Self {
        Self {
            replies: vec![(b"\x04".to_vec(), banner.to_vec())],
            ..Self::default()
        }
    }

    pub fn silent() -> Self {
        Self::default()
    }

    pub fn streaming(initial: &[u8]) -> Self {
        Self {
            initial: initial.to_vec(),
            ..Self::default()
        }
    }
}

pub struct ScriptedLink {
    name: String,
    script: Script,
    pending: VecDeque<u8>,
    primed: bool,
    written: Arc<Mutex<Vec<u8>>>,
    in_flight: Arc<AtomicUsize>,
}

impl SerialLink for ScriptedLink {
    fn port_name(&self) -> &str {
        &self.name
    }

    fn write_all(&mut self, data: &[u8]) -> Result<()> {
        if let Ok(mut written) = self.written.lock() {
            written.extend_from_slice(data);
        }
        if let Some((_, reply)) = self.script.replies.iter().find(|(trigger, _)| trigger == data) {
            self.pending.extend(reply.iter());
        }
        Ok(())
    }

    fn read_chunk(&mut self, buf: &mut [u8]) -> Result<usize> {
        if !self.primed {
            self.primed = true;
            self.pending.extend(self.script.initial.iter());
        }
        if self.pending.is_empty() {
            if self.script.disconnect_when_drained {
                return Err(AmpyError::IoError(std::io::Error::new(
                    std::io::ErrorKind::BrokenPipe,
                    "device unplugged",
                )));
            }
            // stand in for a real read timeout
            std::thread::sleep(Duration::from_millis(2));
            return Ok(0);
        }
        let n = buf.len().min(self.pending.len());
        for (slot, byte) in buf.iter_mut().zip(self.pending.drain(..n)) {
            *slot = byte;
        }
        Ok(n)
    }

    fn clear_input(&mut self) -> Result<()> {
        self.pending.clear();
        Ok(())
    }
}

impl Drop for ScriptedLink {
    fn drop(&mut self) {
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Serves scripted links for a fixed set of ports.
#[derive(Default)]
pub struct FakeOpener {
    ports: Vec<PortInfo>,
    scripts: HashMap<String, Script>,
    written: Mutex<HashMap<String, Arc<Mutex<Vec<u8>>>>>,
    opened: Mutex<Vec<String>>,
    in_flight: Arc<AtomicUsize>,
    max_in_flight: Arc<AtomicUsize>,
}

impl FakeOpener {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_usb_port(mut self, name: &str, script: Script) -> Self {
        self.ports.push(PortInfo {
            name: name.to_string(),
            kind: PortKind::Usb(UsbIdentity {
                vid: 0x2e8a,
                pid: 0x0005,
                serial_number: Some(format!("SN-{}", name)),
                manufacturer: Some("MicroPython".to_string()),
                product: Some("Board in FS mode".to_string()),
            }),
        });
        self.scripts.insert(name.to_string(), script);
        self
    }

    pub fn with_port(mut self, name: &str, kind: PortKind, script: Script) -> Self {
        self.ports.push(PortInfo {
            name: name.to_string(),
            kind,
        });
        self.scripts.insert(name.to_string(), script);
        self
    }

    /// A port that opens but is missing from the port listing.
    pub fn with_unlisted_port(mut self, name: &str, script: Script) -> Self {
        self.scripts.insert(name.to_string(), script);
        self
    }

    pub fn opened(&self) -> Vec<String> {
        self.opened.lock().map(|o| o.clone()).unwrap_or_default()
    }

    pub fn written(&self, port: &str) -> Vec<u8> {
        self.written
            .lock()
            .ok()
            .and_then(|w| w.get(port).cloned())
            .and_then(|bytes| bytes.lock().ok().map(|b| b.clone()))
            .unwrap_or_default()
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

impl SerialOpener for FakeOpener {
    type Link = ScriptedLink;

    fn open(&self, port: &str, _baud: u32, _read_timeout: Duration) -> Result<ScriptedLink> {
        let script = self.scripts.get(port).cloned().ok_or_else(|| {
            AmpyError::SerialError(serialport::Error::new(
                serialport::ErrorKind::NoDevice,
                format!("{} not found", port),
            ))
        })?;

        if let Ok(mut opened) = self.opened.lock() {
            opened.push(port.to_string());
        }
        let written = Arc::new(Mutex::new(Vec::new()));
        if let Ok(mut all) = self.written.lock() {
            all.insert(port.to_string(), Arc::clone(&written));
        }

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        Ok(ScriptedLink {
            name: port.to_string(),
            pending: VecDeque::new(),
            primed: false,
            script,
            written,
            in_flight: Arc::clone(&self.in_flight),
        })
    }

    fn list_ports(&self) -> Result<Vec<PortInfo>> {
        Ok(self.ports.clone())
    }
}
