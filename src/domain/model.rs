use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Firmware {
    MicroPython,
    CircuitPython,
}

impl fmt::Display for Firmware {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Firmware::MicroPython => write!(f, "MicroPython"),
            Firmware::CircuitPython => write!(f, "CircuitPython"),
        }
    }
}

/// Identification line printed by the interpreter on boot and soft reset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Banner {
    pub firmware: Firmware,
    pub version: String,
    pub build_date: String,
    pub board: String,
    pub chip: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsbIdentity {
    pub vid: u16,
    pub pid: u16,
    pub serial_number: Option<String>,
    pub manufacturer: Option<String>,
    pub product: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PortKind {
    Usb(UsbIdentity),
    Pci,
    Bluetooth,
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortInfo {
    pub name: String,
    pub kind: PortKind,
}

impl PortInfo {
    pub fn usb(&self) -> Option<&UsbIdentity> {
        match &self.kind {
            PortKind::Usb(identity) => Some(identity),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MpyBoard {
    pub port: String,
    pub baud: u32,
    pub usb: Option<UsbIdentity>,
    pub banner: Banner,
}

impl MpyBoard {
    /// One-line summary used by `devices`.
    pub fn describe(&self) -> String {
        let mut line = format!(
            "{:<16} {} ({}) - {} {} ({})",
            self.port,
            self.banner.board,
            self.banner.chip,
            self.banner.firmware,
            self.banner.version,
            self.banner.build_date
        );
        if let Some(usb) = &self.usb {
            line.push_str(&format!(" [{:04x}:{:04x}]", usb.vid, usb.pid));
        }
        line
    }
}

impl fmt::Display for MpyBoard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}) @ {}", self.banner.board, self.banner.chip, self.port)
    }
}
