use crate::domain::model::{PortInfo, PortKind, UsbIdentity};
use crate::domain::ports::{SerialLink, SerialOpener};
use crate::utils::error::Result;
use serialport::{ClearBuffer, SerialPort, SerialPortType};
use std::io::{self, Read, Write};
use std::time::Duration;

/// A port opened through the `serialport` crate.
pub struct SerialportLink {
    name: String,
    inner: Box<dyn SerialPort>,
}

impl SerialLink for SerialportLink {
    fn port_name(&self) -> &str {
        &self.name
    }

    fn write_all(&mut self, data: &[u8]) -> Result<()> {
        self.inner.write_all(data)?;
        self.inner.flush()?;
        Ok(())
    }

    fn read_chunk(&mut self, buf: &mut [u8]) -> Result<usize> {
        match self.inner.read(buf) {
            Ok(n) => Ok(n),
            Err(e) if matches!(e.kind(), io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock) => Ok(0),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => Ok(0),
            Err(e) => Err(e.into()),
        }
    }

    fn clear_input(&mut self) -> Result<()> {
        self.inner.clear(ClearBuffer::Input)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SerialportOpener;

impl SerialOpener for SerialportOpener {
    type Link = SerialportLink;

    fn open(&self, port: &str, baud: u32, read_timeout: Duration) -> Result<SerialportLink> {
        let inner = serialport::new(port, baud).timeout(read_timeout).open()?;
        Ok(SerialportLink {
            name: port.to_string(),
            inner,
        })
    }

    fn list_ports(&self) -> Result<Vec<PortInfo>> {
        let ports = serialport::available_ports()?;
        Ok(ports
            .into_iter()
            .map(|info| PortInfo {
                kind: port_kind(&info.port_type),
                name: info.port_name,
            })
            .collect())
    }
}

fn port_kind(port_type: &SerialPortType) -> PortKind {
    match port_type {
        SerialPortType::UsbPort(usb) => PortKind::Usb(UsbIdentity {
            vid: usb.vid,
            pid: usb.pid,
            serial_number: usb.serial_number.clone(),
            manufacturer: usb.manufacturer.clone(),
            product: usb.product.clone(),
        }),
        SerialPortType::PciPort => PortKind::Pci,
        SerialPortType::BluetoothPort => PortKind::Bluetooth,
        SerialPortType::Unknown => PortKind::Unknown,
    }
}
