pub mod banner;
pub mod discovery;
pub mod logs;
pub mod probe;
pub mod select;

pub use crate::domain::model::{Banner, Firmware, MpyBoard, PortInfo, PortKind, UsbIdentity};
pub use crate::domain::ports::{BoardDiscovery, Chooser, SerialLink, SerialOpener};
pub use crate::utils::error::Result;
