// Adapters layer: concrete implementations for the serial port and the terminal.

pub mod serial;

#[cfg(feature = "cli")]
pub mod prompt;
#[cfg(feature = "cli")]
pub mod spinner;

pub use serial::{SerialportLink, SerialportOpener};
