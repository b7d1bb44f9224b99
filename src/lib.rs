pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::cli::{CliConfig, Command};

pub use crate::adapters::{SerialportLink, SerialportOpener};
pub use crate::config::{AmpyProfile, DotEnv, Overrides, Settings};
pub use crate::core::discovery::{BoardFinder, DiscoveryOptions};
pub use crate::core::logs::{LogOptions, LogStreamer};
pub use crate::domain::model::{Banner, Firmware, MpyBoard};
pub use crate::utils::error::{AmpyError, Result};
