#[cfg(feature = "cli")]
pub mod cli;
pub mod dotenv;
pub mod toml_config;

pub use dotenv::DotEnv;
pub use toml_config::AmpyProfile;

use crate::core::discovery::DiscoveryOptions;
use crate::utils::error::{AmpyError, Result};
use crate::utils::validation::{self, Validate};
use std::time::Duration;

pub const DEFAULT_BAUD: u32 = 115200;
pub const DEFAULT_PROBE_TIMEOUT_MS: u64 = 2000;
pub const DEFAULT_MAX_CONCURRENT_PROBES: usize = 4;

/// Values given on the command line or through the process environment.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub port: Option<String>,
    pub baud: Option<u32>,
    pub all_ports: Option<bool>,
    pub timestamps: Option<bool>,
}

/// Fully resolved configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub port: Option<String>,
    pub baud: u32,
    pub probe_timeout: Duration,
    pub max_concurrent_probes: usize,
    pub all_ports: bool,
    pub timestamps: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            port: None,
            baud: DEFAULT_BAUD,
            probe_timeout: Duration::from_millis(DEFAULT_PROBE_TIMEOUT_MS),
            max_concurrent_probes: DEFAULT_MAX_CONCURRENT_PROBES,
            all_ports: false,
            timestamps: false,
        }
    }
}

impl Settings {
    /// Precedence: overrides, then `.ampy`, then the TOML profile, then defaults.
    pub fn resolve(overrides: &Overrides, dotenv: &DotEnv, profile: Option<&AmpyProfile>) -> Result<Self> {
        let defaults = Self::default();

        let port = overrides
            .port
            .clone()
            .or_else(|| dotenv.get("AMPY_PORT").map(str::to_string))
            .or_else(|| profile.and_then(|p| p.port()).map(str::to_string))
            .filter(|port| !port.trim().is_empty());

        let dotenv_baud = dotenv
            .get("AMPY_BAUD")
            .filter(|raw| !raw.is_empty())
            .map(|raw| {
                raw.parse::<u32>().map_err(|e| AmpyError::InvalidConfigValueError {
                    field: "AMPY_BAUD".to_string(),
                    value: raw.to_string(),
                    reason: e.to_string(),
                })
            })
            .transpose()?;

        let baud = overrides
            .baud
            .or(dotenv_baud)
            .or_else(|| profile.and_then(AmpyProfile::baud))
            .unwrap_or(defaults.baud);

        let settings = Self {
            port,
            baud,
            probe_timeout: profile
                .and_then(AmpyProfile::probe_timeout_ms)
                .map(Duration::from_millis)
                .unwrap_or(defaults.probe_timeout),
            max_concurrent_probes: profile
                .and_then(AmpyProfile::max_concurrent_probes)
                .unwrap_or(defaults.max_concurrent_probes),
            all_ports: overrides
                .all_ports
                .or_else(|| profile.and_then(AmpyProfile::all_ports))
                .unwrap_or(defaults.all_ports),
            timestamps: overrides
                .timestamps
                .or_else(|| profile.and_then(AmpyProfile::timestamps))
                .unwrap_or(defaults.timestamps),
        };

        settings.validate()?;
        Ok(settings)
    }

    pub fn discovery_options(&self) -> DiscoveryOptions {
        DiscoveryOptions {
            baud: self.baud,
            probe_timeout: self.probe_timeout,
            max_concurrent_probes: self.max_concurrent_probes,
            all_ports: self.all_ports,
        }
    }
}

impl Validate for Settings {
    fn validate(&self) -> Result<()> {
        if let Some(port) = &self.port {
            validation::validate_port_name("port", port)?;
        }
        validation::validate_baud("baud", self.baud)?;
        validation::validate_positive_number("max_concurrent_probes", self.max_concurrent_probes, 1)?;
        Ok(())
    }
}
