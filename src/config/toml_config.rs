use crate::utils::error::{AmpyError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const PROFILE_FILENAME: &str = "ampy.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AmpyProfile {
    pub serial: Option<SerialConfig>,
    pub discovery: Option<DiscoveryConfig>,
    pub logs: Option<LogsConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SerialConfig {
    pub port: Option<String>,
    pub baud: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DiscoveryConfig {
    pub probe_timeout_ms: Option<u64>,
    pub max_concurrent_probes: Option<usize>,
    pub all_ports: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LogsConfig {
    pub timestamps: Option<bool>,
}

impl AmpyProfile {
    /// Load a TOML profile from disk.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(AmpyError::IoError)?;
        Self::from_toml_str(&content).map_err(|e| match e {
            AmpyError::ConfigParseError { message, .. } => AmpyError::ConfigParseError {
                path: path.as_ref().display().to_string(),
                message,
            },
            other => other,
        })
    }

    /// Parse a TOML profile, substituting `${VAR}` references first.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| AmpyError::ConfigParseError {
            path: PROFILE_FILENAME.to_string(),
            message: e.to_string(),
        })
    }

    /// Unset variables are left as written.
    fn substitute_env_vars(content: &str) -> String {
        use regex::Regex;
        use std::sync::OnceLock;

        static RE: OnceLock<Regex> = OnceLock::new();
        let re = RE.get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("env var regex is valid"));

        re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .into_owned()
    }

    /// An explicit path must exist; otherwise `ampy.toml` in `dir` is used when present.
    pub fn locate(explicit: Option<&Path>, dir: &Path) -> Result<Option<PathBuf>> {
        match explicit {
            Some(path) if path.is_file() => Ok(Some(path.to_path_buf())),
            Some(path) => Err(AmpyError::ConfigError {
                message: format!("config file {} does not exist", path.display()),
            }),
            None => {
                let candidate = dir.join(PROFILE_FILENAME);
                Ok(candidate.is_file().then_some(candidate))
            }
        }
    }

    pub fn load(explicit: Option<&Path>, dir: &Path) -> Result<Option<Self>> {
        match Self::locate(explicit, dir)? {
            Some(path) => {
                tracing::debug!("Loading profile from {}", path.display());
                let profile = Self::from_file(&path)?;
                profile.validate()?;
                Ok(Some(profile))
            }
            None => Ok(None),
        }
    }

    pub fn port(&self) -> Option<&str> {
        self.serial.as_ref().and_then(|s| s.port.as_deref())
    }

    pub fn baud(&self) -> Option<u32> {
        self.serial.as_ref().and_then(|s| s.baud)
    }

    pub fn probe_timeout_ms(&self) -> Option<u64> {
        self.discovery.as_ref().and_then(|d| d.probe_timeout_ms)
    }

    pub fn max_concurrent_probes(&self) -> Option<usize> {
        self.discovery.as_ref().and_then(|d| d.max_concurrent_probes)
    }

    pub fn all_ports(&self) -> Option<bool> {
        self.discovery.as_ref().and_then(|d| d.all_ports)
    }

    pub fn timestamps(&self) -> Option<bool> {
        self.logs.as_ref().and_then(|l| l.timestamps)
    }
}

impl Validate for AmpyProfile {
    fn validate(&self) -> Result<()> {
        if let Some(port) = self.port() {
            validation::validate_port_name("serial.port", port)?;
        }
        if let Some(baud) = self.baud() {
            validation::validate_baud("serial.baud", baud)?;
        }
        if let Some(timeout) = self.probe_timeout_ms() {
            validation::validate_range("discovery.probe_timeout_ms", timeout, 100, 60_000)?;
        }
        if let Some(limit) = self.max_concurrent_probes() {
            validation::validate_positive_number("discovery.max_concurrent_probes", limit, 1)?;
        }
        Ok(())
    }
}
