use thiserror::Error;

pub const ESP32_BOOT_NOTE: &str = "If you're using an ESP32, you may need to hold down the 'BOOT' button \
on your device while running this command. Read more @ \
https://randomnerdtutorials.com/solved-failed-to-connect-to-esp32-timed-out-waiting-for-packet-header/";

#[derive(Error, Debug)]
pub enum AmpyError {
    #[error("Serial port error: {0}")]
    SerialError(#[from] serialport::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for '{field}' ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Failed to parse {path}: {message}")]
    ConfigParseError { path: String, message: String },

    #[error("No boards detected")]
    NoBoardsDetected,

    #[error("Device on {port} does not look like a micropython board")]
    NotABoard { port: String },

    #[error("Device on {port} did not answer within the probe timeout")]
    ProbeTimeout { port: String },

    #[error("Lost connection to {port}")]
    Disconnected { port: String },

    #[error("Prompt failed: {message}")]
    PromptError { message: String },

    #[error("Background task failed: {message}")]
    TaskError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Device,
    Io,
    Interaction,
    Internal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl AmpyError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ConfigError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::ConfigParseError { .. } => ErrorCategory::Configuration,
            Self::SerialError(_)
            | Self::NoBoardsDetected
            | Self::NotABoard { .. }
            | Self::ProbeTimeout { .. }
            | Self::Disconnected { .. } => ErrorCategory::Device,
            Self::IoError(_) | Self::SerializationError(_) => ErrorCategory::Io,
            Self::PromptError { .. } => ErrorCategory::Interaction,
            Self::TaskError { .. } => ErrorCategory::Internal,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // a user backing out of a prompt is not a failure
            Self::PromptError { .. } => ErrorSeverity::Low,
            Self::NoBoardsDetected | Self::ProbeTimeout { .. } | Self::Disconnected { .. } => {
                ErrorSeverity::Medium
            }
            Self::TaskError { .. } => ErrorSeverity::Critical,
            _ => ErrorSeverity::High,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            Self::SerialError(e) => match e.kind() {
                serialport::ErrorKind::NoDevice => {
                    "Check that the board is plugged in and the port name is correct".to_string()
                }
                _ => "Make sure no other program (screen, minicom, an IDE) holds the port open"
                    .to_string(),
            },
            Self::IoError(_) => "Check file permissions and that the device is still attached".to_string(),
            Self::SerializationError(_) => "Report this as a bug".to_string(),
            Self::ConfigError { .. } | Self::InvalidConfigValueError { .. } => {
                "Check --port/--baud, AMPY_PORT/AMPY_BAUD, your .ampy file and ampy.toml".to_string()
            }
            Self::ConfigParseError { path, .. } => format!("Fix the syntax errors in {}", path),
            Self::NoBoardsDetected => ESP32_BOOT_NOTE.to_string(),
            Self::NotABoard { .. } => {
                "Make sure the device runs micropython firmware and the baud rate matches".to_string()
            }
            Self::ProbeTimeout { .. } => format!(
                "Try resetting the device or raising discovery.probe_timeout_ms. {}",
                ESP32_BOOT_NOTE
            ),
            Self::Disconnected { .. } => "Reconnect the board and run the command again".to_string(),
            Self::PromptError { .. } => {
                "Pass --port to pick a board without an interactive prompt".to_string()
            }
            Self::TaskError { .. } => "Run again with --verbose and report the output".to_string(),
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::NoBoardsDetected => "No boards detected!".to_string(),
            Self::SerialError(e) => format!("Could not use the serial port: {}", e),
            Self::PromptError { .. } => "Board selection cancelled".to_string(),
            other => other.to_string(),
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

pub type Result<T> = std::result::Result<T, AmpyError>;
