use crate::utils::error::{AmpyError, Result};

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub const MIN_BAUD: u32 = 300;
pub const MAX_BAUD: u32 = 4_000_000;

pub fn validate_port_name(field_name: &str, port: &str) -> Result<()> {
    validate_non_empty_string(field_name, port)?;

    if port.contains('\0') {
        return Err(AmpyError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: port.to_string(),
            reason: "Port name contains null bytes".to_string(),
        });
    }

    if port.chars().any(char::is_whitespace) {
        return Err(AmpyError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: port.to_string(),
            reason: "Port name cannot contain whitespace".to_string(),
        });
    }

    Ok(())
}

pub fn validate_baud(field_name: &str, baud: u32) -> Result<()> {
    validate_range(field_name, baud, MIN_BAUD, MAX_BAUD)
}

pub fn validate_positive_number(field_name: &str, value: usize, min_value: usize) -> Result<()> {
    if value < min_value {
        return Err(AmpyError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be at least {}", min_value),
        });
    }
    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(AmpyError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(AmpyError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}
