use crate::utils::error::{AmpyError, Result};
use regex::Regex;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

pub const DOTENV_FILENAME: &str = ".ampy";

/// Key/value pairs from the nearest `.ampy` file.
#[derive(Debug, Clone, Default)]
pub struct DotEnv {
    path: Option<PathBuf>,
    values: HashMap<String, String>,
}

fn line_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^\s*(?:export\s+)?([A-Za-z_][A-Za-z0-9_]*)\s*=\s*(.*?)\s*$")
            .expect("dotenv line regex is valid")
    })
}

impl DotEnv {
    /// Looks for `.ampy` in `start` and then each of its ancestors.
    pub fn discover(start: &Path) -> Result<Self> {
        for dir in start.ancestors() {
            let candidate = dir.join(DOTENV_FILENAME);
            if candidate.is_file() {
                tracing::debug!("Loading settings from {}", candidate.display());
                return Self::from_file(candidate);
            }
        }
        Ok(Self::default())
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let mut env = Self::parse(&content).map_err(|e| match e {
            AmpyError::ConfigParseError { message, .. } => AmpyError::ConfigParseError {
                path: path.display().to_string(),
                message,
            },
            other => other,
        })?;
        env.path = Some(path.to_path_buf());
        Ok(env)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let mut values = HashMap::new();

        for (index, raw) in content.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let caps = line_regex()
                .captures(line)
                .ok_or_else(|| AmpyError::ConfigParseError {
                    path: DOTENV_FILENAME.to_string(),
                    message: format!("line {}: expected KEY=VALUE, got '{}'", index + 1, line),
                })?;

            values.insert(caps[1].to_string(), unquote(&caps[2]));
        }

        Ok(Self { path: None, values })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }
}

fn unquote(value: &str) -> String {
    for quote in ['"', '\''] {
        // anything after the closing quote is a comment
        if let Some(inner) = value.strip_prefix(quote) {
            if let Some(end) = inner.find(quote) {
                return inner[..end].to_string();
            }
        }
    }

    // unquoted values may carry a trailing comment
    match value.find(" #") {
        Some(pos) => value[..pos].trim_end().to_string(),
        None => value.to_string(),
    }
}
