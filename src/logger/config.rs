//! Subscriber outputs built from `[logger]` settings

use std::path::PathBuf;
use std::str::FromStr;

/// Filter directive plus the enabled outputs
///
/// A disabled output is `None`; at least one must be present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggerConfig {
    /// `EnvFilter` directive, e.g. `info` or `cardcast=debug,reqwest=warn`
    pub level: String,
    pub console: Option<ConsoleConfig>,
    pub file: Option<FileConfig>,
}

impl LoggerConfig {
    pub fn validate(&self) -> anyhow::Result<()> {
        match (&self.console, &self.file) {
            (None, None) => anyhow::bail!("At least one output (console or file) must be enabled"),
            (_, Some(file)) if file.path.as_os_str().is_empty() => {
                anyhow::bail!("Log file path cannot be empty")
            }
            _ => Ok(()),
        }
    }
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            console: Some(ConsoleConfig { colored: true }),
            file: None,
        }
    }
}

/// Human-readable output on stderr
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConsoleConfig {
    /// ANSI colors, applied only when stderr is a terminal
    pub colored: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileConfig {
    pub path: PathBuf,
    pub append: bool,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    Full,
    Compact,
    #[default]
    Json,
}

impl FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "full" => Ok(LogFormat::Full),
            "compact" => Ok(LogFormat::Compact),
            "json" => Ok(LogFormat::Json),
            _ => anyhow::bail!("Unknown log format '{}'", s),
        }
    }
}
