//! CLI argument validation functions
//!
//! This module provides custom validation functions for CLI arguments
//! that go beyond what clap can validate automatically.

use std::fs;
use std::path::PathBuf;

/// Where events are read from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventSource {
    Stdin,
    File(PathBuf),
}

/// Check that a path names an existing, readable file
fn check_readable_file(path: &PathBuf, what: &str) -> Result<(), String> {
    if !path.exists() {
        return Err(format!("{} does not exist: '{}'", what, path.display()));
    }

    if !path.is_file() {
        return Err(format!("{} is not a file: '{}'", what, path.display()));
    }

    fs::File::open(path)
        .map(|_| ())
        .map_err(|e| format!("Cannot read {} '{}': {}", what.to_lowercase(), path.display(), e))
}

/// Validate that a configuration file path is accessible (exists and is readable)
pub fn validate_config_file_path(path_str: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(path_str);
    check_readable_file(&path, "Configuration file")?;
    Ok(path)
}

/// Parse an event source: `-` for stdin, otherwise a readable file
pub fn parse_event_source(value: &str) -> Result<EventSource, String> {
    let value = value.trim();
    if value == "-" {
        return Ok(EventSource::Stdin);
    }
    if value.is_empty() {
        return Err("Event source cannot be empty; use '-' for stdin".to_string());
    }

    let path = PathBuf::from(value);
    check_readable_file(&path, "Event file")?;
    Ok(EventSource::File(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_validate_config_file_path() {
        let file = NamedTempFile::new().unwrap();
        let path = file.path().to_str().unwrap();
        assert_eq!(validate_config_file_path(path).unwrap(), file.path());

        let err = validate_config_file_path("/nonexistent/cardcast.toml").unwrap_err();
        assert!(err.contains("does not exist"));
    }

    #[test]
    fn test_directory_is_not_a_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = validate_config_file_path(dir.path().to_str().unwrap()).unwrap_err();
        assert!(err.contains("is not a file"));
    }

    #[test]
    fn test_parse_event_source() {
        assert_eq!(parse_event_source("-").unwrap(), EventSource::Stdin);
        assert!(parse_event_source("").is_err());

        let file = NamedTempFile::new().unwrap();
        assert_eq!(
            parse_event_source(file.path().to_str().unwrap()).unwrap(),
            EventSource::File(file.path().to_path_buf())
        );
    }
}
