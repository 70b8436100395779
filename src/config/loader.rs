//! Settings loading.
//!
//! Sources, lowest priority first:
//! 1. `default.toml` (required)
//! 2. `{environment}.toml`
//! 3. `local.toml`
//! 4. `CARDCAST_*` environment variables, `__` between nested keys
//!
//! `CARDCAST_CONFIG_FILE` (or `--config`) replaces steps 1-3 with one file.

use std::path::{Path, PathBuf};

use config::{Config, File, FileFormat};

use crate::config::environment::Environment as AppEnvironment;
use crate::config::error::ConfigError;
use crate::config::settings::Settings;

const CONFIG_DIR_ENV: &str = "CARDCAST_CONFIG_DIR";
const CONFIG_FILE_ENV: &str = "CARDCAST_CONFIG_FILE";
const DEFAULT_CONFIG_DIR: &str = "config";

type Builder = config::ConfigBuilder<config::builder::DefaultState>;

/// Where the TOML part of the settings comes from
#[derive(Debug, Clone, PartialEq, Eq)]
enum FileSource {
    Layered(PathBuf),
    Single(PathBuf),
}

#[derive(Debug)]
pub struct ConfigLoader {
    files: FileSource,
    environment: AppEnvironment,
}

impl ConfigLoader {
    /// Reads `CARDCAST_CONFIG_DIR`, `CARDCAST_CONFIG_FILE` and `CARDCAST_APP_ENV`
    ///
    /// # Errors
    /// `ConflictingSources` when both the directory and the file are set,
    /// `UnknownEnvironment` for an unrecognized environment name.
    pub fn new() -> Result<Self, ConfigError> {
        let dir = std::env::var_os(CONFIG_DIR_ENV).map(PathBuf::from);
        let file = std::env::var_os(CONFIG_FILE_ENV).map(PathBuf::from);

        let files = match (dir, file) {
            (Some(_), Some(_)) => return Err(ConfigError::ConflictingSources),
            (None, Some(file)) => FileSource::Single(file),
            (dir, None) => {
                FileSource::Layered(dir.unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_DIR)))
            }
        };

        Ok(Self {
            files,
            environment: AppEnvironment::from_env()?,
        })
    }

    /// Load a single configuration file instead of the layered directory
    pub fn with_config_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.files = FileSource::Single(path.into());
        self
    }

    /// Override the environment used to pick `{environment}.toml`
    pub fn with_environment(mut self, environment: AppEnvironment) -> Self {
        self.environment = environment;
        self
    }

    pub fn environment(&self) -> AppEnvironment {
        self.environment
    }

    /// Load and validate
    pub fn load(&self) -> Result<Settings, ConfigError> {
        let settings = self.load_unvalidated()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load without validating, for callers that still apply overrides
    pub fn load_unvalidated(&self) -> Result<Settings, ConfigError> {
        let builder = match &self.files {
            FileSource::Single(path) => toml_source(Config::builder(), path, true)?,
            FileSource::Layered(dir) => {
                let builder = toml_source(Config::builder(), &dir.join("default.toml"), true)?;
                let env_file = dir.join(format!("{}.toml", self.environment.file_stem()));
                let builder = toml_source(builder, &env_file, false)?;
                toml_source(builder, &dir.join("local.toml"), false)?
            }
        };

        // CARDCAST_DELIVERY__MAX_RETRIES -> delivery.max_retries
        let env = config::Environment::with_prefix("CARDCAST")
            .prefix_separator("_")
            .separator("__")
            .ignore_empty(true)
            .try_parsing(true);

        Ok(builder.add_source(env).build()?.try_deserialize()?)
    }
}

fn toml_source(builder: Builder, path: &Path, required: bool) -> Result<Builder, ConfigError> {
    if required && !path.is_file() {
        return Err(ConfigError::MissingFile(path.to_path_buf()));
    }
    Ok(builder.add_source(File::from(path).format(FileFormat::Toml).required(required)))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::fs;
    use std::sync::Mutex;
    use tempfile::TempDir;

    // Serializes tests that touch process environment variables
    pub(crate) static TEST_MUTEX: Mutex<()> = Mutex::new(());

    const DEFAULT_CONFIG: &str = r#"
[application]
name = "test-app"
version = "1.0.0"

[bot]
client_id = "6f0a6a4c-8b1e-4e8c-9f3c-1d2e3f4a5b6c"

[transport]
relay_url = "http://127.0.0.1:7070"
auth_token = "secret"
timeout_secs = 30

[site]
url = "https://forum.example.com"
permalink = "question_id_and_title"

[card]
max_title_length = 28
max_body_length = 256
default_language = "zh_CN"

[delivery]
max_retries = 8
base_delay_ms = 1000

[logger]
level = "info"

[logger.console]
enabled = true
colored = true

[logger.file]
enabled = false
"#;

    fn setup_config_dir(files: &[(&str, &str)]) -> TempDir {
        let dir = TempDir::new().unwrap();
        for (name, content) in files {
            fs::write(dir.path().join(name), content).unwrap();
        }
        dir
    }

    /// Restores touched environment variables on drop; hold `TEST_MUTEX` while alive
    #[derive(Default)]
    pub(crate) struct EnvGuard {
        saved: Vec<(String, Option<String>)>,
    }

    impl EnvGuard {
        pub(crate) fn new() -> Self {
            Self::default()
        }

        fn remember(&mut self, key: &str) {
            self.saved.push((key.to_string(), std::env::var(key).ok()));
        }

        pub(crate) fn set(&mut self, key: &str, value: &str) {
            self.remember(key);
            // SAFETY: tests touching the environment serialize on TEST_MUTEX
            unsafe { std::env::set_var(key, value) };
        }

        pub(crate) fn remove(&mut self, key: &str) {
            self.remember(key);
            // SAFETY: as in `set`
            unsafe { std::env::remove_var(key) };
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            // Reverse order, so a key set twice ends at its first saved value
            while let Some((key, saved)) = self.saved.pop() {
                // SAFETY: as in `set`
                unsafe {
                    match saved {
                        Some(value) => std::env::set_var(&key, value),
                        None => std::env::remove_var(&key),
                    }
                }
            }
        }
    }

    fn clear_loader_env(env: &mut EnvGuard) {
        env.remove("CARDCAST_CONFIG_DIR");
        env.remove("CARDCAST_CONFIG_FILE");
        env.remove("CARDCAST_APP_ENV");
    }

    #[test]
    fn test_config_loader_new_default() {
        let _guard = TEST_MUTEX.lock().unwrap();
        let mut env = EnvGuard::new();
        clear_loader_env(&mut env);

        let loader = ConfigLoader::new().expect("Should create loader");
        assert_eq!(loader.files, FileSource::Layered(PathBuf::from("config")));
        assert_eq!(loader.environment(), AppEnvironment::Development);
    }

    #[test]
    fn test_config_loader_mutual_exclusivity_error() {
        let _guard = TEST_MUTEX.lock().unwrap();
        let mut env = EnvGuard::new();

        env.set("CARDCAST_CONFIG_DIR", "/custom/config");
        env.set("CARDCAST_CONFIG_FILE", "/path/to/config.toml");

        assert!(matches!(
            ConfigLoader::new(),
            Err(ConfigError::ConflictingSources)
        ));
    }

    #[test]
    fn test_config_loader_environment_from_env() {
        let _guard = TEST_MUTEX.lock().unwrap();
        let mut env = EnvGuard::new();
        clear_loader_env(&mut env);
        env.set("CARDCAST_APP_ENV", "production");

        let loader = ConfigLoader::new().expect("Should create loader");
        assert_eq!(loader.environment(), AppEnvironment::Production);
    }

    #[test]
    fn test_config_loader_rejects_unknown_environment() {
        let _guard = TEST_MUTEX.lock().unwrap();
        let mut env = EnvGuard::new();
        clear_loader_env(&mut env);
        env.set("CARDCAST_APP_ENV", "qa");

        assert!(matches!(
            ConfigLoader::new(),
            Err(ConfigError::UnknownEnvironment(_))
        ));
    }

    #[test]
    fn test_config_file_env_selects_single_file() {
        let _guard = TEST_MUTEX.lock().unwrap();
        let mut env = EnvGuard::new();
        clear_loader_env(&mut env);
        env.set("CARDCAST_CONFIG_FILE", "/etc/cardcast/cardcast.toml");

        let loader = ConfigLoader::new().expect("Should create loader");
        assert_eq!(
            loader.files,
            FileSource::Single(PathBuf::from("/etc/cardcast/cardcast.toml"))
        );
    }

    #[test]
    fn test_load_missing_default_toml() {
        let _guard = TEST_MUTEX.lock().unwrap();
        let mut env = EnvGuard::new();
        clear_loader_env(&mut env);

        let temp_dir = setup_config_dir(&[]);
        env.set("CARDCAST_CONFIG_DIR", temp_dir.path().to_str().unwrap());

        let result = ConfigLoader::new().unwrap().load();
        match result {
            Err(ConfigError::MissingFile(path)) => assert!(path.ends_with("default.toml")),
            other => panic!("Expected MissingFile error, got {:?}", other),
        }
    }

    #[test]
    fn test_load_default_toml_only() {
        let _guard = TEST_MUTEX.lock().unwrap();
        let mut env = EnvGuard::new();
        clear_loader_env(&mut env);

        let temp_dir = setup_config_dir(&[("default.toml", DEFAULT_CONFIG)]);
        env.set("CARDCAST_CONFIG_DIR", temp_dir.path().to_str().unwrap());

        let settings = ConfigLoader::new().unwrap().load().expect("Should load");

        assert_eq!(settings.application.name, "test-app");
        assert_eq!(settings.site.url, "https://forum.example.com");
        assert_eq!(settings.transport.auth_token, "secret");
        assert_eq!(settings.card.title_prefix, "💬");
        assert_eq!(settings.card.ellipsis, "...");
        assert_eq!(settings.delivery.max_retries, 8);
        assert!(settings.delivery.dispatch_timeout_secs.is_none());
    }

    #[test]
    fn test_load_with_environment_and_local_override() {
        let _guard = TEST_MUTEX.lock().unwrap();
        let mut env = EnvGuard::new();
        clear_loader_env(&mut env);

        let production_config = r#"
[site]
url = "https://prod.example.com"

[delivery]
max_retries = 5
"#;
        let local_config = r#"
[delivery]
max_retries = 3
"#;

        let temp_dir = setup_config_dir(&[
            ("default.toml", DEFAULT_CONFIG),
            ("production.toml", production_config),
            ("local.toml", local_config),
        ]);
        env.set("CARDCAST_CONFIG_DIR", temp_dir.path().to_str().unwrap());
        env.set("CARDCAST_APP_ENV", "production");

        let settings = ConfigLoader::new().unwrap().load().expect("Should load");

        assert_eq!(settings.site.url, "https://prod.example.com");
        assert_eq!(settings.delivery.max_retries, 3);
        assert_eq!(settings.delivery.base_delay_ms, 1000);
    }

    #[test]
    fn test_load_with_env_var_override() {
        let _guard = TEST_MUTEX.lock().unwrap();
        let mut env = EnvGuard::new();
        clear_loader_env(&mut env);

        let temp_dir = setup_config_dir(&[("default.toml", DEFAULT_CONFIG)]);
        env.set("CARDCAST_CONFIG_DIR", temp_dir.path().to_str().unwrap());
        env.set("CARDCAST_DELIVERY__MAX_RETRIES", "2");
        env.set("CARDCAST_CARD__DEFAULT_LANGUAGE", "en_US");

        let settings = ConfigLoader::new().unwrap().load().expect("Should load");

        assert_eq!(settings.delivery.max_retries, 2);
        assert_eq!(settings.card.default_language, "en_US");
        assert_eq!(settings.application.name, "test-app");
    }

    #[test]
    fn test_load_single_file_mode() {
        let _guard = TEST_MUTEX.lock().unwrap();
        let mut env = EnvGuard::new();
        clear_loader_env(&mut env);

        let temp_dir = setup_config_dir(&[("single.toml", DEFAULT_CONFIG)]);
        let path = temp_dir.path().join("single.toml");

        let settings = ConfigLoader::new()
            .unwrap()
            .with_config_file(&path)
            .load()
            .expect("Should load");

        assert_eq!(settings.application.name, "test-app");
    }

    #[test]
    fn test_load_rejects_invalid_settings() {
        let _guard = TEST_MUTEX.lock().unwrap();
        let mut env = EnvGuard::new();
        clear_loader_env(&mut env);

        let temp_dir = setup_config_dir(&[("default.toml", "[delivery]\nmax_retries = 0\n")]);
        env.set("CARDCAST_CONFIG_DIR", temp_dir.path().to_str().unwrap());

        let loader = ConfigLoader::new().unwrap();
        assert!(matches!(
            loader.load(),
            Err(ConfigError::Invalid { .. })
        ));
        assert!(loader.load_unvalidated().is_ok());
    }
}
