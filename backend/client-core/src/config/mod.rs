//! Layered CLI configuration.
//!
//! Precedence, highest first: command-line flags, `FIZZY_*` environment
//! variables, the nearest `.fizzy.yaml` walking up from the working
//! directory, the global config file, built-in defaults.

use crate::DEFAULT_API_URL;
use crate::error::config::ConfigError;

use common::ErrorLocation;

use std::fmt;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

pub const LOCAL_CONFIG_FILE: &str = ".fizzy.yaml";
pub const GLOBAL_CONFIG_FILE: &str = "config.yaml";

pub const ENV_TOKEN: &str = "FIZZY_TOKEN";
pub const ENV_ACCOUNT: &str = "FIZZY_ACCOUNT";
pub const ENV_API_URL: &str = "FIZZY_API_URL";
pub const ENV_BOARD: &str = "FIZZY_BOARD";
pub const ENV_CONFIG_DIR: &str = "FIZZY_CONFIG_DIR";

#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FizzyConfig {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub token: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub account: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub api_url: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub board: String,
}

impl fmt::Debug for FizzyConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FizzyConfig")
            .field("token", &if self.token.is_empty() { "" } else { "[REDACTED]" })
            .field("account", &self.account)
            .field("api_url", &self.api_url)
            .field("board", &self.board)
            .finish()
    }
}

/// Values given on the command line. Empty means "not given".
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub token: Option<String>,
    pub account: Option<String>,
    pub api_url: Option<String>,
}

/// Where config files are looked up.
///
/// Production uses [`ConfigPaths::from_environment`]; tests point both
/// fields at temporary directories.
#[derive(Debug, Clone, Default)]
pub struct ConfigPaths {
    /// Replaces the `~/.config/fizzy` and `~/.fizzy` candidates.
    pub global_dir_override: Option<PathBuf>,
    /// Start of the upward search for `.fizzy.yaml`.
    pub working_dir: Option<PathBuf>,
}

impl ConfigPaths {
    pub fn from_environment() -> Self {
        Self {
            global_dir_override: std::env::var(ENV_CONFIG_DIR)
                .ok()
                .filter(|dir| !dir.is_empty())
                .map(PathBuf::from),
            working_dir: std::env::current_dir().ok(),
        }
    }

    /// Global config candidates in order of preference.
    pub fn global_candidates(&self) -> Vec<PathBuf> {
        if let Some(dir) = &self.global_dir_override {
            return vec![dir.join(GLOBAL_CONFIG_FILE)];
        }
        match dirs::home_dir() {
            Some(home) => vec![
                home.join(".config").join("fizzy").join(GLOBAL_CONFIG_FILE),
                home.join(".fizzy").join(GLOBAL_CONFIG_FILE),
            ],
            None => Vec::new(),
        }
    }

    /// Nearest `.fizzy.yaml` from the working directory up to the root.
    pub fn find_local(&self) -> Option<PathBuf> {
        let start = self.working_dir.as_deref()?;
        start
            .ancestors()
            .map(|dir| dir.join(LOCAL_CONFIG_FILE))
            .find(|candidate| candidate.is_file())
    }

    /// First existing global file.
    pub fn existing_global(&self) -> Option<PathBuf> {
        self.global_candidates()
            .into_iter()
            .find(|candidate| candidate.is_file())
    }

    pub fn global_exists(&self) -> bool {
        self.existing_global().is_some()
    }
}

impl FizzyConfig {
    fn with_defaults() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            ..Self::default()
        }
    }

    /// Global file and defaults only.
    pub fn load_global(paths: &ConfigPaths) -> Self {
        let mut config = Self::with_defaults();
        if let Some(path) = paths.existing_global() {
            config.merge_file(&path);
        }
        config
    }

    /// Full layered load, without command-line flags.
    ///
    /// `env` looks up an environment variable; production passes
    /// `|key| std::env::var(key).ok()`.
    pub fn load_layered<F>(paths: &ConfigPaths, env: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::load_global(paths);

        if let Some(local_path) = paths.find_local() {
            debug!("Applying local config from {}", local_path.display());
            config.merge_file(&local_path);
        }

        config.merge_non_empty(FizzyConfig {
            token: env(ENV_TOKEN).unwrap_or_default(),
            account: env(ENV_ACCOUNT).unwrap_or_default(),
            api_url: env(ENV_API_URL).unwrap_or_default(),
            board: env(ENV_BOARD).unwrap_or_default(),
        });

        config
    }

    pub fn apply_overrides(&mut self, overrides: &ConfigOverrides) {
        self.merge_non_empty(FizzyConfig {
            token: overrides.token.clone().unwrap_or_default(),
            account: overrides.account.clone().unwrap_or_default(),
            api_url: overrides.api_url.clone().unwrap_or_default(),
            board: String::new(),
        });
    }

    /// Unreadable or malformed files are skipped with a warning.
    fn merge_file(&mut self, path: &Path) {
        match read_config_file(path) {
            Ok(file) => self.merge_non_empty(file),
            Err(e) => warn!("Ignoring config file: {}", e.reason()),
        }
    }

    fn merge_non_empty(&mut self, other: FizzyConfig) {
        if !other.token.is_empty() {
            self.token = other.token;
        }
        if !other.account.is_empty() {
            self.account = other.account;
        }
        if !other.api_url.is_empty() {
            self.api_url = other.api_url;
        }
        if !other.board.is_empty() {
            self.board = other.board;
        }
    }

    /// Write to the global config file.
    ///
    /// Reuses an existing global file if there is one so that only a single
    /// global config ever exists; otherwise writes the preferred location.
    pub fn save_global(&self, paths: &ConfigPaths) -> Result<PathBuf, ConfigError> {
        let config_path = match paths.existing_global() {
            Some(path) => path,
            None => paths.global_candidates().into_iter().next().ok_or_else(|| {
                ConfigError::PathUnavailable {
                    location: ErrorLocation::caller(),
                    reason: "unable to determine config path".to_string(),
                }
            })?,
        };

        if let Some(parent) = config_path.parent() {
            create_private_dir(parent)?;
        }

        let yaml = serde_yaml_ng::to_string(self).map_err(|e| ConfigError::SerializeError {
            location: ErrorLocation::caller(),
            reason: e.to_string(),
        })?;

        write_private_file(&config_path, yaml.as_bytes())?;

        info!("Config saved to {}", config_path.display());
        Ok(config_path)
    }

    /// Remove every global config file. Missing files are not an error.
    pub fn delete_global(paths: &ConfigPaths) -> Result<Vec<PathBuf>, ConfigError> {
        let mut removed = Vec::new();
        for path in paths.global_candidates() {
            match std::fs::remove_file(&path) {
                Ok(()) => {
                    info!("Removed config file {}", path.display());
                    removed.push(path);
                }
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => {
                    return Err(ConfigError::WriteError {
                        location: ErrorLocation::caller(),
                        path,
                        source: e,
                    });
                }
            }
        }
        Ok(removed)
    }
}

pub(crate) fn read_config_file(path: &Path) -> Result<FizzyConfig, ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        location: ErrorLocation::caller(),
        path: path.to_path_buf(),
        source: e,
    })?;

    // An empty file parses as `None`.
    serde_yaml_ng::from_str::<Option<FizzyConfig>>(&contents)
        .map(Option::unwrap_or_default)
        .map_err(|e| ConfigError::ParseError {
            location: ErrorLocation::caller(),
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
}

fn create_private_dir(dir: &Path) -> Result<(), ConfigError> {
    std::fs::create_dir_all(dir).map_err(|e| ConfigError::WriteError {
        location: ErrorLocation::caller(),
        path: dir.to_path_buf(),
        source: e,
    })?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(dir, std::fs::Permissions::from_mode(0o700)).map_err(|e| {
            ConfigError::WriteError {
                location: ErrorLocation::caller(),
                path: dir.to_path_buf(),
                source: e,
            }
        })?;
    }

    Ok(())
}

fn write_private_file(path: &Path, contents: &[u8]) -> Result<(), ConfigError> {
    std::fs::write(path, contents).map_err(|e| ConfigError::WriteError {
        location: ErrorLocation::caller(),
        path: path.to_path_buf(),
        source: e,
    })?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600)).map_err(|e| {
            ConfigError::WriteError {
                location: ErrorLocation::caller(),
                path: path.to_path_buf(),
                source: e,
            }
        })?;
    }

    Ok(())
}
