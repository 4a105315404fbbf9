use std::{env, fs::read_to_string, path::PathBuf, time::Duration};

use derive_getters::Getters;
use log::debug;
use serde::Deserialize;

use crate::{config::AuthConfig, error::ConfigError, model::PageSize};

#[derive(Debug, Deserialize, Getters)]
pub struct Config {
    #[serde(default = "base_url")]
    base_url: String,
    #[getter(skip)]
    #[serde(default = "page_size")]
    page_size: PageSize,
    #[serde(default = "page_size_options")]
    page_size_options: Vec<PageSize>,
    #[getter(skip)]
    #[serde(default)]
    username: Option<String>,
    #[getter(skip)]
    #[serde(default = "timeout_secs")]
    timeout_secs: u64,
    auth: AuthConfig,
}

impl Config {
    /// Reads `file`, or `$XDG_CONFIG_HOME/mailview/config.toml` if `None`.
    pub fn load_from_file(file: Option<PathBuf>) -> Result<Self, ConfigError> {
        let path = match file {
            Some(path) => path,
            None => default_location()?,
        };
        debug!("loading config from {}", path.display());

        let contents = read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;
        toml::from_str(&contents).map_err(|source| ConfigError::Parse { path, source })
    }

    pub fn page_size(&self) -> PageSize {
        self.page_size
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn default_location() -> Result<PathBuf, ConfigError> {
    let mut config_dir = if let Some(config_home) = env::var_os("XDG_CONFIG_HOME") {
        PathBuf::from(config_home)
    } else {
        let home = env::var_os("HOME").ok_or(ConfigError::MissingEnv("HOME"))?;
        let mut config_home = PathBuf::from(home);
        config_home.push(".config");
        config_home
    };
    config_dir.push(env!("CARGO_PKG_NAME"));
    config_dir.push("config.toml");

    Ok(config_dir)
}

fn base_url() -> String {
    "http://localhost:8080".to_string()
}

fn page_size() -> PageSize {
    PageSize::DEFAULT
}

fn page_size_options() -> Vec<PageSize> {
    PageSize::OPTIONS.to_vec()
}

fn timeout_secs() -> u64 {
    30
}
