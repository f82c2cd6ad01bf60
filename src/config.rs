//! Application settings, read from `config.toml` in the per-user config
//! directory. A missing file is created with the defaults, which select the
//! local SQLite backend.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::entities::listing::{DEFAULT_PAGE_SIZE, PAGE_SIZE_OPTIONS};
use crate::domain::plantuml::DEFAULT_SERVER;

pub const API_URL_ENV: &str = "PORTAL_API_URL";
pub const API_TOKEN_ENV: &str = "PORTAL_API_TOKEN";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unable to resolve the user directories")]
    NoProjectDirs,
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to encode config: {0}")]
    Encode(#[from] toml::ser::Error),
    #[error("page_size must be one of 10, 20, 50 or 100, got {0}")]
    PageSize(u32),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum BackendConfig {
    Local {
        /// Defaults to `portal.sqlite` in the data directory.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        db_path: Option<PathBuf>,
    },
    Remote {
        base_url: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        token: Option<String>,
    },
}

impl Default for BackendConfig {
    fn default() -> Self {
        BackendConfig::Local { db_path: None }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub backend: BackendConfig,
    pub page_size: u32,
    pub log_filter: String,
    pub plantuml_server: String,
    /// Seeds a demo dataset into an empty local database.
    pub seed_demo_data: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            backend: BackendConfig::default(),
            page_size: DEFAULT_PAGE_SIZE,
            log_filter: "info".to_string(),
            plantuml_server: DEFAULT_SERVER.to_string(),
            seed_demo_data: true,
        }
    }
}

pub fn project_dirs() -> Result<ProjectDirs, ConfigError> {
    ProjectDirs::from("com", "portal", "portal-admin").ok_or(ConfigError::NoProjectDirs)
}

pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    Ok(project_dirs()?.config_dir().join("config.toml"))
}

pub fn default_db_path() -> Result<PathBuf, ConfigError> {
    Ok(project_dirs()?.data_local_dir().join("portal.sqlite"))
}

impl AppConfig {
    /// Default location, then environment overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::load_or_create(&default_config_path()?)?;
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Like [`AppConfig::load_from`], but a missing file is written out with
    /// the defaults so there is something to edit.
    pub fn load_or_create(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            return Self::load_from(path);
        }
        let config = Self::default();
        config.save_to(path)?;
        tracing::info!(path = %path.display(), "wrote default settings");
        Ok(config)
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: AppConfig = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let write_err = |source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(write_err)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(write_err)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !PAGE_SIZE_OPTIONS.contains(&self.page_size) {
            return Err(ConfigError::PageSize(self.page_size));
        }
        Ok(())
    }

    /// `PORTAL_API_URL` switches to the remote backend; `PORTAL_API_TOKEN`
    /// replaces the token of a remote backend.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let url = lookup(API_URL_ENV).filter(|url| !url.trim().is_empty());
        let token = lookup(API_TOKEN_ENV).filter(|token| !token.trim().is_empty());

        if let Some(base_url) = url {
            let token = match (&self.backend, token.clone()) {
                (_, Some(token)) => Some(token),
                (BackendConfig::Remote { token, .. }, None) => token.clone(),
                (BackendConfig::Local { .. }, None) => None,
            };
            self.backend = BackendConfig::Remote { base_url, token };
        } else if let (BackendConfig::Remote { token: current, .. }, Some(token)) =
            (&mut self.backend, token)
        {
            *current = Some(token);
        }
    }
}
