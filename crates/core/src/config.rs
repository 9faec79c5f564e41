use std::{
    fs::{self, File},
    io::Write,
    path::PathBuf,
    time::Duration,
};

use serde::Deserialize;
use thiserror::Error;
use tracing::instrument;
use url::Url;

use crate::{
    assets::{get_config_dir, get_default_config},
    fixture::FixtureUser,
};

#[derive(Error, Debug)]
pub enum SmokeConfigError {
    #[error("File system error: {0}")]
    IO(#[from] std::io::Error),
    #[error("YAML parsing error: {0}")]
    YAMLError(#[from] serde_yaml::Error),
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Target service settings for a smoke run.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub base_url: Url,
    pub timeout: Duration,
}

/// Validated harness configuration: the service under test plus the fixture
/// accounts the suite drives. The first fixture sends, the second receives.
#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub fixtures: Vec<FixtureUser>,
}

impl Config {
    pub fn sender(&self) -> &FixtureUser {
        &self.fixtures[0]
    }

    pub fn receiver(&self) -> &FixtureUser {
        &self.fixtures[1]
    }
}

fn default_timeout_secs() -> u64 {
    30
}

#[derive(Deserialize, Debug)]
struct RawServerConfig {
    base_url: String,
    #[serde(default = "default_timeout_secs")]
    timeout_secs: u64,
}

#[derive(Deserialize, Debug)]
struct RawConfig {
    server: RawServerConfig,
    fixtures: Vec<FixtureUser>,
}

impl RawConfig {
    #[instrument]
    fn to_config(&self) -> Result<Config, SmokeConfigError> {
        let base_url = Url::parse(&self.server.base_url).map_err(|e| {
            SmokeConfigError::Config(format!(
                "Invalid base_url '{}': {e}",
                self.server.base_url
            ))
        })?;

        // The suite needs a distinct sender and receiver
        if self.fixtures.len() < 2 {
            return Err(SmokeConfigError::Config(format!(
                "At least 2 fixture users required, found {}",
                self.fixtures.len()
            )));
        }
        for (i, user) in self.fixtures.iter().enumerate() {
            if user.username.is_empty() || user.email.is_empty() || user.password.is_empty() {
                return Err(SmokeConfigError::Config(format!(
                    "Fixture user at index {i} has an empty field"
                )));
            }
            if self.fixtures[..i].iter().any(|u| u.email == user.email) {
                return Err(SmokeConfigError::Config(format!(
                    "Duplicate fixture email '{}'",
                    user.email
                )));
            }
        }

        Ok(Config {
            server: ServerConfig {
                base_url,
                timeout: Duration::from_secs(self.server.timeout_secs),
            },
            fixtures: self.fixtures.clone(),
        })
    }
}

#[instrument(skip(config_path))]
pub fn create_or_get_config_file(
    config_path: Option<PathBuf>,
) -> Result<(bool, PathBuf), SmokeConfigError> {
    let actual_path = config_path.unwrap_or_else(|| {
        let config_dir = get_config_dir();
        config_dir.join("hubsmoke.yml")
    });

    let parent_dir = actual_path.parent().ok_or_else(|| {
        SmokeConfigError::IO(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "Config path has no parent directory",
        ))
    })?;

    if !parent_dir.exists() {
        fs::create_dir_all(parent_dir)?;
    }

    if actual_path.exists() {
        Ok((true, actual_path))
    } else {
        File::create(&actual_path)?.write_all(get_default_config().as_bytes())?;
        Ok((false, actual_path))
    }
}

#[instrument(skip(config_path))]
pub fn get_config(config_path: Option<PathBuf>) -> Result<Config, SmokeConfigError> {
    let (_, config_file) = create_or_get_config_file(config_path)?;
    let content = fs::read_to_string(&config_file)?;
    let raw: RawConfig = serde_yaml::from_str(&content)?;
    raw.to_config()
}
