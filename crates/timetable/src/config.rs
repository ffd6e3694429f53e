/// Service configuration: bind address, storage paths and the timetable axes
use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use tracing::Level;

use crate::grid::Axes;

pub const CONFIG_ENV: &str = "TIMETABLE_CONFIG";
pub const ADDRESS_ENV: &str = "TIMETABLE_ADDRESS";
pub const PORT_ENV: &str = "TIMETABLE_PORT";
pub const DB_ENV: &str = "TIMETABLE_DB";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub address: String,
    pub port: u16,
    pub database_path: PathBuf,
    /// Where saved exports are written
    pub export_dir: PathBuf,
    pub log_level: String,
    /// Insert the sample week into an empty database on startup
    pub seed_sample_data: bool,
    /// Heading printed on the generator view and PDF exports
    pub title: String,
    pub axes: Axes,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            address: "127.0.0.1".to_string(),
            port: 5000,
            database_path: PathBuf::from("data/timetable.sqlite3"),
            export_dir: PathBuf::from("exports"),
            log_level: "info".to_string(),
            seed_sample_data: false,
            title: "TIME TABLE-DEPARTMENT OF COMPUTER APPLICATION".to_string(),
            axes: Axes::default(),
        }
    }
}

impl AppConfig {
    /// Loads a configuration file. Missing keys take their defaults.
    ///
    /// # Arguments
    /// * `path` - Path to a JSON configuration file
    pub fn load_from_file(path: &Path) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("could not read config file {}", path.display()))?;
        let config: AppConfig = serde_json::from_str(&content)
            .with_context(|| format!("could not parse config file {}", path.display()))?;
        Ok(config)
    }

    /// Builds the configuration used by the binary.
    ///
    /// The file comes from `config_arg` or, failing that, `TIMETABLE_CONFIG`;
    /// with neither set the defaults are used. Environment overrides are
    /// applied last and the result is validated.
    pub fn load(config_arg: Option<String>) -> anyhow::Result<Self> {
        let path = config_arg.or_else(|| std::env::var(CONFIG_ENV).ok());
        let mut config = match path {
            Some(p) => Self::load_from_file(Path::new(&p))?,
            None => Self::default(),
        };
        config.apply_env_overrides_from(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Applies `TIMETABLE_ADDRESS`, `TIMETABLE_PORT` and `TIMETABLE_DB`
    /// as returned by `lookup`.
    pub fn apply_env_overrides_from<F>(&mut self, lookup: F) -> anyhow::Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(address) = lookup(ADDRESS_ENV) {
            self.address = address;
        }
        if let Some(port) = lookup(PORT_ENV) {
            self.port = port
                .trim()
                .parse()
                .with_context(|| format!("{PORT_ENV} is not a valid port: {port:?}"))?;
        }
        if let Some(db) = lookup(DB_ENV) {
            self.database_path = PathBuf::from(db);
        }
        Ok(())
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        self.axes.validate().context("invalid timetable axes")?;
        self.bind_address()?;
        self.tracing_level()?;
        if self.title.trim().is_empty() {
            bail!("title must not be empty");
        }
        Ok(())
    }

    pub fn bind_address(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.address, self.port)
            .parse()
            .with_context(|| format!("invalid bind address {}:{}", self.address, self.port))
    }

    pub fn tracing_level(&self) -> anyhow::Result<Level> {
        self.log_level
            .parse()
            .map_err(|_| anyhow::anyhow!("unknown log level {:?}", self.log_level))
    }
}
