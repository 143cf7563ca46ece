//! Runtime settings for the binary.
//!
//! Precedence: command-line flags, then the TOML config file, then
//! platform defaults.
//!
//! Platform-specific config directory paths
//! Linux: $XDG_CONFIG_HOME or $HOME/.config/coursedesk/config.toml
//! macOS: $HOME/.config/coursedesk/config.toml
//! Windows: {FOLDERID_RoamingAppData}\coursedesk\config.toml

use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use coursedesk_core::{default_log_level, StorePolicy};
use serde::Deserialize;

use crate::cli::Cli;

const APP_DIR: &str = "coursedesk";
const CONFIG_FILE: &str = "config.toml";
const DB_FILE: &str = "coursedesk.sqlite3";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ConfigDO {
    db_path: Option<PathBuf>,
    log_dir: Option<PathBuf>,
    log_level: Option<String>,
    policy: StorePolicy,
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub db_path: PathBuf,
    pub log_dir: PathBuf,
    pub log_level: String,
    pub policy: StorePolicy,
}

impl Settings {
    pub fn resolve(cli: &Cli) -> Result<Settings> {
        let file = match &cli.config {
            Some(path) => {
                if !path.is_file() {
                    bail!("Config file '{}' does not exist", path.display());
                }
                Self::read(path)?
            }
            None => {
                let path = config_dir()?.join(APP_DIR).join(CONFIG_FILE);
                if path.is_file() {
                    Self::read(&path)?
                } else {
                    ConfigDO::default()
                }
            }
        };

        let db_path = match cli.db.clone().or(file.db_path) {
            Some(path) => path,
            None => data_dir()?.join(DB_FILE),
        };
        let log_dir = match cli.log_dir.clone().or(file.log_dir) {
            Some(path) => path,
            None => data_dir()?.join("logs"),
        };
        let log_level = cli
            .log_level
            .clone()
            .or(file.log_level)
            .unwrap_or_else(|| default_log_level().to_string());

        Ok(Settings {
            db_path,
            log_dir,
            log_level,
            policy: file.policy,
        })
    }

    fn read(path: &Path) -> Result<ConfigDO> {
        let content = std::fs::read_to_string(path)
            .with_context(|| anyhow!("Failed to read config file at: {}", path.display()))?;
        parse(&content).with_context(|| anyhow!("Failed to parse config file at: {}", path.display()))
    }
}

fn parse(content: &str) -> Result<ConfigDO> {
    let config = toml_edit::de::from_str::<ConfigDO>(content)?;
    Ok(config)
}

fn config_dir() -> Result<PathBuf> {
    if cfg!(target_os = "macos") {
        let home_dir = dirs::home_dir().context("Failed to find home directory on your system")?;
        Ok(home_dir.join(".config"))
    } else {
        dirs::config_dir().context("Failed to find config directory on your system.")
    }
}

fn data_dir() -> Result<PathBuf> {
    let dir = dirs::data_dir().context("Failed to find data directory on your system.")?;
    Ok(dir.join(APP_DIR))
}
