//! Per-invocation settings and the cf CLI's own config file.

use crate::cli::Cli;
use crate::hints;
use metric_registrar_core::{RegistrarError, Space};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Settings resolved once from flags and environment, then passed down.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// The `cf` executable every platform call is made through.
    pub cf_binary: PathBuf,
    /// Overrides `CF_HOME` for the `cf` child process and the config lookup.
    pub cf_home: Option<PathBuf>,
}

impl Settings {
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            cf_binary: cli.cf_binary.clone(),
            cf_home: cli.cf_home.clone(),
        }
    }

    /// `<CF_HOME or home>/.cf/config.json`.
    pub fn cf_config_path(&self) -> Option<PathBuf> {
        let home = self.cf_home.clone().or_else(get_home_dir)?;
        Some(home.join(".cf").join("config.json"))
    }
}

fn get_home_dir() -> Option<PathBuf> {
    directories::UserDirs::new().map(|dirs| dirs.home_dir().to_path_buf())
}

/// The fields of `~/.cf/config.json` the registrar reads.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct CfConfig {
    #[serde(default)]
    pub target: String,
    #[serde(default)]
    pub space_fields: SpaceFields,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct SpaceFields {
    #[serde(rename = "GUID", default)]
    pub guid: String,
    #[serde(rename = "Name", default)]
    pub name: String,
}

impl CfConfig {
    pub fn load(path: &Path) -> Result<Self, RegistrarError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            RegistrarError::platform(
                "read cf config",
                format!("{}: {e}. {}", path.display(), hints::LOGIN),
            )
        })?;
        serde_json::from_str(&content)
            .map_err(|e| RegistrarError::parse(format!("cf config {}", path.display()), e))
    }

    /// The targeted space; an empty GUID means nothing is targeted.
    pub fn space(&self) -> Result<Space, RegistrarError> {
        if self.space_fields.guid.is_empty() {
            return Err(RegistrarError::platform("current space", hints::TARGET));
        }
        Ok(Space {
            guid: self.space_fields.guid.clone(),
            name: self.space_fields.name.clone(),
        })
    }
}
