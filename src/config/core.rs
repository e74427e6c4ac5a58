use super::rendering::RenderConfig;
use super::window::WindowConfig;
use anyhow::{anyhow, Context, Result};
use directories::ProjectDirs;
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Config file looked up in the working directory before the platform
/// config directory.
pub const LOCAL_CONFIG_FILE: &str = "rgb_triangle.toml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShaderPaths {
    pub vertex: PathBuf,
    pub geometry: Option<PathBuf>,
    pub fragment: PathBuf,
}

impl Default for ShaderPaths {
    fn default() -> Self {
        Self {
            vertex: PathBuf::from("resources/Simple.vert"),
            geometry: None,
            fragment: PathBuf::from("resources/Simple.frag"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub log_level: String,
    pub window: WindowConfig,
    pub rendering: RenderConfig,
    pub shaders: ShaderPaths,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            window: WindowConfig::default(),
            rendering: RenderConfig::default(),
            shaders: ShaderPaths::default(),
        }
    }
}

impl AppConfig {
    /// Loads the first config file found, or the defaults if there is none.
    /// Returns the path that was used, if any.
    pub fn load() -> Result<(Self, Option<PathBuf>)> {
        for path in candidate_paths() {
            if path.is_file() {
                let config = Self::load_from(&path)?;
                return Ok((config, Some(path)));
            }
        }
        Ok((Self::default(), None))
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {:?}", path))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("Failed to parse config file {:?}", path))
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn log_level(&self) -> Result<LevelFilter> {
        self.log_level
            .parse()
            .map_err(|_| anyhow!("Invalid log level '{}'", self.log_level))
    }
}

fn candidate_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from(LOCAL_CONFIG_FILE)];
    if let Some(proj_dirs) = ProjectDirs::from("com", "MetroManDevTeam", "RgbTriangle") {
        paths.push(proj_dirs.config_dir().join("config.toml"));
    }
    paths
}
