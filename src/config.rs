use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::error::{ConvertError, Result};
use crate::label::LabelStyle;

pub const DEFAULT_TITLE: &str = "WebClass Import";
pub const DEFAULT_ENCODING: &str = "shift_jis";
pub const DEFAULT_PANDOC: &str = "pandoc";

/// Optional settings file; every field may be omitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub title: Option<String>,
    pub label_style: Option<String>,
    pub encoding: Option<String>,
    pub pandoc: Option<PathBuf>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        serde_yaml::from_str(&content).map_err(|source| ConvertError::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    /// An explicit path must exist; the per-user default is used only when present.
    pub fn discover(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        match default_config_path() {
            Some(path) if path.is_file() => {
                log::debug!("Loading config from {}", path.display());
                Self::load(&path)
            }
            _ => Ok(Self::default()),
        }
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "webclass2qti").map(|dirs| dirs.config_dir().join("config.yaml"))
}

/// Resolved settings for one conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertOptions {
    pub title: String,
    pub label_style: LabelStyle,
    pub encoding: String,
    pub pandoc: PathBuf,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            label_style: LabelStyle::Numeric,
            encoding: DEFAULT_ENCODING.to_string(),
            pandoc: PathBuf::from(DEFAULT_PANDOC),
        }
    }
}

impl ConvertOptions {
    /// Layer `overrides` (command line) over `file` over the defaults.
    pub fn resolve(file: FileConfig, overrides: FileConfig) -> Self {
        let defaults = Self::default();
        Self {
            title: overrides.title.or(file.title).unwrap_or(defaults.title),
            label_style: overrides
                .label_style
                .or(file.label_style)
                .map(|k| LabelStyle::from_key(&k))
                .unwrap_or(defaults.label_style),
            encoding: overrides.encoding.or(file.encoding).unwrap_or(defaults.encoding),
            pandoc: overrides.pandoc.or(file.pandoc).unwrap_or(defaults.pandoc),
        }
    }
}
