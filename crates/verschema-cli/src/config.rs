use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Default location of the configuration file
pub const DEFAULT_CONFIG_PATH: &str = "verschema.toml";

/// Configuration for verschema CLI operations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory holding one JSON document per schema version
    pub schema_dir: PathBuf,

    /// Directory backups are written to
    pub backup_dir: PathBuf,

    /// Directory generated mapping files are written to
    pub mapping_dir: PathBuf,

    /// Mapping generation settings
    pub mapping: MappingConfig,
}

/// Configuration for mapping generation
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MappingConfig {
    /// Fail on incompatible type changes instead of copying values unchanged
    pub strict: bool,

    /// Target fields expected to be filled by registered computed rules.
    /// A name with no registered rule is reported and left unmapped.
    pub computed: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            schema_dir: PathBuf::from("schemas"),
            backup_dir: PathBuf::from("backups"),
            mapping_dir: PathBuf::from("mappings"),
            mapping: MappingConfig::default(),
        }
    }
}

impl Config {
    /// Create a new Config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        contents.parse()
    }

    /// Loads the configuration, or returns the defaults if the file does not exist
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        if std::fs::exists(&path)? {
            return Self::load(path);
        }
        Ok(Self::default())
    }

    /// Set the schema directory
    pub fn schema_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.schema_dir = path.into();
        self
    }

    /// Set the backup directory
    pub fn backup_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.backup_dir = path.into();
        self
    }

    /// Set the mapping directory
    pub fn mapping_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.mapping_dir = path.into();
        self
    }

    /// Set the mapping generation configuration
    pub fn mapping(mut self, mapping: MappingConfig) -> Self {
        self.mapping = mapping;
        self
    }

    /// Where the mapping file between two versions lives
    pub fn mapping_file_path(&self, source_version: &str, target_version: &str) -> PathBuf {
        self.mapping_dir
            .join(format!("{source_version}_to_{target_version}.json"))
    }
}

impl FromStr for Config {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let toml_str = toml::to_string_pretty(self).map_err(|_| fmt::Error)?;
        write!(f, "{}", toml_str)
    }
}
