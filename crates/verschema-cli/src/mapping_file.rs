use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use verschema_core::mapping::{GeneratedMapping, Mapper, TableMapping, Transforms};

const MAPPING_FILE_VERSION: u32 = 1;

/// Table mappings between two schema versions, persisted as JSON.
///
/// JSON is used over TOML because default values may be null.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MappingFile {
    /// Mapping file format version
    version: u32,

    /// Version the mapped rows come from
    pub source_version: String,

    /// Version the mapped rows conform to
    pub target_version: String,

    /// One mapping per table
    pub tables: Vec<TableMapping>,
}

impl MappingFile {
    /// Create an empty mapping file between two versions
    pub fn new(source_version: impl Into<String>, target_version: impl Into<String>) -> Self {
        Self {
            version: MAPPING_FILE_VERSION,
            source_version: source_version.into(),
            target_version: target_version.into(),
            tables: vec![],
        }
    }

    /// Add generated mappings, dropping their stats
    pub fn with_generated(mut self, generated: impl IntoIterator<Item = GeneratedMapping>) -> Self {
        self.tables
            .extend(generated.into_iter().map(|generated| generated.mapping));
        self
    }

    pub fn add_table(&mut self, mapping: TableMapping) {
        self.tables.push(mapping);
    }

    /// Load a mapping file from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        contents.parse()
    }

    /// Save the mapping file to a JSON file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path.as_ref(), self.to_string())?;
        Ok(())
    }

    /// Builds a mapper holding every table mapping in the file
    pub fn into_mapper(self, transforms: Transforms) -> Mapper {
        let mut mapper =
            Mapper::new(self.source_version, self.target_version).with_transforms(transforms);
        for mapping in self.tables {
            if let Some(replaced) = mapper.add_table_mapping(mapping) {
                tracing::warn!(
                    table = %replaced.source_table,
                    "duplicate table mapping; keeping the later one"
                );
            }
        }
        mapper
    }
}

impl FromStr for MappingFile {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let file: MappingFile = serde_json::from_str(s)?;

        if file.version != MAPPING_FILE_VERSION {
            bail!(
                "Unsupported mapping file version: {}. Expected version {}",
                file.version,
                MAPPING_FILE_VERSION
            );
        }

        Ok(file)
    }
}

impl fmt::Display for MappingFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let json = serde_json::to_string_pretty(self).map_err(|_| fmt::Error)?;
        write!(f, "{}", json)
    }
}
