use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use verschema_core::Row;

const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// A table's rows captured under one schema version.
///
/// Backups hold data only. The schema itself lives in the registry and is
/// looked up by `schema_version` at restore time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackupFile {
    /// Schema version the rows conform to
    pub schema_version: String,

    /// Table the rows were read from
    pub table_name: String,

    /// Capture time, `YYYYmmdd_HHMMSS`
    pub timestamp: String,

    /// Number of rows in `data`
    pub row_count: usize,

    /// The rows, in capture order
    pub data: Vec<Row>,
}

impl BackupFile {
    /// Create a backup of `rows` stamped with the current local time
    pub fn new(
        schema_version: impl Into<String>,
        table_name: impl Into<String>,
        rows: Vec<Row>,
    ) -> Self {
        Self {
            schema_version: schema_version.into(),
            table_name: table_name.into(),
            timestamp: chrono::Local::now().format(TIMESTAMP_FORMAT).to_string(),
            row_count: rows.len(),
            data: rows,
        }
    }

    /// Replace the capture timestamp
    pub fn with_timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.timestamp = timestamp.into();
        self
    }

    /// File name the backup is saved under, `<table>_<timestamp>.json`
    pub fn file_name(&self) -> String {
        format!("{}_{}.json", self.table_name, self.timestamp)
    }

    /// Load a backup from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read backup {}", path.display()))?;
        contents
            .parse()
            .with_context(|| format!("failed to parse backup {}", path.display()))
    }

    /// Save the backup to a JSON file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        fs::write(path.as_ref(), self.to_string())?;
        Ok(())
    }

    /// Save the backup into `dir`, creating it if needed, and return the
    /// written path
    pub fn save_in(&self, dir: impl AsRef<Path>) -> Result<PathBuf> {
        fs::create_dir_all(dir.as_ref())?;
        let path = dir.as_ref().join(self.file_name());
        self.save(&path)?;
        Ok(path)
    }
}

impl FromStr for BackupFile {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let file: BackupFile = serde_json::from_str(s)?;

        if file.row_count != file.data.len() {
            tracing::warn!(
                table = %file.table_name,
                declared = file.row_count,
                actual = file.data.len(),
                "backup row count does not match its data"
            );
        }

        Ok(file)
    }
}

impl fmt::Display for BackupFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let json = serde_json::to_string_pretty(self).map_err(|_| fmt::Error)?;
        write!(f, "{}", json)
    }
}
