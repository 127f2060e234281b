use crate::{BackupFile, Config};
use anyhow::{Context, Result};
use clap::Parser;
use console::style;
use std::path::PathBuf;
use verschema_core::Row;

#[derive(Parser, Debug)]
pub struct BackupCommand {
    /// Schema version the rows conform to
    version: String,

    /// Table the rows belong to
    table: String,

    /// JSON file holding an array of row objects
    rows: PathBuf,

    /// Directory to write the backup to
    #[arg(short, long)]
    output_dir: Option<PathBuf>,
}

impl BackupCommand {
    pub(crate) fn run(self, config: &Config) -> Result<()> {
        let contents = std::fs::read_to_string(&self.rows)
            .with_context(|| format!("failed to read rows from {}", self.rows.display()))?;
        let rows: Vec<Row> = serde_json::from_str(&contents)
            .with_context(|| format!("{} is not an array of row objects", self.rows.display()))?;

        let backup = BackupFile::new(self.version, self.table, rows);
        let dir = self.output_dir.as_ref().unwrap_or(&config.backup_dir);
        let path = backup.save_in(dir)?;

        tracing::info!(
            table = %backup.table_name,
            version = %backup.schema_version,
            rows = backup.row_count,
            "backup created"
        );

        println!(
            "  {} {}",
            style("✓").green().bold(),
            style(format!(
                "Backed up {} row(s) of {} to {}",
                backup.row_count,
                backup.table_name,
                path.display()
            ))
            .dim()
        );

        Ok(())
    }
}
