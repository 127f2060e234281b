use crate::{BackupFile, Config, MappingFile, Restore};
use anyhow::Result;
use clap::Parser;
use console::style;
use std::path::PathBuf;
use verschema_core::mapping::Transforms;

#[derive(Parser, Debug)]
pub struct RestoreCommand {
    /// Backup file to restore
    backup: PathBuf,

    /// Schema version to restore into
    #[arg(long)]
    target: String,

    /// Mapping file to use instead of the one in the mapping directory
    #[arg(short, long)]
    mapping: Option<PathBuf>,

    /// Write restored rows here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
}

impl RestoreCommand {
    pub(crate) fn run(self, config: &Config, transforms: &Transforms) -> Result<()> {
        let backup = BackupFile::load(&self.backup)?;
        let mut restore = Restore::new(&self.target);

        if backup.schema_version != self.target {
            let path = match self.mapping {
                Some(path) => Some(path),
                None => {
                    let path = config.mapping_file_path(&backup.schema_version, &self.target);
                    std::fs::exists(&path)?.then_some(path)
                }
            };

            match path {
                Some(path) => {
                    tracing::debug!(path = %path.display(), "loading mapping file");
                    let mapping = MappingFile::load(&path)?;
                    restore = restore.with_mapper(mapping.into_mapper(transforms.clone()));
                }
                None => eprintln!(
                    "  {} {}",
                    style("!").yellow().bold(),
                    style(format!(
                        "No mapping from {} to {}; rows are restored unchanged",
                        backup.schema_version, self.target
                    ))
                    .dim()
                ),
            }
        }

        let rows = restore.restore(backup)?;
        let json = serde_json::to_string_pretty(&rows)?;

        match self.output {
            Some(path) => {
                std::fs::write(&path, json)?;
                eprintln!(
                    "  {} {}",
                    style("✓").green().bold(),
                    style(format!("Restored {} row(s) to {}", rows.len(), path.display())).dim()
                );
            }
            None => println!("{json}"),
        }

        Ok(())
    }
}
