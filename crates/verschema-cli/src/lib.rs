mod backup;
mod commands;
mod config;
mod logging;
mod mapping_file;
mod restore;

pub use backup::BackupFile;
pub use config::*;
pub use logging::{init_logging, LOG_ENV};
pub use mapping_file::MappingFile;
pub use restore::Restore;

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use verschema_core::mapping::Transforms;

/// Verschema CLI library for building custom command-line tools
pub struct VerschemaCli {
    config: Option<Config>,

    /// Computed rules available to `mapping generate` and `restore`
    transforms: Transforms,
}

impl VerschemaCli {
    /// Create a new VerschemaCli that reads `verschema.toml` when present
    pub fn new() -> Self {
        Self {
            config: None,
            transforms: Transforms::new(),
        }
    }

    /// Create a new VerschemaCli instance with a custom configuration
    pub fn with_config(config: Config) -> Self {
        Self {
            config: Some(config),
            transforms: Transforms::new(),
        }
    }

    /// Register the computed rules backing `Named` transforms
    pub fn with_transforms(mut self, transforms: Transforms) -> Self {
        self.transforms = transforms;
        self
    }

    /// Get a reference to the configuration, if one was supplied
    pub fn config(&self) -> Option<&Config> {
        self.config.as_ref()
    }

    /// Parse and execute CLI commands from command-line arguments
    pub fn parse_and_run(&self) -> Result<()> {
        let cli = Cli::parse();
        self.run(cli)
    }

    /// Parse and execute CLI commands from an iterator of arguments
    pub fn parse_from<I, T>(&self, args: I) -> Result<()>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let cli = Cli::try_parse_from(args)?;
        self.run(cli)
    }

    fn run(&self, cli: Cli) -> Result<()> {
        init_logging(cli.verbose);

        // An explicit --config beats the configuration the CLI was built with
        let config = match (&cli.config, &self.config) {
            (Some(path), _) => Config::load(path)?,
            (None, Some(config)) => config.clone(),
            (None, None) => Config::load_or_default(DEFAULT_CONFIG_PATH)?,
        };

        match cli.command {
            Command::Schema(cmd) => cmd.run(&config),
            Command::Mapping(cmd) => cmd.run(&config, &self.transforms),
            Command::Backup(cmd) => cmd.run(&config),
            Command::Restore(cmd) => cmd.run(&config, &self.transforms),
        }
    }
}

impl Default for VerschemaCli {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Parser, Debug)]
#[command(name = "verschema")]
#[command(about = "Verschema CLI - Schema versioning, mapping and backup restore tool")]
#[command(version)]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Parser, Debug)]
enum Command {
    /// Inspect registered schema versions
    Schema(commands::SchemaCommand),

    /// Generate mappings between schema versions
    Mapping(commands::MappingCommand),

    /// Back up table rows under a schema version
    Backup(commands::BackupCommand),

    /// Restore a backup into a schema version
    Restore(commands::RestoreCommand),
}
