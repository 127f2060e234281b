use crate::{Config, MappingFile};
use anyhow::Result;
use clap::Parser;
use console::style;
use std::path::PathBuf;
use verschema_core::{
    mapping::{GeneratedMapping, Transforms},
    schema::Registry,
};

#[derive(Parser, Debug)]
pub struct MappingCommand {
    #[command(subcommand)]
    subcommand: MappingSubcommand,
}

#[derive(Parser, Debug)]
enum MappingSubcommand {
    /// Generate field mappings between two schema versions
    Generate(GenerateCommand),
}

#[derive(Parser, Debug)]
pub struct GenerateCommand {
    /// Version rows are mapped from
    from: String,

    /// Version rows are mapped to
    to: String,

    /// Only generate the mapping for this table
    #[arg(short, long)]
    table: Option<String>,

    /// Fail on incompatible type changes
    #[arg(long)]
    strict: bool,

    /// Where to write the mapping file
    #[arg(short, long)]
    output: Option<PathBuf>,
}

impl MappingCommand {
    pub(crate) fn run(self, config: &Config, transforms: &Transforms) -> Result<()> {
        match self.subcommand {
            MappingSubcommand::Generate(generate) => generate.run(config, transforms),
        }
    }
}

impl GenerateCommand {
    pub(crate) fn run(self, config: &Config, transforms: &Transforms) -> Result<()> {
        println!();
        println!("  {}", style("Generate Mapping").cyan().bold().underlined());
        println!();

        // Configured names only take effect once a rule is registered under them
        for name in &config.mapping.computed {
            if !transforms.contains(name) {
                println!(
                    "  {} {}",
                    style("!").yellow().bold(),
                    style(format!(
                        "No rule registered for computed field `{name}`; leaving it unmapped"
                    ))
                    .dim()
                );
            }
        }

        let registry = Registry::load(&config.schema_dir)?;
        let generator = registry
            .generator(&self.from, &self.to)?
            .strict(self.strict || config.mapping.strict)
            .with_transforms(transforms);

        let generated = match &self.table {
            Some(table) => vec![generator.generate_automatic_mapping(table)?],
            None => generator.generate_all()?,
        };

        if generated.is_empty() {
            println!(
                "  {}",
                style("The versions have no tables in common.").magenta().dim()
            );
            println!();
            return Ok(());
        }

        for table in &generated {
            print_summary(table);
        }

        let incomplete = generated.iter().filter(|table| !table.is_complete()).count();

        let path = self
            .output
            .unwrap_or_else(|| config.mapping_file_path(&self.from, &self.to));
        MappingFile::new(&self.from, &self.to)
            .with_generated(generated)
            .save(&path)?;

        println!();
        println!(
            "  {} {}",
            style("✓").green().bold(),
            style(format!("Wrote {}", path.display())).dim()
        );
        if incomplete > 0 {
            println!(
                "  {}",
                style(format!(
                    "{incomplete} table(s) need manual mappings before restoring"
                ))
                .yellow()
                .bold()
            );
        }
        println!();

        Ok(())
    }
}

fn print_summary(generated: &GeneratedMapping) {
    let stats = &generated.stats;
    let marker = if generated.is_complete() {
        style("✓").green().bold()
    } else {
        style("!").yellow().bold()
    };

    println!(
        "  {} {} {}",
        marker,
        style(&generated.mapping.target_table).bold(),
        style(format!(
            "{} automatic, {} manual",
            stats.auto_generated, stats.manual
        ))
        .dim()
    );

    for field in &stats.manual_fields {
        println!(
            "      {} {}",
            style("manual").yellow(),
            style(field).dim()
        );
    }
    for field in &stats.incompatible_fields {
        println!(
            "      {} {}",
            style("incompatible").red(),
            style(field).dim()
        );
    }
}
