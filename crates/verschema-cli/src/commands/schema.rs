use crate::Config;
use anyhow::Result;
use clap::Parser;
use console::style;
use verschema_core::schema::{Registry, SchemaDiff, TableDiff};

#[derive(Parser, Debug)]
pub struct SchemaCommand {
    #[command(subcommand)]
    subcommand: SchemaSubcommand,
}

#[derive(Parser, Debug)]
enum SchemaSubcommand {
    /// List the registered schema versions
    List,

    /// Print one schema version as JSON
    Show {
        /// Version label
        version: String,
    },

    /// Show the structural differences between two versions
    Diff {
        /// Version to compare from
        from: String,

        /// Version to compare to
        to: String,

        /// Print the diff as JSON
        #[arg(long)]
        json: bool,
    },
}

impl SchemaCommand {
    pub(crate) fn run(self, config: &Config) -> Result<()> {
        let registry = Registry::load(&config.schema_dir)?;

        match self.subcommand {
            SchemaSubcommand::List => list(&registry),
            SchemaSubcommand::Show { version } => {
                println!("{}", registry.require(&version)?.to_json()?);
                Ok(())
            }
            SchemaSubcommand::Diff { from, to, json } => {
                let diff = registry.compare(&from, &to)?;
                if json {
                    println!("{}", serde_json::to_string_pretty(&diff)?);
                } else {
                    print_diff(&from, &to, &diff);
                }
                Ok(())
            }
        }
    }
}

fn list(registry: &Registry) -> Result<()> {
    println!();
    println!("  {}", style("Schema Versions").cyan().bold().underlined());
    println!();

    if registry.is_empty() {
        println!("  {}", style("No schema versions found.").magenta().dim());
        println!();
        return Ok(());
    }

    for label in registry.list() {
        let version = registry.require(label)?;
        println!(
            "  {} {} {}",
            style("•").cyan(),
            style(label).bold(),
            style(&version.description).dim()
        );
    }
    println!();

    Ok(())
}

fn print_diff(from: &str, to: &str, diff: &SchemaDiff) {
    println!();
    println!(
        "  {}",
        style(format!("Schema Diff {from} -> {to}"))
            .cyan()
            .bold()
            .underlined()
    );
    println!();

    if diff.is_empty() {
        println!("  {}", style("The versions are identical.").magenta().dim());
        println!();
        return;
    }

    for table in &diff.added_tables {
        println!("  {} {}", style("+").green().bold(), style(table).bold());
    }
    for table in &diff.removed_tables {
        println!("  {} {}", style("-").red().bold(), style(table).bold());
    }
    for (table, table_diff) in &diff.modified_tables {
        println!("  {} {}", style("~").yellow().bold(), style(table).bold());
        print_table_diff(table_diff);
    }
    println!();
}

fn print_table_diff(diff: &TableDiff) {
    for field in &diff.added_fields {
        println!("      {} {}", style("+").green(), field);
    }
    for field in &diff.removed_fields {
        println!("      {} {}", style("-").red(), field);
    }
    for (field, change) in &diff.modified_fields {
        println!(
            "      {} {} {}",
            style("~").yellow(),
            field,
            style(format!(
                "{}{} -> {}{}",
                change.old.ty,
                nullability(change.old.nullable),
                change.new.ty,
                nullability(change.new.nullable)
            ))
            .dim()
        );
    }
}

fn nullability(nullable: bool) -> &'static str {
    if nullable { "" } else { " NOT NULL" }
}
