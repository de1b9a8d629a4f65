mod catalog;
mod collect;
mod commands;
mod config;
mod consolidate;
mod context;
mod output;
mod record;
mod render;
mod traits;

#[cfg(test)]
mod test_helpers;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{ConsolidateCommand, RenderCommand, SchemaCommand};
use consolidate::Aggregate;

#[derive(Parser)]
#[command(name = "rtrack")]
#[command(about = "Resource tracker - turns Snowflake account exports into Terraform resources and import commands", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to the rtrack.yaml config file
    #[arg(short, long, global = true, env = "RTRACK_CONFIG")]
    config: Option<String>,

    /// Show per-type detail
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render exported rows as Terraform resources plus an import script
    Render {
        /// Directory holding the exported <type>.jsonl files
        #[arg(short, long)]
        input: String,

        /// Directory for the generated .tf files and import script
        #[arg(short, long)]
        output: String,
    },

    /// Consolidate the records of one JSONL file and print them as JSONL
    Consolidate {
        /// JSONL file with one record per line
        file: String,

        /// Resource type of the records
        #[arg(short = 't', long)]
        resource_type: String,

        /// Aggregate attribute: roles, users, shares or any set or list attribute
        #[arg(short, long, default_value = "roles")]
        by: Aggregate,
    },

    /// Inspect or generate the resource catalog
    Schema {
        #[command(subcommand)]
        command: SchemaCommands,
    },
}

#[derive(Subcommand)]
enum SchemaCommands {
    /// List resource types and their import id attributes
    List,

    /// Build catalog entries from a provider documentation export
    Generate {
        /// Documentation export, one resource per line
        #[arg(short, long)]
        docs: String,

        /// Write the YAML here instead of printing it
        #[arg(short, long)]
        output: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let ctx = context::Context::new();

    match cli.command {
        Commands::Render { input, output } => {
            RenderCommand::execute(&ctx, &input, &output, cli.config.as_deref(), cli.verbose)?;
        }
        Commands::Consolidate {
            file,
            resource_type,
            by,
        } => {
            ConsolidateCommand::execute(&ctx, &file, &resource_type, &by, cli.config.as_deref())?;
        }
        Commands::Schema { command } => match command {
            SchemaCommands::List => {
                SchemaCommand::list(&ctx, cli.config.as_deref())?;
            }
            SchemaCommands::Generate { docs, output } => {
                SchemaCommand::generate(&ctx, &docs, output.as_deref())?;
            }
        },
    }

    Ok(())
}
