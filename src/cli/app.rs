//! Main CLI application structure

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use super::output::{Output, OutputFormat};
use super::{analyze, config_cmd, template_cmd};
use crate::storage::{Config, ExportFormat, InputFormat};

#[derive(Parser)]
#[command(name = "career-span")]
#[command(author, version, about = "Career duration calculator that deduplicates overlapping engagements")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format (defaults to the configured format)
    #[arg(long, short = 'f', global = true)]
    pub format: Option<OutputFormat>,

    /// Enable verbose output for debugging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Configuration file to use instead of the default lookup
    #[arg(long, short = 'c', global = true, env = "CAREER_SPAN_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyze an engagement list and print career statistics
    Analyze {
        /// Engagement file (csv, tsv, json or yaml)
        file: PathBuf,

        /// Input format (inferred from the extension by default)
        #[arg(long, value_enum)]
        input_format: Option<InputFormat>,
    },

    /// Analyze an engagement list and write a results file
    Export {
        /// Engagement file (csv, tsv, json or yaml)
        file: PathBuf,

        /// Results file (defaults to a dated file in the current directory)
        #[arg(long, short)]
        output: Option<PathBuf>,

        /// Results format
        #[arg(long = "as", value_enum, default_value = "csv")]
        export_format: ExportFormat,

        /// Append the overlap ranges to CSV results
        #[arg(long)]
        ranges: bool,

        /// Input format (inferred from the extension by default)
        #[arg(long, value_enum)]
        input_format: Option<InputFormat>,
    },

    /// Write a blank engagement sheet with examples
    Template {
        /// Destination file, or `-` for stdout
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Inspect configuration
    #[command(subcommand)]
    Config(config_cmd::ConfigCommands),
}

/// Main entry point for the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())?;
    let format = cli.format.unwrap_or(config.settings.default_format);
    let output = Output::new(format, cli.verbose);

    output.verbose("career-span starting");
    match &config.source {
        Some(path) => output.verbose_ctx("config", &format!("Loaded {}", path.display())),
        None => output.verbose_ctx("config", "Using default configuration"),
    }

    match cli.command {
        Commands::Analyze { file, input_format } => {
            analyze::analyze(&output, &file, input_format, &config.settings)?
        }

        Commands::Export {
            file,
            output: destination,
            export_format,
            ranges,
            input_format,
        } => analyze::export(
            &output,
            &file,
            input_format,
            analyze::ExportOptions {
                destination,
                format: export_format,
                include_ranges: ranges || config.settings.export.include_ranges,
            },
            &config.settings,
        )?,

        Commands::Template { output: destination } => {
            template_cmd::run(&output, destination.as_deref())?
        }

        Commands::Config(cmd) => config_cmd::run(cmd, &output, &config)?,
    }

    output.verbose("Command completed successfully");
    Ok(())
}
