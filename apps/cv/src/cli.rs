//! Command-line interface: `build` writes every variant, `preview` prints one.

use std::path::{Path, PathBuf};

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use console::style;

use crate::build::{self, resolve_queries, BuildOptions, CommandRenderer, NoopRenderer, Renderer};
use crate::config::Config;
use crate::context::load_cv_data;
use crate::generation::{generate, generate_facts, generate_letter};

/// Systematic CV - generate targeted resumes from tagged, multi-language content.
#[derive(Debug, Parser)]
#[command(name = "systematic-cv")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Build every CV variant into an output directory.
    Build {
        /// Output directory
        #[arg(short, long)]
        output: PathBuf,

        /// Content file or directory (default: SYSTEMATIC_CV_DATA or ./data)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Queries file, JSON or YAML (default: ./queries.json, ./queries.yaml, ...)
        #[arg(short, long)]
        queries: Option<PathBuf>,

        /// Resume theme for queries that do not name one
        #[arg(short, long)]
        theme: Option<String>,
    },

    /// Print one variant as JSON without writing files.
    Preview {
        /// Query name after language expansion (e.g. backend-fr)
        #[arg(short, long)]
        name: String,

        #[arg(short, long)]
        input: Option<PathBuf>,

        #[arg(short, long)]
        queries: Option<PathBuf>,

        /// Print the facts list instead of the resume
        #[arg(long, conflicts_with = "letter")]
        facts: bool,

        /// Print the localized cover letter instead of the resume
        #[arg(long)]
        letter: bool,
    },
}

/// Run the CLI.
pub fn run(cli: Cli, config: &Config) -> Result<()> {
    match cli.command {
        Commands::Build {
            output,
            input,
            queries,
            theme,
        } => build_command(config, &output, input.as_deref(), queries.as_deref(), theme),
        Commands::Preview {
            name,
            input,
            queries,
            facts,
            letter,
        } => preview_command(config, &name, input.as_deref(), queries.as_deref(), facts, letter),
    }
}

fn renderer_for(config: &Config) -> Box<dyn Renderer> {
    if config.resume_cli.is_some() || config.cover_letter_cli.is_some() {
        Box::new(CommandRenderer::from_config(config))
    } else {
        Box::new(NoopRenderer)
    }
}

fn build_command(
    config: &Config,
    output: &Path,
    input: Option<&Path>,
    queries: Option<&Path>,
    theme: Option<String>,
) -> Result<()> {
    let data = load_cv_data(input.unwrap_or(&config.data_dir))?;
    let queries = resolve_queries(queries, Path::new("."))?;

    println!(
        "{} {} CV variants",
        style("Building").bold(),
        style(queries.len()).cyan()
    );

    let options = BuildOptions {
        output: output.to_path_buf(),
        theme: theme.unwrap_or_else(|| config.theme.clone()),
    };
    let renderer = renderer_for(config);
    let results = build::build(&data, &queries, &options, renderer.as_ref())?;

    for result in &results {
        match &result.error {
            None => println!("  {} {}", style("✓").green(), result.name),
            Some(e) => println!("  {} {}: {}", style("✗").red(), result.name, e),
        }
    }

    let failed = results.iter().filter(|r| !r.success).count();
    println!();
    println!(
        "{} {} successful, {} failed",
        style("Build completed:").green().bold(),
        results.len() - failed,
        if failed > 0 {
            style(failed).yellow().bold()
        } else {
            style(failed)
        }
    );
    println!(
        "{} {}",
        style("Index:").bold(),
        options.output.join("index.html").display()
    );

    Ok(())
}

fn preview_command(
    config: &Config,
    name: &str,
    input: Option<&Path>,
    queries: Option<&Path>,
    facts: bool,
    letter: bool,
) -> Result<()> {
    let data = load_cv_data(input.unwrap_or(&config.data_dir))?;
    let queries = resolve_queries(queries, Path::new("."))?;

    let Some(query) = queries.iter().find(|q| q.name == name) else {
        let available: Vec<&str> = queries.iter().map(|q| q.name.as_str()).collect();
        bail!(
            "No query named '{name}'. Available: {}",
            available.join(", ")
        );
    };

    let json = if facts {
        serde_json::to_string_pretty(&generate_facts(&data, query))?
    } else if letter {
        match generate_letter(&data, query) {
            Some(letter) => serde_json::to_string_pretty(&letter)?,
            None => bail!("The content has no cover letter"),
        }
    } else {
        serde_json::to_string_pretty(&generate(&data, query))?
    };

    println!("{json}");
    Ok(())
}
