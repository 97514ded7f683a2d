//! CLI command definitions, routing, and tracing setup.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use color_eyre::eyre::Result;
use colored::Colorize;
use docsgen_core::pipeline::{self, ProgressReporter, RunConfig, RunReport};
use docsgen_core::{RepoReport, SectionRegistry};
use docsgen_shared::{AppConfig, config_dir, init_config, load_config};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use crate::{repos, table};

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// docsgen: aggregate documentation from many repositories.
#[derive(Parser)]
#[command(
    name = "docsgen",
    version,
    about = "Collect tutorials, how-to guides, explanations and references from many repositories into one navigable docs tree.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Config file (defaults to ./docsgen.toml, then ~/.docsgen/docsgen.toml).
    #[arg(long, global = true, env = "DOCSGEN_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Rebuild the docs tree from every configured repository.
    Build {
        /// Output directory (overrides output.dir).
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Skip navigation links and repository index files.
        #[arg(long)]
        no_nav: bool,

        /// Owner whose repositories are used when no [[repos]] are configured.
        #[arg(long)]
        owner: Option<String>,
    },

    /// List the effective documentation categories.
    Sections,

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "docsgen=info",
        1 => "docsgen=debug",
        _ => "docsgen=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config.as_deref();

    match cli.command {
        Command::Build { out, no_nav, owner } => {
            cmd_build(load_config(config_path)?, out, no_nav, owner).await
        }
        Command::Sections => cmd_sections(&load_config(config_path)?),
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init(),
            ConfigAction::Show => cmd_config_show(&load_config(config_path)?),
        },
    }
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

async fn cmd_build(
    mut config: AppConfig,
    out: Option<PathBuf>,
    no_nav: bool,
    owner: Option<String>,
) -> Result<()> {
    if let Some(out) = out {
        config.output.dir = out;
    }
    if no_nav {
        config.output.nav = false;
    }
    if let Some(owner) = owner {
        config.github.fallback_owner = Some(owner);
    }

    info!(
        out = %config.output.dir.display(),
        nav = config.output.nav,
        "building docs"
    );

    let reporter = CliProgress::new();

    reporter.phase("Collecting repository data");
    let mut repositories = repos::collect(&config, &reporter).await?;

    let run_config = RunConfig::from_config(&config);
    let report = pipeline::run(&run_config, &mut repositories, &reporter)?;

    println!();
    print!("{}", table::render(&run_config.registry, &report.repos));
    println!();
    println!(
        "{} {} repositories into {} in {:.1}s",
        "Built:".green(),
        report.repos.len(),
        report.root_index.parent().unwrap_or(config.output.dir.as_path()).display(),
        report.elapsed.as_secs_f64()
    );

    Ok(())
}

fn cmd_sections(config: &AppConfig) -> Result<()> {
    let registry = SectionRegistry::new(config.categories.clone());
    for category in &registry {
        println!(
            "{:<14} {:<16} marker: {:<14} files: {}",
            category.name.bold(),
            category.header_text,
            format!("{:?}", category.marker),
            category.filename_patterns.join(", ")
        );
    }
    Ok(())
}

fn cmd_config_init() -> Result<()> {
    let path = init_config(&config_dir()?)?;
    println!("{} {}", "Initialized:".green(), path.display());
    Ok(())
}

fn cmd_config_show(config: &AppConfig) -> Result<()> {
    let toml_str = toml::to_string_pretty(config)?;
    println!("{toml_str}");
    Ok(())
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// CLI progress reporter using an indicatif spinner.
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
        );
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        Self { spinner }
    }
}

impl ProgressReporter for CliProgress {
    fn phase(&self, name: &str) {
        self.spinner.set_message(name.to_string());
    }

    fn repo_started(&self, full_name: &str, current: usize, total: usize) {
        self.spinner
            .set_message(format!("Parsing [{current}/{total}] {full_name}"));
    }

    fn repo_finished(&self, report: &RepoReport) {
        self.spinner.suspend(|| {
            eprintln!(
                "  {} {} ({} files, {} copied)",
                "parsed".dimmed(),
                report.name,
                report.created_files.len(),
                report.copied_files.len()
            );
        });
    }

    fn done(&self, _report: &RunReport) {
        self.spinner.finish_and_clear();
    }
}
