#![forbid(unsafe_code)]

mod cmd;
mod output;
mod source;

use clap::{CommandFactory, Parser, Subcommand};
use output::{CliError, OutputMode, render_error, resolve_output_mode};
use std::env;
use syndic_core::config::resolve_config;
use tracing::{debug, info_span};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "syndic: union membership reporting",
    long_about = None
)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long)]
    verbose: bool,

    /// Output format (pretty, text, json). Defaults to pretty on a terminal.
    #[arg(long, global = true, value_enum)]
    format: Option<OutputMode>,

    /// Shorthand for `--format json`.
    #[arg(long, global = true, hide = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    fn output_mode(&self, config_format: Option<&str>) -> OutputMode {
        resolve_output_mode(self.format, self.json, config_format)
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        next_help_heading = "Reports",
        about = "Generate reports from a snapshot",
        long_about = "Load every entity collection once, apply the date range and selectors, \
                      and render the requested reports. Reports whose inputs failed to load \
                      are marked unavailable instead of failing the run.",
        after_help = "EXAMPLES:\n    # Every report over all time\n    syndic report --source-dir ./export\n\n    # Two reports for 2024, as JSON\n    syndic report members-by-sex agreements-expiring --from 2024-01-01 --to 2024-12-31 --format json\n\n    # One union's profile\n    syndic report union-profile --union u-17"
    )]
    Report(cmd::report::ReportArgs),

    #[command(
        next_help_heading = "Reports",
        about = "List report ids",
        long_about = "List every report id in catalogue order with its title and the entity kinds it reads.",
        after_help = "EXAMPLES:\n    # Human table\n    syndic catalog\n\n    # Machine-readable catalogue\n    syndic catalog --format json"
    )]
    Catalog,

    #[command(
        next_help_heading = "Setup",
        about = "Inspect configuration",
        long_about = "Show the effective configuration after merging defaults, the user config, \
                      syndic.toml, and SYNDIC_* environment variables.",
        after_help = "EXAMPLES:\n    # Effective configuration\n    syndic config show\n\n    # As JSON\n    syndic config show --format json"
    )]
    Config(cmd::config::ConfigArgs),

    #[command(
        next_help_heading = "Setup",
        about = "Generate shell completions",
        long_about = "Generate shell completion scripts for supported shells.",
        after_help = "EXAMPLES:\n    # Generate zsh completions\n    syndic completions zsh > _syndic"
    )]
    Completions(cmd::completions::CompletionsArgs),
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("SYNDIC_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if env::var("DEBUG").is_ok() {
            "syndic=debug,info"
        } else {
            "syndic=info,warn"
        })
    });

    let format = env::var("SYNDIC_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);
    let layer = fmt::layer().with_writer(std::io::stderr);

    match format.as_str() {
        "json" => registry.with(layer.json().with_ansi(false)).init(),
        _ => registry.with(layer.compact()).init(),
    }
}

fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();
    if cli.verbose {
        debug!("verbose mode enabled");
    }

    let project_root = env::current_dir()?;
    let config = match resolve_config(&project_root) {
        Ok(config) => config,
        Err(err) => {
            let cli_err = CliError::from_code(err.error_code(), err.to_string());
            render_error(cli.output_mode(None), &cli_err)?;
            anyhow::bail!("{err}");
        }
    };
    let output = cli.output_mode(config.output.format.as_deref());

    match cli.command {
        Commands::Report(ref args) => info_span!("cmd.report")
            .in_scope(|| cmd::report::run_report(args, &config, output)),
        Commands::Catalog => {
            info_span!("cmd.catalog").in_scope(|| cmd::catalog::run_catalog(output))
        }
        Commands::Config(ref args) => info_span!("cmd.config")
            .in_scope(|| cmd::config::run_config(args, &config, output)),
        Commands::Completions(ref args) => info_span!("cmd.completions").in_scope(|| {
            let mut command = Cli::command();
            cmd::completions::run_completions(args.shell, &mut command)
        }),
    }
}
