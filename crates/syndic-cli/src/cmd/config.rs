//! `syndic config` - inspect the effective configuration.

use std::io::{self, Write};

use anyhow::Result;
use clap::{Args, Subcommand};
use syndic_core::config::SyndicConfig;

use crate::output::{OutputMode, render};

#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Show the resolved configuration (files, environment, defaults)
    Show,
}

pub fn run_config(args: &ConfigArgs, config: &SyndicConfig, output: OutputMode) -> Result<()> {
    match args.command {
        ConfigCommand::Show => render(output, config, print_effective),
    }
}

fn print_effective(value: &SyndicConfig, mode: OutputMode, w: &mut dyn Write) -> io::Result<()> {
    let unset = || "(unset)".to_string();
    let source = &value.source;
    let windows = &value.windows;

    if mode == OutputMode::Pretty {
        let rendered = toml::to_string_pretty(value).map_err(io::Error::other)?;
        write!(w, "{rendered}")?;
        if source.token.is_some() {
            writeln!(w, "# source.token is set (hidden)")?;
        }
        return Ok(());
    }

    writeln!(
        w,
        "source.dir={}",
        source
            .dir
            .as_ref()
            .map_or_else(unset, |dir| dir.display().to_string())
    )?;
    writeln!(
        w,
        "source.base_url={}",
        source.base_url.clone().unwrap_or_else(unset)
    )?;
    writeln!(
        w,
        "source.token={}",
        source.token.as_ref().map_or("(unset)", |_| "(set)")
    )?;
    writeln!(w, "source.per_page={}", source.per_page)?;
    writeln!(w, "source.timeout_secs={}", source.timeout_secs)?;
    writeln!(
        w,
        "windows.agreement_expiry_days={}",
        windows.agreement_expiry_days
    )?;
    writeln!(
        w,
        "windows.assembly_upcoming_days={}",
        windows.assembly_upcoming_days
    )?;
    writeln!(
        w,
        "windows.executive_term_days={}",
        windows.executive_term_days
    )?;
    writeln!(
        w,
        "output.format={}",
        value.output.format.clone().unwrap_or_else(unset)
    )
}
